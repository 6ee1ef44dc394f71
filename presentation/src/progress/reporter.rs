//! Progress reporting for pipeline runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use scriptorium_application::ProgressNotifier;
use scriptorium_domain::{AgentRole, RunPhase, StepId};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with an indicatif bar for research and spinners elsewhere
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
    iteration: Mutex<Option<(u32, u32)>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
            iteration: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_display_name(phase: &RunPhase) -> &'static str {
        match phase {
            RunPhase::Planning => "Planning research questions",
            RunPhase::Researching => "Researching",
            RunPhase::Evaluating => "Evaluating sources",
            RunPhase::Drafting => "Writing draft",
            RunPhase::Reviewing => "Editor review",
            RunPhase::Done => "Done",
            RunPhase::Aborted => "Aborted",
        }
    }

    fn prefix(&self, phase: &RunPhase) -> String {
        let name = Self::phase_display_name(phase);
        match (phase, self.iteration.lock().ok().and_then(|i| *i)) {
            (RunPhase::Drafting | RunPhase::Reviewing, Some((current, max))) => {
                format!("{} ({}/{})", name, current, max)
            }
            _ => name.to_string(),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.phase_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &RunPhase, total_tasks: usize) {
        let pb = if *phase == RunPhase::Researching {
            let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
            pb.set_style(Self::bar_style());
            pb
        } else {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        };
        pb.set_prefix(self.prefix(phase));
        pb.set_message("...");

        if let Ok(mut guard) = self.phase_bar.lock()
            && let Some(previous) = guard.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_step_complete(&self, step_id: &StepId, success: bool) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} step {}", "v".green(), step_id)
            } else {
                format!("{} step {}", "x".red(), step_id)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_phase_complete(&self, _phase: &RunPhase) {
        if let Ok(mut guard) = self.phase_bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!("{}", "done".green()));
        }
    }

    fn on_iteration_start(&self, iteration: u32, max_iterations: u32) {
        if let Ok(mut guard) = self.iteration.lock() {
            *guard = Some((iteration, max_iterations));
        }
    }

    fn on_verdict(&self, draft_version: u32, approved: bool) {
        let line = if approved {
            format!("{} draft v{} approved", "v".green(), draft_version)
        } else {
            format!("{} draft v{} returned with feedback", "~".yellow(), draft_version)
        };
        let _ = self.multi.println(line);
    }

    fn on_retry(&self, role: AgentRole, attempt: u32) {
        self.with_bar(|pb| {
            pb.set_message(format!("{} retrying {} (attempt {})", "!".yellow(), role, attempt));
        });
    }
}

/// Simple text-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &RunPhase, total_tasks: usize) {
        let phase_name = ProgressReporter::phase_display_name(phase);
        if *phase == RunPhase::Researching {
            eprintln!("{} {} ({} steps)", "->".cyan(), phase_name.bold(), total_tasks);
        } else {
            eprintln!("{} {}", "->".cyan(), phase_name.bold());
        }
    }

    fn on_step_complete(&self, step_id: &StepId, success: bool) {
        if success {
            eprintln!("  {} step {}", "v".green(), step_id);
        } else {
            eprintln!("  {} step {} (failed)", "x".red(), step_id);
        }
    }

    fn on_phase_complete(&self, _phase: &RunPhase) {}

    fn on_iteration_start(&self, iteration: u32, max_iterations: u32) {
        eprintln!("{} Iteration {}/{}", "->".cyan(), iteration, max_iterations);
    }

    fn on_verdict(&self, draft_version: u32, approved: bool) {
        if approved {
            eprintln!("  {} draft v{} approved", "v".green(), draft_version);
        } else {
            eprintln!("  {} draft v{} returned with feedback", "~".yellow(), draft_version);
        }
    }

    fn on_retry(&self, role: AgentRole, attempt: u32) {
        eprintln!("  {} {} call failed, attempt {}", "!".yellow(), role, attempt);
    }
}
