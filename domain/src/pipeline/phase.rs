//! Run phases and their legal transitions

use serde::{Deserialize, Serialize};

/// Phase of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Planning,
    Researching,
    Evaluating,
    Drafting,
    Reviewing,
    Done,
    Aborted,
}

impl RunPhase {
    pub fn as_str(&self) -> &str {
        match self {
            RunPhase::Planning => "planning",
            RunPhase::Researching => "researching",
            RunPhase::Evaluating => "evaluating",
            RunPhase::Drafting => "drafting",
            RunPhase::Reviewing => "reviewing",
            RunPhase::Done => "done",
            RunPhase::Aborted => "aborted",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            RunPhase::Planning => "Planning",
            RunPhase::Researching => "Researching",
            RunPhase::Evaluating => "Evaluating",
            RunPhase::Drafting => "Drafting",
            RunPhase::Reviewing => "Reviewing",
            RunPhase::Done => "Done",
            RunPhase::Aborted => "Aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Aborted)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// Every non-terminal phase may abort. `Drafting → Done` covers a
    /// writer failure on the last permitted iteration when an earlier draft
    /// can still be emitted.
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        use RunPhase::*;
        match (self, next) {
            (Done | Aborted, _) => false,
            (_, Aborted) => true,
            (Planning, Researching)
            | (Researching, Evaluating)
            | (Evaluating, Drafting)
            | (Drafting, Reviewing)
            | (Drafting, Drafting)
            | (Drafting, Done)
            | (Reviewing, Drafting)
            | (Reviewing, Done) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        let path = [
            RunPhase::Planning,
            RunPhase::Researching,
            RunPhase::Evaluating,
            RunPhase::Drafting,
            RunPhase::Reviewing,
            RunPhase::Drafting,
            RunPhase::Reviewing,
            RunPhase::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(!RunPhase::Planning.can_transition_to(RunPhase::Drafting));
        assert!(!RunPhase::Evaluating.can_transition_to(RunPhase::Researching));
        assert!(!RunPhase::Researching.can_transition_to(RunPhase::Done));
    }

    #[test]
    fn test_terminal_phases_are_final() {
        for next in [RunPhase::Planning, RunPhase::Drafting, RunPhase::Aborted] {
            assert!(!RunPhase::Done.can_transition_to(next));
            assert!(!RunPhase::Aborted.can_transition_to(next));
        }
    }

    #[test]
    fn test_any_live_phase_can_abort() {
        for phase in [
            RunPhase::Planning,
            RunPhase::Researching,
            RunPhase::Evaluating,
            RunPhase::Drafting,
            RunPhase::Reviewing,
        ] {
            assert!(phase.can_transition_to(RunPhase::Aborted));
        }
    }
}
