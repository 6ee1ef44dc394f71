//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const PROJECT_FILES: [&str; 2] = ["scriptorium.toml", ".scriptorium.toml"];
const ENV_PREFIX: &str = "SCRIPTORIUM_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `SCRIPTORIUM_PIPELINE__MAX_ITERATIONS=5` style variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./scriptorium.toml` or `./.scriptorium.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/scriptorium/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `$XDG_CONFIG_HOME/scriptorium/config.toml`, or the platform equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("scriptorium").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] {}* variables ('__' separates sections)", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./scriptorium.toml or ./.scriptorium.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptorium_domain::OutputFormat;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.pipeline.max_iterations, 3);
        assert!(config.models.writer.is_none());
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("scriptorium"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[pipeline]
max_iterations = 6

[output]
format = "json"
"#,
            )?;

            let path = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&path)).map_err(|e| *e)?;
            assert_eq!(config.pipeline.max_iterations, 6);
            assert_eq!(config.pipeline.concurrency_limit, 3);
            assert_eq!(config.output.format, Some(OutputFormat::Json));
            Ok(())
        });
    }

    #[test]
    fn test_project_file_is_discovered() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "scriptorium.toml",
                r#"
[evaluation]
threshold = 0.7
"#,
            )?;
            assert_eq!(
                ConfigLoader::project_config_path(),
                Some(PathBuf::from("scriptorium.toml"))
            );
            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.evaluation.threshold, 0.7);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[pipeline]
max_iterations = 6
"#,
            )?;
            jail.set_env("SCRIPTORIUM_PIPELINE__MAX_ITERATIONS", "2");
            jail.set_env("SCRIPTORIUM_MODELS__WRITER", "gpt-5");

            let path = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&path)).map_err(|e| *e)?;
            assert_eq!(config.pipeline.max_iterations, 2);
            assert_eq!(config.models.writer.as_deref(), Some("gpt-5"));
            Ok(())
        });
    }
}
