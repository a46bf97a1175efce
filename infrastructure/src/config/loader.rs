//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Prefix of environment overrides (`QUIZ_SOLVER_LLM__MODEL=...`)
pub const ENV_PREFIX: &str = "QUIZ_SOLVER_";

/// Project-level config file name
pub const PROJECT_CONFIG_FILE: &str = "quiz-solver.toml";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Later sources override earlier ones: defaults, global file, project
    /// file, explicit file, environment.
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    ///
    /// Environment overrides still apply so that container deployments can
    /// configure the server without files.
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Self::env())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        // An explicit path must exist; figment reports missing files as errors
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Self::env())
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/quiz-solver/config.toml if set,
    /// otherwise falls back to ~/.config/quiz-solver/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("quiz-solver").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG_FILE);
        path.exists().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load_defaults().unwrap();
            assert_eq!(config.server.port, 8000);
            assert_eq!(config.solver.max_steps, 10);
            Ok(())
        });
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("quiz-solver"));
    }

    #[test]
    fn test_project_file_is_merged() {
        Jail::expect_with(|jail| {
            jail.create_file(
                PROJECT_CONFIG_FILE,
                r#"
                [server]
                port = 9000

                [llm]
                model = "gemini-2.5-flash"
                "#,
            )?;

            let config = ConfigLoader::load(None).unwrap();
            assert_eq!(config.server.port, 9000);
            assert_eq!(config.llm.model, "gemini-2.5-flash");
            // Untouched keys keep their defaults
            assert_eq!(config.server.host, "0.0.0.0");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(PROJECT_CONFIG_FILE, "[solver]\nmax_steps = 3")?;
            jail.create_file("custom.toml", "[solver]\nmax_steps = 7")?;

            let path = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&path)).unwrap();
            assert_eq!(config.solver.max_steps, 7);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let path = PathBuf::from("does-not-exist.toml");
            assert!(ConfigLoader::load(Some(&path)).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_file(PROJECT_CONFIG_FILE, "[server]\nport = 9000")?;
            jail.set_env("QUIZ_SOLVER_SERVER__PORT", "9100");
            jail.set_env("QUIZ_SOLVER_LLM__API_KEY", "from-env");

            let config = ConfigLoader::load(None).unwrap();
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.llm.api_key.as_deref(), Some("from-env"));
            Ok(())
        });
    }

    #[test]
    fn test_env_applies_with_no_config() {
        Jail::expect_with(|jail| {
            jail.create_file(PROJECT_CONFIG_FILE, "[server]\nport = 9000")?;
            jail.set_env("QUIZ_SOLVER_SOLVER__MAX_STEPS", "2");

            let config = ConfigLoader::load_defaults().unwrap();
            assert_eq!(config.server.port, 8000);
            assert_eq!(config.solver.max_steps, 2);
            Ok(())
        });
    }
}
