//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, in lookup order
const PROJECT_CONFIG_FILES: [&str; 2] = ["review.toml", ".review.toml"];

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "TASK_REVIEW_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables, e.g. `TASK_REVIEW_GATES__COVERAGE_MIN=0.4`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./review.toml` or `./.review.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/task-review/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/task-review/config.toml if set,
    /// otherwise the platform config directory equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("task-review").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        println!("  [     ] Env:     {}<SECTION>__<KEY>", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./review.toml or ./.review.toml");
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
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("task-review"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.create_file(
                "review.toml",
                r#"
[gates]
coverage_min = 0.25

[retrieval]
top_k = 8
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.gates.coverage_min, 0.25);
            assert_eq!(config.retrieval.top_k, 8);
            assert_eq!(config.gates.approve_coverage_min, 0.45);
            Ok(())
        });
    }

    #[test]
    fn test_hidden_project_file_used_when_plain_missing() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.create_file(".review.toml", "[decision]\nparse_retries = 3\n")?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.decision.parse_retries, 3);
            Ok(())
        });
    }

    #[test]
    fn test_priority_env_over_explicit_over_project_over_global() {
        Jail::expect_with(|jail| {
            let xdg = jail.directory().join("xdg");
            std::fs::create_dir_all(xdg.join("task-review")).unwrap();
            std::fs::write(
                xdg.join("task-review").join("config.toml"),
                "[gates]\ncoverage_min = 0.1\napprove_coverage_min = 0.2\nmin_citations_for_approval = 5\n[retrieval]\ntop_k = 9\n",
            )
            .unwrap();
            jail.set_env("XDG_CONFIG_HOME", xdg.display());

            jail.create_file(
                "review.toml",
                "[gates]\ncoverage_min = 0.3\napprove_coverage_min = 0.6\n",
            )?;
            jail.create_file("custom.toml", "[gates]\ncoverage_min = 0.4\n")?;
            jail.set_env("TASK_REVIEW_GATES__COVERAGE_MIN", "0.5");

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;

            assert_eq!(config.gates.coverage_min, 0.5);
            assert_eq!(config.gates.approve_coverage_min, 0.6);
            assert_eq!(config.gates.min_citations_for_approval, 5);
            assert_eq!(config.retrieval.top_k, 9);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            let result = ConfigLoader::load(Some(Path::new("nope.toml")));
            assert!(result.is_err());
            Ok(())
        });
    }
}
