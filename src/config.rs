//! Configuration for the combinaut CLI.
//!
//! An optional TOML file supplying defaults for flags a user would
//! otherwise repeat on every invocation. CLI flags always win when
//! explicitly passed; this file only changes what "not passed" means.

use dirs::{config_dir, home_dir};
use num_cpus::get as get_num_cpus;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CombError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "combinaut.toml";

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Default separator joining combination fields.
    #[serde(default)]
    pub separator: String,

    /// Default minimum target subset length.
    #[serde(default = "default_min_target")]
    pub min_target: usize,

    /// Default maximum target subset length.
    #[serde(default = "default_max_target")]
    pub max_target: usize,

    /// Whether self-combination output is enabled by default.
    #[serde(default = "default_true")]
    pub self_combination: bool,

    /// Worker pool size override. Defaults to the available CPU count.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_min_target() -> usize {
    1
}

fn default_max_target() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_workers() -> usize {
    get_num_cpus()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: String::new(),
            min_target: default_min_target(),
            max_target: default_max_target(),
            self_combination: true,
            workers: default_workers(),
        }
    }
}

impl Config {
    /// Load configuration from the default search path.
    ///
    /// Searches, in order: current directory, `$HOME/.config/combinaut/`,
    /// then the platform config directory. Returns the default
    /// configuration if no file is found anywhere.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CombError::Config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CombError::Config(format!("failed to parse configuration: {e}")))?;

        if config.min_target == 0 {
            return Err(CombError::Config(
                "min_target must be at least 1".to_string(),
            ));
        }
        if config.min_target > config.max_target {
            return Err(CombError::Config(
                "min_target must not exceed max_target".to_string(),
            ));
        }

        Ok(config)
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("combinaut").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("combinaut").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_cli_defaults() {
        let config = Config::default();
        assert_eq!(config.separator, "");
        assert_eq!(config.min_target, 1);
        assert_eq!(config.max_target, 3);
        assert!(config.self_combination);
        assert!(config.workers >= 1);
    }

    #[test]
    fn load_and_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("combinaut.toml");
        std::fs::write(&path, "separator = \"-\"\nmin_target = 2\nmax_target = 4\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.separator, "-");
        assert_eq!(config.min_target, 2);
        assert_eq!(config.max_target, 4);
    }

    #[test]
    fn rejects_inverted_range() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("combinaut.toml");
        std::fs::write(&path, "min_target = 5\nmax_target = 2\n").unwrap();

        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn load_from_nonexistent_path_errors() {
        let result = Config::load_from_path(Path::new("/nonexistent/combinaut.toml"));
        assert!(result.is_err());
    }
}
