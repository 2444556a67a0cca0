//! Configuration handling for the expense tracker
//!
//! Configuration is layered, later layers overriding earlier ones field by
//! field:
//!
//! 1. built-in defaults
//! 2. `~/.config/tracker/config.toml` (global), or the file given with `--config`
//! 3. `tracker.toml` in the working directory (local)
//! 4. command-line flags and their environment variables

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::validation::validate_currency;
use crate::domain::DEFAULT_CURRENCY;

/// File name of the local configuration
pub const LOCAL_CONFIG_FILE: &str = "tracker.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// One configuration file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Path of the expenses JSON document
    pub data_file: Option<PathBuf>,

    /// Path of the append-only log file
    pub log_file: Option<PathBuf>,

    /// Currency used by `add` when none is given
    pub default_currency: Option<String>,

    /// Log level or filter directive (e.g. `info`, `debug`)
    pub log_level: Option<String>,
}

impl ConfigFile {
    /// Reads a config file, returning `None` if it doesn't exist
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Overlays `other` on top of `self`
    fn merge(self, other: ConfigFile) -> ConfigFile {
        ConfigFile {
            data_file: other.data_file.or(self.data_file),
            log_file: other.log_file.or(self.log_file),
            default_currency: other.default_currency.or(self.default_currency),
            log_level: other.log_level.or(self.log_level),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub default_currency: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data").join("expenses.json"),
            log_file: PathBuf::from("logs").join("tracker.log"),
            default_currency: DEFAULT_CURRENCY.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration for a working directory.
    ///
    /// `explicit` replaces the global config file; unlike the global file it
    /// must exist.
    pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<Self> {
        let global = match explicit {
            Some(path) => {
                let path = cwd.join(path);
                Some(ConfigFile::read(&path)?.ok_or_else(|| {
                    ConfigError::Invalid(format!("config file not found: {}", path.display()))
                })?)
            }
            None => match Self::global_config_dir() {
                Some(dir) => ConfigFile::read(&dir.join("config.toml"))?,
                None => None,
            },
        };

        let local = ConfigFile::read(&cwd.join(LOCAL_CONFIG_FILE))?;

        let merged = global
            .into_iter()
            .chain(local)
            .fold(ConfigFile::default(), ConfigFile::merge);

        Self::from_file(merged, cwd)
    }

    /// Builds a configuration from defaults plus one (merged) file
    pub fn from_file(file: ConfigFile, cwd: &Path) -> Result<Self> {
        let defaults = Config::default();

        let default_currency = match file.default_currency {
            Some(code) => validate_currency(&code)
                .map_err(|e| ConfigError::Invalid(e.to_string()))
                .context("Invalid default_currency in config")?,
            None => defaults.default_currency,
        };

        Ok(Self {
            data_file: cwd.join(file.data_file.unwrap_or(defaults.data_file)),
            log_file: cwd.join(file.log_file.unwrap_or(defaults.log_file)),
            default_currency,
            log_level: file.log_level.unwrap_or(defaults.log_level),
        })
    }

    /// Applies command-line overrides (relative paths resolve against `cwd`)
    pub fn with_overrides(
        mut self,
        cwd: &Path,
        data_file: Option<&Path>,
        log_file: Option<&Path>,
    ) -> Self {
        if let Some(path) = data_file {
            self.data_file = cwd.join(path);
        }
        if let Some(path) = log_file {
            self.log_file = cwd.join(path);
        }
        self
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "expense-tracker", "tracker")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.data_file, Path::new("data/expenses.json"));
        assert_eq!(config.log_file, Path::new("logs/tracker.log"));
        assert_eq!(config.default_currency, "BDT");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn parse_config_file() {
        let toml = r#"
data_file = "money/expenses.json"
default_currency = "usd"
"#;

        let file: ConfigFile = toml::from_str(toml).unwrap();
        assert_eq!(file.data_file, Some(PathBuf::from("money/expenses.json")));
        assert_eq!(file.log_file, None);

        let config = Config::from_file(file, Path::new("/work")).unwrap();
        assert_eq!(config.data_file, Path::new("/work/money/expenses.json"));
        assert_eq!(config.log_file, Path::new("/work/logs/tracker.log"));
        assert_eq!(config.default_currency, "USD");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<ConfigFile>("colour = \"blue\"").is_err());
    }

    #[test]
    fn later_layers_win() {
        let global = ConfigFile {
            data_file: Some("global.json".into()),
            log_level: Some("debug".into()),
            ..Default::default()
        };
        let local = ConfigFile {
            data_file: Some("local.json".into()),
            ..Default::default()
        };

        let merged = global.merge(local);
        assert_eq!(merged.data_file, Some(PathBuf::from("local.json")));
        assert_eq!(merged.log_level, Some("debug".to_string()));
    }

    #[test]
    fn load_reads_local_and_explicit_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("global.toml"), "log_level = \"warn\"\ndefault_currency = \"EUR\"\n").unwrap();
        fs::write(dir.path().join(LOCAL_CONFIG_FILE), "default_currency = \"USD\"\n").unwrap();

        let config = Config::load(dir.path(), Some(Path::new("global.toml"))).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.default_currency, "USD");
        assert_eq!(config.data_file, dir.path().join("data/expenses.json"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path(), Some(Path::new("nope.toml"))).is_err());
    }

    #[test]
    fn invalid_config_names_the_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.toml"), "data_file = [").unwrap();

        let err = Config::load(dir.path(), Some(Path::new("bad.toml"))).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.toml"));
    }

    #[test]
    fn invalid_default_currency_is_an_error() {
        let file = ConfigFile {
            default_currency: Some("$$".into()),
            ..Default::default()
        };
        assert!(Config::from_file(file, Path::new("/work")).is_err());
    }

    #[test]
    fn overrides_replace_paths() {
        let config = Config::default().with_overrides(
            Path::new("/work"),
            Some(Path::new("other.json")),
            Some(Path::new("/var/log/tracker.log")),
        );
        assert_eq!(config.data_file, Path::new("/work/other.json"));
        assert_eq!(config.log_file, Path::new("/var/log/tracker.log"));
    }
}
