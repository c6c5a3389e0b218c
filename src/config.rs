// Configuration loading

use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "deadlines";
const CONFIG_FILE: &str = "config.yml";
const DB_FILE: &str = "deadlines.sqlite";

/// Settings read from `config.yml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the SQLite database file
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit file, or from the default location
    ///
    /// An explicit path must exist. The default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Default config file: `<config dir>/deadlines/config.yml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Resolve the database path: override, then config, then the data directory
    pub fn resolve_db_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(DB_FILE))
            .ok_or_else(|| eyre!("Could not determine a data directory; pass --db or set db_path in config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "db_path: /tmp/tasks.sqlite\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/tasks.sqlite")));
    }

    #[test]
    fn test_from_file_empty_mapping() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "{}\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "database: nope\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_resolve_db_path_precedence() {
        let config = Config {
            db_path: Some(PathBuf::from("from-config.sqlite")),
        };

        let resolved = config.resolve_db_path(Some(Path::new("override.sqlite"))).unwrap();
        assert_eq!(resolved, PathBuf::from("override.sqlite"));

        let resolved = config.resolve_db_path(None).unwrap();
        assert_eq!(resolved, PathBuf::from("from-config.sqlite"));
    }
}
