//! Store configuration.
//!
//! Loaded from JSON, with environment variable overrides on top.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HerdError, HerdResult};

/// Environment variable overriding the database file.
pub const ENV_DATABASE_PATH: &str = "HERDBOOK_DATABASE_PATH";

/// Environment variable enabling demo data ("1" or "true").
pub const ENV_SEED_DEMO_DATA: &str = "HERDBOOK_SEED_DEMO_DATA";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HerdConfig {
    /// SQLite file; `None` keeps everything in memory
    pub database_path: Option<PathBuf>,
    /// Fill an empty herd with the demo records on open
    pub seed_demo_data: bool,
}

impl HerdConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> HerdResult<Self> {
        serde_json::from_str(json).map_err(|e| HerdError::Config(e.to_string()))
    }

    /// Read a JSON config file, then apply the environment overrides.
    pub fn load(path: impl AsRef<Path>) -> HerdResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| HerdError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_json(&json)?.with_env_overrides())
    }

    /// Apply [`ENV_DATABASE_PATH`] and [`ENV_SEED_DEMO_DATA`] when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(ENV_DATABASE_PATH) {
            if !path.trim().is_empty() {
                self.database_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(flag) = std::env::var(ENV_SEED_DEMO_DATA) {
            self.seed_demo_data = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HerdConfig::from_json("{}").unwrap();
        assert_eq!(config, HerdConfig::in_memory());
        assert!(config.database_path.is_none());
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn test_from_json() {
        let config =
            HerdConfig::from_json(r#"{"database_path": "/tmp/herd.db", "seed_demo_data": true}"#)
                .unwrap();
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/herd.db")));
        assert!(config.seed_demo_data);
    }

    #[test]
    fn test_bad_json() {
        let err = HerdConfig::from_json(r#"{"seed_demo_data": "yes"}"#).unwrap_err();
        assert!(matches!(err, HerdError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = HerdConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("not/here.json"));
    }

    // Both cases share one test: the process environment is global.
    #[test]
    fn test_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("herd.json");
        std::fs::write(&file, r#"{"database_path": "/tmp/file.db"}"#).unwrap();

        std::env::set_var(ENV_DATABASE_PATH, "/var/lib/herd.db");
        std::env::set_var(ENV_SEED_DEMO_DATA, "TRUE");
        let direct = HerdConfig::in_memory().with_env_overrides();
        let loaded = HerdConfig::load(&file);
        std::env::remove_var(ENV_DATABASE_PATH);
        std::env::remove_var(ENV_SEED_DEMO_DATA);

        assert_eq!(direct.database_path, Some(PathBuf::from("/var/lib/herd.db")));
        assert!(direct.seed_demo_data);
        let loaded = loaded.unwrap();
        assert_eq!(loaded.database_path, Some(PathBuf::from("/var/lib/herd.db")));
        assert!(loaded.seed_demo_data);
    }
}
