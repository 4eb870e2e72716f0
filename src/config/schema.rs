//! Configuration data structures.
//!
//! Defines the YAML config format: where the database lives and how the
//! separation query is executed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SocialGraphError};
use crate::graph::separation::DEFAULT_SEPARATION_THRESHOLD;

/// Environment variable that overrides `database.path`.
pub const DB_ENV_VAR: &str = "SOCIALGRAPH_DB";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration.
///
/// Loaded from an optional YAML file, then the `SOCIALGRAPH_DB`
/// environment override, then validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialGraphConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl Default for SocialGraphConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            database: DatabaseConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl SocialGraphConfig {
    /// Load configuration from `path` (or defaults), apply the environment
    /// override, and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_db = std::env::var(DB_ENV_VAR).ok();
        Self::load_with_env(path, env_db.as_deref())
    }

    /// [`SocialGraphConfig::load`] with the environment value passed in
    /// explicitly.
    pub fn load_with_env(path: Option<&Path>, env_db: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };
        if let Some(db) = env_db.map(str::trim).filter(|db| !db.is_empty()) {
            tracing::debug!(path = db, "database path overridden from environment");
            config.database.path = db.to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without environment overrides or validation.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(SocialGraphError::Config(
                "database.path must not be empty".to_string(),
            ));
        }
        if self.analytics.separation_threshold == 0 {
            return Err(SocialGraphError::Config(
                "analytics.separation_threshold must be at least 1".to_string(),
            ));
        }
        if self.analytics.worker_threads == Some(0) {
            return Err(SocialGraphError::Config(
                "analytics.worker_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// AnalyticsConfig
// ---------------------------------------------------------------------------

/// Execution settings for the analytics queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Minimum shortest-path length reported by `remote_pairs`.
    #[serde(default = "default_separation_threshold")]
    pub separation_threshold: u32,

    /// Run per-vertex BFS in parallel.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Dedicated worker pool size; `None` shares rayon's global pool.
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            separation_threshold: default_separation_threshold(),
            parallel: default_parallel(),
            worker_threads: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

fn default_separation_threshold() -> u32 {
    DEFAULT_SEPARATION_THRESHOLD
}

fn default_parallel() -> bool {
    true
}

/// `socialgraph.db` in the platform data directory, or the working
/// directory when no home directory can be resolved.
fn default_db_path() -> String {
    directories::ProjectDirs::from("", "", "socialgraph")
        .map(|dirs| dirs.data_dir().join("socialgraph.db"))
        .unwrap_or_else(|| PathBuf::from("socialgraph.db"))
        .to_string_lossy()
        .into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
