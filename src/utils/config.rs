//! Application configuration

use crate::utils::error::{GradebookError, Result};
use crate::utils::paths::default_database_url;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database connection settings
    pub database: DatabaseConfig,
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite://gradebook.db`
    pub url: String,

    /// Upper bound on pooled connections
    pub max_connections: u32,

    /// Log every executed statement
    pub echo: bool,

    /// What happens to notes when the student they reference is deleted
    pub delete_policy: DeletePolicy,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: 5,
            echo: false,
            delete_policy: DeletePolicy::Nullify,
        }
    }
}

/// Handling of notes that reference a student being deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse the delete while any note references the student
    Restrict,
    /// Keep the notes and clear their student reference
    Nullify,
    /// Delete the notes together with the student
    Cascade,
}

impl DeletePolicy {
    /// Get string representation for display
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletePolicy::Restrict => "restrict",
            DeletePolicy::Nullify => "nullify",
            DeletePolicy::Cascade => "cascade",
        }
    }
}

impl Config {
    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the database layer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(GradebookError::Config("database url is empty".into()));
        }
        if self.database.max_connections == 0 {
            return Err(GradebookError::Config(
                "max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
