//! The `github` section of the application config.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::github::labels::ChangeTypeTable;
use crate::github::retry::{DEFAULT_MAX_ATTEMPTS, RetryPolicy};

use super::ConfigSection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// Label name to the change types it selects, overriding the defaults.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, Vec<String>>,
    /// Issues with any of these labels are left out of the changelog.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_labels: Vec<String>,
    pub max_attempts: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            labels: BTreeMap::new(),
            exclude_labels: Vec::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ConfigSection for GitHubConfig {
    fn name(&self) -> &'static str {
        "github"
    }

    fn apply_defaults(&mut self) {
        self.exclude_labels.retain(|label| !label.trim().is_empty());
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "github.max-attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        for (label, change_types) in &self.labels {
            if label.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "github.labels".to_string(),
                    message: "label names must not be empty".to_string(),
                });
            }
            if change_types.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: format!("github.labels.{}", label),
                    message: "change type names must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl GitHubConfig {
    pub fn change_type_table(&self) -> ChangeTypeTable {
        ChangeTypeTable::with_overrides(&self.labels)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_attempts(self.max_attempts)
    }
}
