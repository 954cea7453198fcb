//! Change summaries produced by a summarizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A link back to where a change came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub text: String,
    pub url: String,
}

/// One categorized change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub text: String,
    pub change_types: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub references: Vec<Reference>,
}

impl ChangeSummary {
    pub fn has_change_type(&self, name: &str) -> bool {
        self.change_types.iter().any(|t| t == name)
    }
}
