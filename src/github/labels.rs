//! Label to change-type classification.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::release::BumpType;

/// A category of change, e.g. `added` or `fixed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeType {
    pub name: String,
    pub title: String,
    pub bump: BumpType,
}

impl ChangeType {
    fn new(name: &str, title: &str, bump: BumpType) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            bump,
        }
    }

    /// A change type known only by name, e.g. one introduced by a label override.
    fn from_name(name: &str) -> Self {
        let title = name
            .split(['-', '_'])
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ");

        Self {
            name: name.to_string(),
            title,
            bump: BumpType::Patch,
        }
    }
}

/// Built-in change types, in presentation order, with the labels that select them.
const DEFAULT_CHANGE_TYPES: &[(&str, &str, BumpType, &[&str])] = &[
    (
        "breaking-change",
        "Breaking Changes",
        BumpType::Major,
        &["breaking", "breaking-change", "backwards-incompatible"],
    ),
    (
        "security",
        "Security Fixes",
        BumpType::Patch,
        &["security", "vulnerability"],
    ),
    (
        "added",
        "Added Features",
        BumpType::Minor,
        &["enhancement", "feature"],
    ),
    ("deprecated", "Deprecated", BumpType::Minor, &["deprecated"]),
    ("removed", "Removed", BumpType::Major, &["removed"]),
    ("fixed", "Bug Fixes", BumpType::Patch, &["bug", "fix", "bug-fix"]),
];

/// Immutable mapping from label name to the change types it selects.
///
/// Label names are case-sensitive. Every label in the table maps to at least
/// one change type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeTypeTable {
    types: Vec<ChangeType>,
    by_label: BTreeMap<String, Vec<String>>,
}

impl Default for ChangeTypeTable {
    fn default() -> Self {
        let mut types = Vec::new();
        let mut by_label: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (name, title, bump, labels) in DEFAULT_CHANGE_TYPES {
            types.push(ChangeType::new(name, title, *bump));
            for label in *labels {
                by_label
                    .entry(label.to_string())
                    .or_default()
                    .push(name.to_string());
            }
        }

        Self { types, by_label }
    }
}

impl ChangeTypeTable {
    /// The default table with per-label overrides applied.
    ///
    /// An override replaces the default mapping of its label; an override with
    /// no change types removes the label. Change types not in the defaults are
    /// appended after the built-in ones, in the order they are first seen.
    pub fn with_overrides(overrides: &BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::default();

        for (label, change_types) in overrides {
            let mut names: Vec<String> = Vec::new();
            for name in change_types {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }

            if names.is_empty() {
                table.by_label.remove(label);
                continue;
            }

            for name in &names {
                if table.definition(name).is_none() {
                    table.types.push(ChangeType::from_name(name));
                }
            }
            table.by_label.insert(label.clone(), names);
        }

        table
    }

    /// Every change type selected by any of `labels`, without duplicates and in
    /// table order. Unknown labels are ignored.
    pub fn change_types<S: AsRef<str>>(&self, labels: &[S]) -> Vec<String> {
        let selected: BTreeSet<&str> = labels
            .iter()
            .filter_map(|label| self.by_label.get(label.as_ref()))
            .flatten()
            .map(String::as_str)
            .collect();

        self.types
            .iter()
            .filter(|t| selected.contains(t.name.as_str()))
            .map(|t| t.name.clone())
            .collect()
    }

    /// Every label known to the table, sorted.
    pub fn labels(&self) -> Vec<String> {
        self.by_label.keys().cloned().collect()
    }

    /// Change type definitions in presentation order.
    pub fn definitions(&self) -> &[ChangeType] {
        &self.types
    }

    pub fn definition(&self, name: &str) -> Option<&ChangeType> {
        self.types.iter().find(|t| t.name == name)
    }
}
