//! Markdown changelog rendering.

use crate::github::labels::ChangeType;
use crate::release::{ChangeSummary, Description};

pub const DEFAULT_TITLE: &str = "Changelog";

/// Group changes by change type, in the order the change types are declared.
///
/// A change with several change types appears under each of them. Change types
/// with no changes are left out.
pub fn changes_by_type<'a>(
    supported: &'a [ChangeType],
    changes: &'a [ChangeSummary],
) -> Vec<(&'a ChangeType, Vec<&'a ChangeSummary>)> {
    supported
        .iter()
        .map(|change_type| {
            let entries = changes
                .iter()
                .filter(|change| change.has_change_type(&change_type.name))
                .collect::<Vec<_>>();
            (change_type, entries)
        })
        .filter(|(_, entries)| !entries.is_empty())
        .collect()
}

fn format_entry(change: &ChangeSummary) -> String {
    let references = change
        .references
        .iter()
        .map(|r| format!("[{}]({})", r.text, r.url))
        .collect::<Vec<_>>()
        .join(" ");

    if references.is_empty() {
        format!("- {}", change.text)
    } else {
        format!("- {} [{}]", change.text, references)
    }
}

/// Render a release section with a title header.
pub fn render_markdown(description: &Description, title: &str) -> String {
    let title = if title.is_empty() { DEFAULT_TITLE } else { title };
    let release = &description.release;

    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", title));
    out.push_str(&format!(
        "## [{}]({}) ({})\n\n",
        release.version,
        description.vcs_reference_url,
        release.date.format("%Y-%m-%d")
    ));
    out.push_str(&format!(
        "[(Full Changelog)]({})\n\n",
        description.vcs_changes_url
    ));

    let grouped = changes_by_type(&description.supported_changes, &description.changes);
    if grouped.is_empty() {
        out.push_str("No notable changes.\n");
        return out;
    }

    for (change_type, entries) in grouped {
        out.push_str(&format!("### {}\n\n", change_type.title));
        for entry in entries {
            out.push_str(&format_entry(entry));
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// One-line summary for the user, e.g. `3 changes (2 bug fixes, 1 added features)`.
pub fn summary_line(description: &Description) -> String {
    let total = description.changes.len();
    if total == 0 {
        return "No notable changes".to_string();
    }

    let counts = changes_by_type(&description.supported_changes, &description.changes)
        .into_iter()
        .map(|(change_type, entries)| {
            format!("{} {}", entries.len(), change_type.title.to_lowercase())
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} change{} ({})",
        total,
        if total == 1 { "" } else { "s" },
        counts
    )
}
