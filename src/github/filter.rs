//! Composable issue predicates.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::issues::{Issue, IssueState};

/// A predicate over an issue.
pub type IssueFilter = Box<dyn Fn(&Issue) -> bool + Send + Sync>;

/// Keep issues that pass every filter, in their original order.
///
/// An empty filter list keeps everything.
pub fn filter_issues(issues: Vec<Issue>, filters: &[IssueFilter]) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|issue| filters.iter().all(|keep| keep(issue)))
        .collect()
}

/// Issues in the closed state.
pub fn issues_closed() -> IssueFilter {
    Box::new(|issue| issue.state == IssueState::Closed)
}

/// Issues closed strictly after `since`.
pub fn issues_after(since: DateTime<Utc>) -> IssueFilter {
    Box::new(move |issue| issue.closed_at.is_some_and(|closed| closed > since))
}

/// Issues closed at or before `until`.
pub fn issues_before(until: DateTime<Utc>) -> IssueFilter {
    Box::new(move |issue| issue.closed_at.is_some_and(|closed| closed <= until))
}

/// Issues carrying at least one of `labels`.
pub fn issues_with_label<I, S>(labels: I) -> IssueFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let labels: HashSet<String> = labels.into_iter().map(Into::into).collect();
    Box::new(move |issue| issue.labels.iter().any(|l| labels.contains(l)))
}

/// Issues carrying none of `labels`.
pub fn issues_without_label<I, S>(labels: I) -> IssueFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let labels: HashSet<String> = labels.into_iter().map(Into::into).collect();
    Box::new(move |issue| !issue.labels.iter().any(|l| labels.contains(l)))
}
