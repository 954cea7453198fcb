//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, Utc};
use chronicle::github::RetryPolicy;
use git2::{Oid, Repository, Signature, Time};
use octocrab::Octocrab;
use serde_json::{Map, Value, json};
use wiremock::MockServer;

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Create a commit with the given message, authored and committed at
    /// `seconds` since the Unix epoch. Returns the commit OID.
    pub fn commit_at(&self, message: &str, seconds: i64) -> Oid {
        let time = Time::new(seconds, 0);
        let sig = Signature::new("Test User", "test@example.com", &time)
            .expect("Failed to create signature");

        // Create or update a file to have something to commit
        let file_path = self.dir.path().join("test.txt");
        std::fs::write(&file_path, format!("{}\n{}", message, seconds))
            .expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(std::path::Path::new("test.txt"))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a lightweight tag pointing to the given OID.
    pub fn tag_lightweight(&self, name: &str, oid: Oid) {
        let obj = self
            .repo
            .find_object(oid, None)
            .expect("Failed to find object");
        self.repo
            .tag_lightweight(name, &obj, false)
            .expect("Failed to create lightweight tag");
    }

    /// Create an annotated tag pointing to the given OID.
    pub fn tag_annotated(&self, name: &str, oid: Oid, message: &str) {
        let sig = Signature::now("Test User", "test@example.com")
            .expect("Failed to create signature");
        let obj = self
            .repo
            .find_object(oid, None)
            .expect("Failed to find object");
        self.repo
            .tag(name, &obj, &sig, message, false)
            .expect("Failed to create annotated tag");
    }

    /// Add a remote.
    pub fn remote(&self, name: &str, url: &str) {
        self.repo
            .remote(name, url)
            .expect("Failed to create remote");
    }
}

/// A retry policy that does not make tests wait.
pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_interval: Duration::from_millis(1),
        max_interval: Duration::from_millis(5),
    }
}

/// Helper to create an octocrab client pointing to a mock server.
pub async fn mock_client(server: &MockServer) -> Octocrab {
    Octocrab::builder()
        .base_uri(server.uri())
        .expect("Failed to set base URI")
        .build()
        .expect("Failed to build octocrab")
}

/// Create a mock user object with all fields GitHub API returns.
pub fn mock_user(login: &str, id: u64) -> Value {
    let mut user = Map::new();
    user.insert("login".into(), json!(login));
    user.insert("id".into(), json!(id));
    user.insert("node_id".into(), json!(format!("MDQ6VXNlcnt{}", id)));
    user.insert("avatar_url".into(), json!(format!("https://avatars.githubusercontent.com/u/{}?v=4", id)));
    user.insert("gravatar_id".into(), json!(""));
    user.insert("url".into(), json!(format!("https://api.github.com/users/{}", login)));
    user.insert("html_url".into(), json!(format!("https://github.com/{}", login)));
    user.insert("followers_url".into(), json!(format!("https://api.github.com/users/{}/followers", login)));
    user.insert("following_url".into(), json!(format!("https://api.github.com/users/{}/following{{/other_user}}", login)));
    user.insert("gists_url".into(), json!(format!("https://api.github.com/users/{}/gists{{/gist_id}}", login)));
    user.insert("starred_url".into(), json!(format!("https://api.github.com/users/{}/starred{{/owner}}{{/repo}}", login)));
    user.insert("subscriptions_url".into(), json!(format!("https://api.github.com/users/{}/subscriptions", login)));
    user.insert("organizations_url".into(), json!(format!("https://api.github.com/users/{}/orgs", login)));
    user.insert("repos_url".into(), json!(format!("https://api.github.com/users/{}/repos", login)));
    user.insert("events_url".into(), json!(format!("https://api.github.com/users/{}/events{{/privacy}}", login)));
    user.insert("received_events_url".into(), json!(format!("https://api.github.com/users/{}/received_events", login)));
    user.insert("type".into(), json!("User"));
    user.insert("site_admin".into(), json!(false));
    Value::Object(user)
}

fn mock_labels(owner: &str, repo: &str, labels: &[&str]) -> Vec<Value> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| {
            json!({
                "id": i + 1,
                "node_id": format!("L_{}", i + 1),
                "url": format!("https://api.github.com/repos/{}/{}/labels/{}", owner, repo, l),
                "name": *l,
                "description": null,
                "color": "fc2929",
                "default": false
            })
        })
        .collect()
}

/// Create a complete mock issue JSON that matches GitHub's API and octocrab's expectations.
///
/// The issue is closed when `closed_at` is set and open otherwise.
pub fn mock_issue(
    owner: &str,
    repo: &str,
    number: u64,
    title: &str,
    labels: &[&str],
    closed_at: Option<DateTime<Utc>>,
) -> Value {
    let api = format!("https://api.github.com/repos/{}/{}", owner, repo);

    // Build the issue object using a Map to avoid macro recursion limits
    let mut issue = Map::new();
    issue.insert("id".into(), json!(number * 1000));
    issue.insert("node_id".into(), json!(format!("I_{}", number)));
    issue.insert("url".into(), json!(format!("{}/issues/{}", api, number)));
    issue.insert("repository_url".into(), json!(api));
    issue.insert("labels_url".into(), json!(format!("{}/issues/{}/labels{{/name}}", api, number)));
    issue.insert("comments_url".into(), json!(format!("{}/issues/{}/comments", api, number)));
    issue.insert("events_url".into(), json!(format!("{}/issues/{}/events", api, number)));
    issue.insert("html_url".into(), json!(format!("https://github.com/{}/{}/issues/{}", owner, repo, number)));
    issue.insert("number".into(), json!(number));
    issue.insert("state".into(), json!(if closed_at.is_some() { "closed" } else { "open" }));
    issue.insert("title".into(), json!(title));
    issue.insert("body".into(), json!(format!("Body of issue {}", number)));
    issue.insert("user".into(), mock_user("reporter", 100));
    issue.insert("labels".into(), json!(mock_labels(owner, repo, labels)));
    issue.insert("assignee".into(), Value::Null);
    issue.insert("assignees".into(), json!([]));
    issue.insert("author_association".into(), json!("CONTRIBUTOR"));
    issue.insert("milestone".into(), Value::Null);
    issue.insert("locked".into(), json!(false));
    issue.insert("active_lock_reason".into(), Value::Null);
    issue.insert("comments".into(), json!(0));
    issue.insert("closed_at".into(), json!(closed_at.map(|d| d.to_rfc3339())));
    issue.insert("closed_by".into(), Value::Null);
    issue.insert("created_at".into(), json!("2024-01-01T00:00:00Z"));
    issue.insert("updated_at".into(), json!("2024-01-15T00:00:00Z"));
    Value::Object(issue)
}

/// Create a complete mock release JSON.
pub fn mock_release(
    owner: &str,
    repo: &str,
    id: u64,
    tag: &str,
    published_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    draft: bool,
) -> Value {
    let api = format!("https://api.github.com/repos/{}/{}", owner, repo);

    let mut release = Map::new();
    release.insert("url".into(), json!(format!("{}/releases/{}", api, id)));
    release.insert("html_url".into(), json!(format!("https://github.com/{}/{}/releases/tag/{}", owner, repo, tag)));
    release.insert("assets_url".into(), json!(format!("{}/releases/{}/assets", api, id)));
    release.insert("upload_url".into(), json!(format!("https://uploads.github.com/repos/{}/{}/releases/{}/assets{{?name,label}}", owner, repo, id)));
    release.insert("tarball_url".into(), json!(format!("{}/tarball/{}", api, tag)));
    release.insert("zipball_url".into(), json!(format!("{}/zipball/{}", api, tag)));
    release.insert("id".into(), json!(id));
    release.insert("node_id".into(), json!(format!("RE_{}", id)));
    release.insert("tag_name".into(), json!(tag));
    release.insert("target_commitish".into(), json!("main"));
    release.insert("name".into(), json!(tag));
    release.insert("body".into(), json!(format!("Release {}", tag)));
    release.insert("draft".into(), json!(draft));
    release.insert("prerelease".into(), json!(false));
    release.insert("created_at".into(), json!(created_at.map(|d| d.to_rfc3339())));
    release.insert("published_at".into(), json!(published_at.map(|d| d.to_rfc3339())));
    release.insert("author".into(), mock_user("releaser", 300));
    release.insert("assets".into(), json!([]));
    Value::Object(release)
}
