//! End-to-end tests: a real git repository, a mocked GitHub API.

mod common;

use chrono::{DateTime, TimeZone, Utc};
use chronicle::error::SummarizerError;
use chronicle::format::{OutputFormat, present};
use chronicle::github::{ChangeTypeTable, GitHubClient, GitHubSummarizer};
use chronicle::release::{DescriptionOptions, Summarizer, create_description};
use chronicle::LocalGit;
use common::{TestRepo, fast_retry, mock_client, mock_issue, mock_release};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn at(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap()
}

/// v1.0.0 on June 1st, v1.1.0 on June 20th.
fn tagged_repo() -> TestRepo {
    let repo = TestRepo::new();
    repo.remote("origin", "git@github.com:owner/repo.git");

    let first = repo.commit_at("Initial release", at(6, 1).timestamp());
    repo.tag_lightweight("v1.0.0", first);
    let second = repo.commit_at("Second release", at(6, 20).timestamp());
    repo.tag_annotated("v1.1.0", second, "Release v1.1.0");
    repo
}

async fn mock_github() -> MockServer {
    let server = MockServer::start().await;

    let issues = vec![
        mock_issue("owner", "repo", 10, "Fix login redirect", &["bug"], Some(at(6, 10))),
        mock_issue("owner", "repo", 11, "Old fix", &["bug"], Some(at(5, 20))),
        mock_issue("owner", "repo", 12, "Support SSO", &["enhancement"], Some(at(6, 5))),
        mock_issue("owner", "repo", 13, "How do I log in?", &["question"], Some(at(6, 12))),
        mock_issue("owner", "repo", 14, "Ignored crash", &["bug", "wontfix"], Some(at(6, 15))),
        mock_issue("owner", "repo", 15, "Fix logout", &["bug"], Some(at(6, 25))),
        mock_issue("owner", "repo", 16, "Still broken", &["bug"], None),
    ];

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            mock_release("owner", "repo", 3, "v1.2.0", None, Some(at(6, 28)), true),
            mock_release("owner", "repo", 2, "v1.1.0", Some(at(6, 21)), Some(at(6, 20)), false),
            mock_release("owner", "repo", 1, "v1.0.0", Some(at(6, 2)), Some(at(6, 1)), false),
        ]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases/tags/v1.1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_release(
            "owner",
            "repo",
            2,
            "v1.1.0",
            Some(at(6, 21)),
            Some(at(6, 20)),
            false,
        )))
        .mount(&server)
        .await;

    server
}

async fn summarizer(
    repo: &TestRepo,
    server: &MockServer,
) -> GitHubSummarizer<GitHubClient, LocalGit> {
    let client = GitHubClient::with_client(mock_client(server).await).with_retry(fast_retry(1));
    GitHubSummarizer::new(repo.path(), client, LocalGit, ChangeTypeTable::default()).unwrap()
}

#[tokio::test]
async fn test_changes_between_tags() {
    let repo = tagged_repo();
    let server = mock_github().await;
    let summarizer = summarizer(&repo, &server).await;

    assert_eq!(summarizer.coordinates().slug(), "owner/repo");

    let changes = summarizer.changes("v1.0.0", "v1.1.0").await.unwrap();

    let texts: Vec<&str> = changes.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Support SSO", "Fix login redirect", "Ignored crash"]);
    assert_eq!(changes[0].change_types, vec!["added"]);
    assert_eq!(changes[1].change_types, vec!["fixed"]);
    assert_eq!(changes[1].references[0].text, "#10");
    assert_eq!(
        changes[1].references[0].url,
        "https://github.com/owner/repo/issues/10"
    );
}

#[tokio::test]
async fn test_exclude_labels() {
    let repo = tagged_repo();
    let server = mock_github().await;
    let summarizer = summarizer(&repo, &server)
        .await
        .with_exclude_labels(vec!["wontfix".to_string()]);

    let changes = summarizer.changes("v1.0.0", "v1.1.0").await.unwrap();

    assert!(changes.iter().all(|c| c.text != "Ignored crash"));
    assert_eq!(changes.len(), 2);
}

#[tokio::test]
async fn test_unbounded_range() {
    let repo = tagged_repo();
    let server = mock_github().await;
    let summarizer = summarizer(&repo, &server).await;

    let changes = summarizer.changes("v1.1.0", "").await.unwrap();

    let texts: Vec<&str> = changes.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Fix logout"]);
}

#[tokio::test]
async fn test_unknown_tag() {
    let repo = tagged_repo();
    let server = mock_github().await;
    let summarizer = summarizer(&repo, &server).await;

    let err = summarizer.changes("v0.0.1", "").await.unwrap_err();

    assert!(matches!(err, SummarizerError::TagNotFound(ref tag) if tag == "v0.0.1"));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_last_release_skips_drafts() {
    let repo = tagged_repo();
    let server = mock_github().await;
    let summarizer = summarizer(&repo, &server).await;

    let release = summarizer.last_release().await.unwrap();

    assert_eq!(release.version, "v1.1.0");
    assert_eq!(release.date, at(6, 21));
}

#[tokio::test]
async fn test_missing_remote_is_an_error() {
    let repo = TestRepo::new();
    repo.commit_at("Initial", at(6, 1).timestamp());
    let server = mock_github().await;
    let client = GitHubClient::with_client(mock_client(&server).await);

    let result = GitHubSummarizer::new(repo.path(), client, LocalGit, ChangeTypeTable::default());

    assert!(matches!(result, Err(SummarizerError::Vcs { .. })));
}

#[tokio::test]
async fn test_describe_and_render_release() {
    let repo = tagged_repo();
    let server = mock_github().await;
    let summarizer = summarizer(&repo, &server).await
        .with_exclude_labels(vec!["wontfix".to_string()]);
    let table = ChangeTypeTable::default();

    let options = DescriptionOptions {
        since_tag: Some("v1.0.0".to_string()),
        until_tag: Some("v1.1.0".to_string()),
        ..Default::default()
    };
    let description = create_description(&summarizer, &table, &options)
        .await
        .unwrap();

    let rendered = present(&description, "Changelog", OutputFormat::Md).unwrap();

    let expected = "# Changelog\n\n\
## [v1.1.0](https://github.com/owner/repo/tree/v1.1.0) (2024-06-21)\n\n\
[(Full Changelog)](https://github.com/owner/repo/compare/v1.0.0...v1.1.0)\n\n\
### Added Features\n\n\
- Support SSO [[#12](https://github.com/owner/repo/issues/12)]\n\n\
### Bug Fixes\n\n\
- Fix login redirect [[#10](https://github.com/owner/repo/issues/10)]\n\n";

    assert_eq!(rendered, expected);
}

#[tokio::test]
async fn test_describe_speculates_from_latest_release() {
    let repo = tagged_repo();
    let server = mock_github().await;
    let summarizer = summarizer(&repo, &server).await;
    let table = ChangeTypeTable::default();

    let options = DescriptionOptions {
        speculate_next_version: true,
        ..Default::default()
    };
    let description = create_description(&summarizer, &table, &options)
        .await
        .unwrap();

    assert_eq!(description.release.version, "v1.1.1");
    assert_eq!(
        description.vcs_changes_url,
        "https://github.com/owner/repo/compare/v1.1.0...HEAD"
    );
    assert_eq!(description.changes.len(), 1);
}
