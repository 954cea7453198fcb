//! GitHub authentication detection.
//!
//! Auth order:
//! 1. Check `gh auth status` (gh CLI)
//! 2. Fall back to GITHUB_TOKEN env var
//! 3. Fall back to GH_TOKEN env var

use std::env;
use std::process::Command;

use crate::error::GitHubError;

const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Get a GitHub token using the configured auth strategy.
pub fn get_github_token() -> Result<String, GitHubError> {
    if let Some(token) = get_token_from_gh_cli() {
        return Ok(token);
    }

    get_token_from_env(|name| env::var(name).ok()).ok_or(GitHubError::AuthenticationFailed)
}

/// First non-empty token among the supported environment variables.
fn get_token_from_env<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_VARS
        .iter()
        .filter_map(|name| lookup(*name))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}

/// Try to get a token from the gh CLI.
fn get_token_from_gh_cli() -> Option<String> {
    // First check if gh is authenticated
    let status = Command::new("gh")
        .args(["auth", "status"])
        .output()
        .ok()?;

    if !status.status.success() {
        return None;
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}
