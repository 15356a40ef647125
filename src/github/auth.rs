//! GitHub token lookup.
//!
//! Order:
//! 1. GITHUB_TOKEN env var (set by GitHub Actions)
//! 2. GH_TOKEN env var
//! 3. `gh auth token` (gh CLI)

use std::env;
use std::process::Command;

use tracing::debug;

use crate::error::GitHubError;

const TOKEN_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// Get a GitHub token from the environment or the gh CLI.
pub fn get_github_token() -> Result<String, GitHubError> {
    if let Some(token) = token_from_env() {
        return Ok(token);
    }

    if let Some(token) = token_from_gh_cli() {
        debug!("Using token from gh CLI");
        return Ok(token);
    }

    Err(GitHubError::AuthenticationFailed)
}

/// First non-empty token among the supported environment variables.
pub fn token_from_env() -> Option<String> {
    TOKEN_VARS.iter().find_map(|var| {
        env::var(var)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

fn token_from_gh_cli() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}
