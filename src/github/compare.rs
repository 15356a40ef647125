//! Commit comparison fetching via octocrab.

use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::diff::{CommitInfo, Comparison, DiffRecord};
use crate::error::GitHubError;

use super::repo::RepoSlug;

/// GitHub stops listing files after this many entries in a comparison.
const MAX_COMPARE_FILES: usize = 300;

const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct CompareResponse {
    #[serde(default)]
    files: Vec<DiffRecord>,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
    commit: CommitDetail,
    author: Option<GitHubUser>,
    #[serde(default)]
    parents: Vec<CommitParent>,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: Option<GitSignature>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct GitSignature {
    name: Option<String>,
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CommitParent {
    sha: String,
}

/// Build an octocrab client from a token and optional API base URL.
pub fn build_client(token: &str, api_url: Option<&str>) -> Result<Octocrab, GitHubError> {
    let mut builder = Octocrab::builder().personal_token(token.to_string());

    if let Some(url) = api_url {
        builder = builder
            .base_uri(url)
            .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?;
    }

    builder
        .build()
        .map_err(|e| GitHubError::ClientBuild(Box::new(e)))
}

/// Fetch the files changed between `base` and `head`, plus the head commit's metadata.
///
/// When `base` is `None`, the first parent of `head` is used.
pub async fn fetch_comparison_with_client(
    octocrab: &Octocrab,
    repo: &RepoSlug,
    base: Option<&str>,
    head: &str,
) -> Result<Comparison, GitHubError> {
    let head_commit = fetch_commit(octocrab, repo, head).await?;

    let base = match base {
        Some(base) => base.to_string(),
        None => match head_commit.parents.first() {
            Some(parent) => parent.sha.clone(),
            None => {
                warn!(sha = %head_commit.sha, "Head commit has no parent; comparing against itself");
                head_commit.sha.clone()
            }
        },
    };

    let route = format!(
        "/repos/{}/{}/compare/{}...{}",
        repo.owner, repo.name, base, head_commit.sha
    );
    debug!(%route, "Fetching comparison");

    let compare: CompareResponse = octocrab
        .get(&route, None::<&()>)
        .await
        .map_err(|e| {
            map_octocrab_error(e, repo, |source| GitHubError::FetchComparison {
                base: base.clone(),
                head: head.to_string(),
                source,
            })
        })?;

    if compare.files.len() >= MAX_COMPARE_FILES {
        warn!(
            files = compare.files.len(),
            "GitHub truncates comparisons at {} files; later files are missing", MAX_COMPARE_FILES
        );
    }

    Ok(Comparison {
        commit: commit_info(head_commit),
        files: compare.files,
    })
}

async fn fetch_commit(
    octocrab: &Octocrab,
    repo: &RepoSlug,
    sha: &str,
) -> Result<CommitResponse, GitHubError> {
    let route = format!("/repos/{}/{}/commits/{}", repo.owner, repo.name, sha);
    debug!(%route, "Fetching commit");

    octocrab.get(&route, None::<&()>).await.map_err(|e| {
        map_octocrab_error(e, repo, |source| GitHubError::FetchCommit {
            sha: sha.to_string(),
            source,
        })
    })
}

fn commit_info(response: CommitResponse) -> CommitInfo {
    let signature = response.commit.author;
    let date = signature.as_ref().and_then(|s| s.date);

    let author = response
        .author
        .map(|user| user.login)
        .or_else(|| signature.and_then(|s| s.name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let (date, time) = match date {
        Some(d) => (d.format("%Y-%m-%d").to_string(), d.format("%H:%M:%S").to_string()),
        None => (String::new(), String::new()),
    };

    CommitInfo {
        author,
        date,
        time,
        sha: Some(response.sha),
        message: Some(response.commit.message),
    }
}

/// Map an octocrab error to a specific variant where the message allows it.
fn map_octocrab_error(
    e: octocrab::Error,
    repo: &RepoSlug,
    fallback: impl FnOnce(Box<octocrab::Error>) -> GitHubError,
) -> GitHubError {
    // Check error content using both Display and Debug output
    // to handle different octocrab error formats
    let err_display = e.to_string();
    let err_debug = format!("{:?}", e);

    if err_display.to_lowercase().contains("rate limit")
        || err_debug.to_lowercase().contains("rate limit")
    {
        return GitHubError::RateLimited {
            reset_time: "unknown".to_string(),
        };
    }

    if err_display.contains("Not Found") || err_debug.contains("Not Found") {
        return GitHubError::RepositoryNotFound {
            owner: repo.owner.clone(),
            repo: repo.name.clone(),
        };
    }

    fallback(Box::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> CommitResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_commit_info_prefers_login() {
        let info = commit_info(response(
            r#"{"sha": "abc", "author": {"login": "octocat"},
                "commit": {"author": {"name": "Mona", "date": "2024-05-02T10:11:12Z"}, "message": "m"}}"#,
        ));
        assert_eq!(info.author, "octocat");
        assert_eq!(info.date, "2024-05-02");
        assert_eq!(info.time, "10:11:12");
        assert_eq!(info.sha.as_deref(), Some("abc"));
    }

    #[test]
    fn test_commit_info_falls_back_to_git_name() {
        let info = commit_info(response(
            r#"{"sha": "abc", "author": null,
                "commit": {"author": {"name": "Mona", "date": "2024-05-02T10:11:12Z"}, "message": ""}}"#,
        ));
        assert_eq!(info.author, "Mona");
    }

    #[test]
    fn test_commit_info_unknown_author() {
        let info = commit_info(response(
            r#"{"sha": "abc", "author": null, "commit": {"author": null}}"#,
        ));
        assert_eq!(info.author, "Unknown");
        assert_eq!(info.date, "");
    }
}
