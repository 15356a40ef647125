//! Repository identification: `owner/name` slugs and remote URLs.

use std::fmt;
use std::str::FromStr;

use crate::error::GitHubError;

/// A GitHub repository, as in `GITHUB_REPOSITORY=owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(GitHubError::InvalidRepository(s.to_string())),
        }
    }
}

/// Extract owner and repo from a git remote URL.
pub fn parse_github_remote(url: &str) -> Result<RepoSlug, GitHubError> {
    // Handle SSH format: git@github.com:owner/repo.git
    if let Some(path) = url.strip_prefix("git@github.com:") {
        return parse_owner_repo_path(url, path);
    }

    // Handle HTTPS format: https://github.com/owner/repo.git
    if let Some(path) = url.split("github.com/").nth(1) {
        return parse_owner_repo_path(url, path);
    }

    Err(GitHubError::InvalidRepository(url.to_string()))
}

fn parse_owner_repo_path(url: &str, path: &str) -> Result<RepoSlug, GitHubError> {
    let path = path.strip_suffix(".git").unwrap_or(path);
    let parts: Vec<&str> = path.split('/').collect();

    match parts.as_slice() {
        [owner, name, ..] if !owner.is_empty() && !name.is_empty() => {
            Ok(RepoSlug::new(*owner, *name))
        }
        _ => Err(GitHubError::InvalidRepository(url.to_string())),
    }
}
