//! Providers of commit comparisons.
//!
//! The analysis only needs a [`Comparison`]; where it comes from is behind
//! the [`ChangeSource`] trait so the GitHub API and a local clone are
//! interchangeable, and tests can substitute their own.

use std::path::PathBuf;

use async_trait::async_trait;
use git2::Repository;
use octocrab::Octocrab;
use tracing::info;

use crate::diff::Comparison;
use crate::error::{GitError, SourceError};
use crate::git::{collect_comparison, default_base};
use crate::github::{fetch_comparison_with_client, RepoSlug};

/// The two ends of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRange {
    /// Base reference. `None` means the head's first parent.
    pub base: Option<String>,
    pub head: String,
}

impl CompareRange {
    pub fn new(base: Option<String>, head: impl Into<String>) -> Self {
        Self {
            base,
            head: head.into(),
        }
    }
}

/// Trait for fetching the files changed in a range.
///
/// This abstraction allows mocking the provider in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChangeSource: Send + Sync {
    /// Fetch the commit metadata and changed files for a range.
    async fn compare(&self, range: &CompareRange) -> Result<Comparison, SourceError>;
}

/// Comparisons from the GitHub compare API.
pub struct GitHubSource {
    client: Octocrab,
    repo: RepoSlug,
}

impl GitHubSource {
    pub fn new(client: Octocrab, repo: RepoSlug) -> Self {
        Self { client, repo }
    }
}

#[async_trait]
impl ChangeSource for GitHubSource {
    async fn compare(&self, range: &CompareRange) -> Result<Comparison, SourceError> {
        let comparison = fetch_comparison_with_client(
            &self.client,
            &self.repo,
            range.base.as_deref(),
            &range.head,
        )
        .await?;

        info!(
            repo = %self.repo,
            files = comparison.files.len(),
            "Fetched comparison from GitHub"
        );
        Ok(comparison)
    }
}

/// Comparisons from a local repository.
pub struct LocalGitSource {
    path: PathBuf,
}

impl LocalGitSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ChangeSource for LocalGitSource {
    async fn compare(&self, range: &CompareRange) -> Result<Comparison, SourceError> {
        let repo = Repository::open(&self.path).map_err(GitError::OpenRepository)?;
        let base = range
            .base
            .clone()
            .unwrap_or_else(|| default_base(&range.head));

        let comparison = collect_comparison(&repo, &base, &range.head)?;

        info!(
            path = %self.path.display(),
            files = comparison.files.len(),
            "Collected comparison from local repository"
        );
        Ok(comparison)
    }
}

/// Fetch a comparison, logging which range was requested.
pub async fn fetch_comparison<S: ChangeSource + ?Sized>(
    source: &S,
    range: &CompareRange,
) -> Result<Comparison, SourceError> {
    tracing::debug!(base = ?range.base, head = %range.head, "Fetching comparison");
    source.compare(range).await
}
