//! Error types for diffnote modules using thiserror.

use thiserror::Error;

/// Errors from local git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to find reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to parse commit: {0}")]
    ParseCommit(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to diff trees: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to list tags: {0}")]
    TagsFailed(#[source] git2::Error),

    #[error("Commit {hash} has invalid timestamp (seconds={seconds})")]
    InvalidTimestamp { hash: String, seconds: i64 },
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no valid auth found. Run 'gh auth login' or set GITHUB_TOKEN environment variable"
    )]
    AuthenticationFailed,

    #[error("Failed to build GitHub client: {0}")]
    ClientBuild(#[source] Box<octocrab::Error>),

    #[error("Failed to fetch comparison {base}...{head}: {source}")]
    FetchComparison {
        base: String,
        head: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Failed to fetch commit {sha}: {source}")]
    FetchCommit {
        sha: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Rate limited by GitHub API. Resets at: {reset_time}")]
    RateLimited { reset_time: String },

    #[error("Repository not found: {owner}/{repo}")]
    RepositoryNotFound { owner: String, repo: String },

    #[error("Failed to parse repository '{0}', expected owner/name")]
    InvalidRepository(String),
}

/// Errors from change sources (either provider).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),
}

/// Errors from reading or writing the release note log.
#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Failed to read release notes: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write release notes: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to replace release notes file: {0}")]
    PersistFailed(#[source] std::io::Error),
}

/// Errors from version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, #[source] semver::Error),

    #[error("Version '{0}' must be MAJOR.MINOR.PATCH without pre-release or build metadata")]
    NotPlainRelease(String),

    #[error("Version '{0}' has a component too large to bump")]
    ComponentOverflow(String),
}

/// Errors raised while classifying a single file.
///
/// These never escape the classifier; they are folded into the file's
/// description instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("record has an empty filename")]
    MissingFilename,

    #[error("patch is {len} bytes, above the {max} byte limit")]
    PatchTooLarge { len: usize, max: usize },
}

/// Errors from resolving run settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error("Repository has no '{0}' remote; pass --repo owner/name or set GITHUB_REPOSITORY")]
    MissingRemote(String),
}
