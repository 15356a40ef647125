//! diffnote - generates a release note from the files changed in a commit.
//!
//! # Overview
//!
//! diffnote reads the per-file diffs of a commit (from the GitHub compare API
//! or a local repository), classifies each change with pattern rules, infers
//! the semantic version bump, groups the changes into themed sections, and
//! prepends an emoji-tagged note to a plain-text release log.

pub mod classify;
pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod github;
pub mod notes;
pub mod source;
pub mod version;

// Re-export commonly used types
pub use classify::{ChangeClassification, Classifier};
pub use diff::{CommitInfo, Comparison, DiffRecord, FileStatus};
pub use error::{
    ClassifyError, ConfigError, GitError, GitHubError, NoteError, SourceError, VersionError,
};
pub use notes::{Bucket, CategoryBuckets, ReleaseNote, ReleaseNoteInput};
pub use source::{ChangeSource, CompareRange, GitHubSource, LocalGitSource};
pub use version::{BumpType, VersionDecision};
