//! Input data model: changed files and commit metadata.

pub mod record;

pub use record::{CommitInfo, Comparison, DiffRecord, FileStatus};
