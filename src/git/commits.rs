//! Commit metadata extraction.

use chrono::{DateTime, FixedOffset, TimeZone};
use git2::Commit;

use crate::diff::CommitInfo;
use crate::error::GitError;

const UNKNOWN_AUTHOR: &str = "Unknown";

/// Build [`CommitInfo`] from a git2 commit, using the author's own timezone.
pub fn commit_info(commit: &Commit) -> Result<CommitInfo, GitError> {
    let hash = commit.id().to_string();
    let author = commit.author();
    let name = author
        .name()
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string();

    let timestamp = authored_at(commit).ok_or_else(|| GitError::InvalidTimestamp {
        hash: hash.clone(),
        seconds: commit.author().when().seconds(),
    })?;

    Ok(CommitInfo {
        author: name,
        date: timestamp.format("%Y-%m-%d").to_string(),
        time: timestamp.format("%H:%M:%S").to_string(),
        sha: Some(hash),
        message: commit.message().map(str::to_string),
    })
}

fn authored_at(commit: &Commit) -> Option<DateTime<FixedOffset>> {
    let when = commit.author().when();
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60)?;
    offset.timestamp_opt(when.seconds(), 0).single()
}
