//! Per-file diff collection between two commits using git2.

use git2::{Delta, Diff, DiffOptions, Patch, Repository};
use tracing::{debug, warn};

use crate::diff::{Comparison, DiffRecord, FileStatus};
use crate::error::GitError;

use super::commits::commit_info;
use super::range::resolve_commit;

/// Collect the comparison between `base` and `head` in a local repository.
pub fn collect_comparison(
    repo: &Repository,
    base: &str,
    head: &str,
) -> Result<Comparison, GitError> {
    let base_commit = resolve_commit(repo, base)?;
    let head_commit = resolve_commit(repo, head)?;

    let base_tree = base_commit.tree().map_err(GitError::ParseCommit)?;
    let head_tree = head_commit.tree().map_err(GitError::ParseCommit)?;

    let mut opts = DiffOptions::new();
    opts.context_lines(3);
    let mut diff = repo
        .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), Some(&mut opts))
        .map_err(GitError::DiffFailed)?;
    diff.find_similar(None).map_err(GitError::DiffFailed)?;

    let files = collect_records(&diff)?;
    debug!(base, head, files = files.len(), "Collected local comparison");

    Ok(Comparison {
        commit: commit_info(&head_commit)?,
        files,
    })
}

/// One [`DiffRecord`] per delta, in diff order.
fn collect_records(diff: &Diff<'_>) -> Result<Vec<DiffRecord>, GitError> {
    let mut records = Vec::with_capacity(diff.deltas().len());

    for (idx, delta) in diff.deltas().enumerate() {
        let status = match delta.status() {
            Delta::Added | Delta::Untracked => FileStatus::Added,
            Delta::Deleted => FileStatus::Removed,
            Delta::Modified => FileStatus::Modified,
            Delta::Renamed => FileStatus::Other("renamed".to_string()),
            Delta::Copied => FileStatus::Other("copied".to_string()),
            Delta::Typechange => FileStatus::Other("changed".to_string()),
            _ => FileStatus::Modified,
        };

        let filename = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut record = DiffRecord::new(filename, status);

        match Patch::from_diff(diff, idx).map_err(GitError::DiffFailed)? {
            Some(mut patch) => {
                let (_, additions, deletions) = patch.line_stats().map_err(GitError::DiffFailed)?;
                record = record.with_counts(additions as u64, deletions as u64);
                if !patch.delta().flags().is_binary() {
                    record.patch = patch_text(&mut patch);
                }
            }
            None => debug!(file = %record.filename, "No patch available (binary or unchanged)"),
        }

        records.push(record);
    }

    Ok(records)
}

/// Hunk headers and `+`/`-`/` ` lines, without file headers, the same
/// shape the GitHub API uses for `patch`.
fn patch_text(patch: &mut Patch<'_>) -> Option<String> {
    let mut text = String::new();

    let result = patch.print(&mut |_delta, _hunk, line| {
        let content = String::from_utf8_lossy(line.content());
        match line.origin() {
            'H' => text.push_str(&content),
            origin @ ('+' | '-' | ' ') => {
                text.push(origin);
                text.push_str(&content);
            }
            _ => {}
        }
        true
    });

    if let Err(e) = result {
        warn!("Failed to render patch text: {e}");
        return None;
    }

    let text = text.trim_end_matches('\n').to_string();
    if text.is_empty() { None } else { Some(text) }
}
