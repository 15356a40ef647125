//! Reference resolution for comparison endpoints.

use git2::{Commit, Oid, Repository};

use crate::error::GitError;

/// Resolve a reference (tag, branch, commit hash, `HEAD^`) to a commit.
pub fn resolve_commit<'r>(repo: &'r Repository, reference: &str) -> Result<Commit<'r>, GitError> {
    // Try as a direct OID first
    if let Ok(oid) = Oid::from_str(reference) {
        if let Ok(commit) = repo.find_commit(oid) {
            return Ok(commit);
        }
    }

    let obj = repo
        .revparse_single(reference)
        .map_err(|e| GitError::ReferenceNotFound(reference.to_string(), e))?;

    obj.peel_to_commit().map_err(GitError::ParseCommit)
}

/// Default base for a head reference: its first parent.
pub fn default_base(head: &str) -> String {
    format!("{}^", head)
}
