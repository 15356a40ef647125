//! Release tag lookup, used to find the version a comparison builds on.

use std::collections::HashMap;

use git2::{Oid, Repository};
use semver::Version;
use tracing::{debug, warn};

use crate::error::GitError;
use crate::version::is_bumpable;

/// Whether a tag is a plain `vX.Y.Z` / `X.Y.Z` release.
fn is_stable_release_tag(name: &str) -> bool {
    let raw = name.strip_prefix('v').unwrap_or(name);
    let parts: Vec<&str> = raw.split('.').collect();

    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

/// Version of the newest stable release tag reachable from `from`.
///
/// Walks history from `from` and returns the highest stable tag on the
/// first tagged commit found.
pub fn latest_release_version(repo: &Repository, from: Oid) -> Result<Option<Version>, GitError> {
    let releases = release_tags_by_commit(repo)?;
    if releases.is_empty() {
        debug!("No stable semver tags found in repository");
        return Ok(None);
    }

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk.push(from).map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
        .map_err(GitError::RevwalkError)?;

    for oid in revwalk {
        let oid = oid.map_err(GitError::RevwalkError)?;
        if let Some(latest) = releases.get(&oid).and_then(|v| v.iter().max()) {
            debug!(version = %latest, commit = %oid, "Found latest reachable release tag");
            return Ok(Some(latest.clone()));
        }
    }

    Ok(None)
}

/// Stable release versions keyed by the commit their tag points at.
fn release_tags_by_commit(repo: &Repository) -> Result<HashMap<Oid, Vec<Version>>, GitError> {
    let mut releases: HashMap<Oid, Vec<Version>> = HashMap::new();

    repo.tag_foreach(|oid, name_bytes| {
        let Ok(full_name) = std::str::from_utf8(name_bytes) else {
            warn!(%oid, "Skipping tag whose name is not valid UTF-8");
            return true;
        };
        let name = full_name.strip_prefix("refs/tags/").unwrap_or(full_name);

        let version = get_version_from_tag(name)
            .filter(|v| is_stable_release_tag(name) && is_bumpable(v));
        if let Some(version) = version {
            // Annotated tags point at a tag object, lightweight tags at the commit
            let commit = repo.find_tag(oid).map(|t| t.target_id()).unwrap_or(oid);
            releases.entry(commit).or_default().push(version);
        }
        true
    })
    .map_err(GitError::TagsFailed)?;

    Ok(releases)
}

/// Extract semver version from a tag name.
/// Handles both "v1.2.3" and "1.2.3" formats.
pub fn get_version_from_tag(tag_name: &str) -> Option<Version> {
    let version_str = tag_name.strip_prefix('v').unwrap_or(tag_name);
    Version::parse(version_str).ok()
}
