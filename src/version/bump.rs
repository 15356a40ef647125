//! Semver inference from changed files.

use std::fmt;

use semver::Version;
use tracing::debug;

use crate::classify::matchers::{has_added_function, has_added_route, has_route_suffix};
use crate::diff::{DiffRecord, FileStatus};
use crate::error::VersionError;

const API_SIGNALS: &[&str] = &["api", "endpoint"];
const REMOVAL_SIGNALS: &[&str] = &["remove", "delete"];
const MIGRATION_SIGNALS: &[&str] = &["migration", "schema"];
const CREATION_SIGNALS: &[&str] = &["create"];

/// Type of version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl BumpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen bump together with the version it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDecision {
    pub bump: BumpType,
    pub previous: Version,
    pub version: Version,
}

impl VersionDecision {
    pub fn is_major(&self) -> bool {
        self.bump == BumpType::Major
    }

    pub fn is_minor(&self) -> bool {
        self.bump == BumpType::Minor
    }

    pub fn is_patch(&self) -> bool {
        self.bump == BumpType::Patch
    }
}

/// Decide the next version for a set of changed files.
///
/// - Breaking API removals or new schema migrations = major bump
/// - New functions or routes = minor bump
/// - Anything else = patch bump
pub fn decide_version(previous: &Version, records: &[DiffRecord]) -> VersionDecision {
    let bump = determine_bump_type(records);
    let version = apply_bump_to_version(previous, bump);

    debug!(%previous, %version, %bump, "Decided version bump");

    VersionDecision {
        bump,
        previous: previous.clone(),
        version,
    }
}

/// Apply a bump to a version, resetting lower components.
///
/// A component already at `u64::MAX` stays there; [`parse_version`] rejects
/// such versions so this only happens for hand-built inputs.
pub fn apply_bump_to_version(base: &Version, bump: BumpType) -> Version {
    match bump {
        BumpType::Major => Version::new(base.major.saturating_add(1), 0, 0),
        BumpType::Minor => Version::new(base.major, base.minor.saturating_add(1), 0),
        BumpType::Patch => Version::new(base.major, base.minor, base.patch.saturating_add(1)),
    }
}

/// Whether every kind of bump can still be applied to `version`.
pub fn is_bumpable(version: &Version) -> bool {
    [version.major, version.minor, version.patch]
        .iter()
        .all(|c| *c < u64::MAX)
}

/// Determine the bump type from a list of changed files.
///
/// Major is checked across all files before minor is considered; each scan
/// stops at the first file that matches.
pub fn determine_bump_type(records: &[DiffRecord]) -> BumpType {
    if let Some(record) = records.iter().find(|r| is_breaking(r)) {
        debug!(file = %record.filename, "Breaking change detected");
        return BumpType::Major;
    }

    if let Some(record) = records.iter().find(|r| is_feature(r)) {
        debug!(file = %record.filename, "New feature detected");
        return BumpType::Minor;
    }

    BumpType::Patch
}

/// Parse a `MAJOR.MINOR.PATCH` version, allowing a leading `v`.
pub fn parse_version(raw: &str) -> Result<Version, VersionError> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let version = Version::parse(stripped)
        .map_err(|e| VersionError::ParseFailed(raw.to_string(), e))?;

    if !version.pre.is_empty() || !version.build.is_empty() {
        return Err(VersionError::NotPlainRelease(raw.to_string()));
    }

    if !is_bumpable(&version) {
        return Err(VersionError::ComponentOverflow(raw.to_string()));
    }

    Ok(version)
}

fn is_breaking(record: &DiffRecord) -> bool {
    if !matches!(record.status, FileStatus::Modified | FileStatus::Other(_)) {
        return false;
    }

    let patch = record.patch_text().to_lowercase();
    let filename = record.filename.to_lowercase();

    let api_removal = contains_any(&patch, API_SIGNALS) && contains_any(&patch, REMOVAL_SIGNALS);
    let new_migration =
        contains_any(&filename, MIGRATION_SIGNALS) && contains_any(&patch, CREATION_SIGNALS);

    api_removal || new_migration
}

fn is_feature(record: &DiffRecord) -> bool {
    if matches!(record.status, FileStatus::Removed) {
        return false;
    }

    let patch = record.patch_text();
    has_added_function(patch) || (has_route_suffix(&record.filename) && has_added_route(patch))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
