//! End-to-end release note construction from a comparison.

use chrono::NaiveDate;
use semver::Version;
use tracing::info;

use crate::classify::{ChangeClassification, Classifier};
use crate::diff::Comparison;
use crate::version::{decide_version, VersionDecision};

use super::buckets::{aggregate, CategoryBuckets};
use super::format::render_note;

/// Everything needed to build one release note.
#[derive(Debug, Clone)]
pub struct ReleaseNoteInput {
    pub comparison: Comparison,
    /// Version the comparison is applied on top of.
    pub previous_version: Version,
    /// Date used for the title's month and year.
    pub today: NaiveDate,
}

/// The analysis results together with the rendered text.
#[derive(Debug, Clone)]
pub struct ReleaseNote {
    pub classifications: Vec<ChangeClassification>,
    pub decision: VersionDecision,
    pub buckets: CategoryBuckets,
    pub text: String,
}

/// Classify, decide the version, group, and render.
///
/// Pure: the same input always produces the same note.
pub fn build_release_note(input: &ReleaseNoteInput) -> ReleaseNote {
    let files = &input.comparison.files;

    let classifications = Classifier::default().classify_all(files);
    let decision = decide_version(&input.previous_version, files);
    let buckets = aggregate(files);

    let text = render_note(
        &input.comparison.commit,
        &decision,
        &buckets,
        &classifications,
        input.today,
    );

    info!(
        files = files.len(),
        bump = %decision.bump,
        version = %decision.version,
        "Built release note"
    );

    ReleaseNote {
        classifications,
        decision,
        buckets,
        text,
    }
}

/// Generate a summary message for the user.
pub fn generate_summary(note: &ReleaseNote) -> String {
    let details: Vec<String> = note
        .buckets
        .non_empty()
        .map(|(bucket, entries)| format!("{}: {}", bucket.heading(), entries.len()))
        .collect();

    let total = note.buckets.len();
    let entry_word = if total == 1 { "entry" } else { "entries" };

    if details.is_empty() {
        return format!("Release {} ({} bump) with no entries", note.decision.version, note.decision.bump);
    }

    format!(
        "Release {} ({} bump) with {} {} ({})",
        note.decision.version,
        note.decision.bump,
        total,
        entry_word,
        details.join(", ")
    )
}
