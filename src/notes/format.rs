//! Release note text rendering.

use chrono::NaiveDate;

use crate::classify::ChangeClassification;
use crate::diff::CommitInfo;
use crate::version::VersionDecision;

use super::buckets::CategoryBuckets;

/// Width of the separator rules.
const RULE_WIDTH: usize = 50;

pub const WELCOME_LINE: &str =
    "Welcome to the latest release! Here is a look at what changed in this update.";

const MAINTENANCE_LINE: &str = "Maintenance and stability improvements";

/// Update lines listed one by one; earlier patch numbers share one range line.
const MAX_UPDATE_LINES: u64 = 10;

/// Render a release note.
///
/// `today` supplies the month and year of the title; it is passed in so the
/// output depends only on the arguments.
pub fn render_note(
    commit: &CommitInfo,
    decision: &VersionDecision,
    buckets: &CategoryBuckets,
    classifications: &[ChangeClassification],
    today: NaiveDate,
) -> String {
    let version = &decision.version;
    let rule = "=".repeat(RULE_WIDTH);
    let mut note = String::new();

    note.push_str(&format!(
        "{} (version {}.{})\n",
        today.format("%B %Y"),
        version.major,
        version.minor
    ));
    note.push_str(&rule);
    note.push('\n');

    let first_listed = version.patch.saturating_sub(MAX_UPDATE_LINES - 1).max(1);
    if first_listed > 1 {
        note.push_str(&format!(
            "Updates {major}.{minor}.1-{major}.{minor}.{}: {}\n",
            first_listed - 1,
            MAINTENANCE_LINE,
            major = version.major,
            minor = version.minor,
        ));
    }

    for p in first_listed..=version.patch {
        let summary = if p == version.patch {
            run_summary(classifications)
        } else {
            MAINTENANCE_LINE.to_string()
        };
        note.push_str(&format!(
            "Update {}.{}.{}: {}\n",
            version.major, version.minor, p, summary
        ));
    }

    note.push_str(WELCOME_LINE);
    note.push('\n');

    for (bucket, entries) in buckets.non_empty() {
        note.push_str(&format!("\n{} {}\n", bucket.emoji(), bucket.heading()));
        for entry in entries {
            note.push_str(&format!("- {}\n", entry));
        }
    }

    note.push('\n');
    note.push_str(&rule);
    note.push('\n');
    note.push_str(&format!(
        "Version: {} | Date: {} {} | Author: {}\n",
        version, commit.date, commit.time, commit.author
    ));

    note
}

/// One-line summary of this run's changes, e.g. `3 files changed (+10/-2)`.
pub fn run_summary(classifications: &[ChangeClassification]) -> String {
    let additions: u64 = classifications.iter().map(|c| c.additions).sum();
    let deletions: u64 = classifications.iter().map(|c| c.deletions).sum();
    let count = classifications.len();
    let file_word = if count == 1 { "file" } else { "files" };

    format!("{} {} changed (+{}/-{})", count, file_word, additions, deletions)
}
