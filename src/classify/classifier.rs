//! Per-file change classification.

use tracing::{debug, warn};

use crate::diff::{DiffRecord, FileStatus};
use crate::error::ClassifyError;

use super::matchers::{default_matchers, Matcher, PatchContext};

/// Patches above this size are not analyzed.
pub const MAX_PATCH_BYTES: usize = 1024 * 1024;

pub const ADDED_DESCRIPTION: &str = "New file added";
pub const REMOVED_DESCRIPTION: &str = "File removed";
pub const FALLBACK_DESCRIPTION: &str = "Code modifications";

/// The structured description of one file's change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeClassification {
    pub status: FileStatus,
    pub filename: String,
    /// Category-tagged descriptions in matcher evaluation order.
    pub descriptions: Vec<String>,
    pub additions: u64,
    pub deletions: u64,
}

/// Applies an ordered set of matchers to diff records.
pub struct Classifier {
    matchers: Vec<Box<dyn Matcher>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_matchers())
    }
}

impl Classifier {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    /// Classify one record. Never fails: internal errors become the
    /// record's only description.
    pub fn classify(&self, record: &DiffRecord) -> ChangeClassification {
        match self.try_classify(record) {
            Ok(classification) => classification,
            Err(e) => {
                warn!(file = %record.filename, "Could not classify change: {}", e);
                ChangeClassification {
                    status: record.status.clone(),
                    filename: record.filename.clone(),
                    descriptions: vec![format!("Could not analyze changes: {}", e)],
                    additions: record.additions,
                    deletions: record.deletions,
                }
            }
        }
    }

    /// Classify every record, preserving order.
    pub fn classify_all(&self, records: &[DiffRecord]) -> Vec<ChangeClassification> {
        records.iter().map(|r| self.classify(r)).collect()
    }

    fn try_classify(&self, record: &DiffRecord) -> Result<ChangeClassification, ClassifyError> {
        if record.filename.trim().is_empty() {
            return Err(ClassifyError::MissingFilename);
        }

        let classification = match record.status {
            FileStatus::Added => ChangeClassification {
                status: FileStatus::Added,
                filename: record.filename.clone(),
                descriptions: vec![ADDED_DESCRIPTION.to_string()],
                additions: record.additions,
                deletions: 0,
            },
            FileStatus::Removed => ChangeClassification {
                status: FileStatus::Removed,
                filename: record.filename.clone(),
                descriptions: vec![REMOVED_DESCRIPTION.to_string()],
                additions: 0,
                deletions: record.deletions,
            },
            FileStatus::Modified | FileStatus::Other(_) => {
                let patch = record.patch_text();
                if patch.len() > MAX_PATCH_BYTES {
                    return Err(ClassifyError::PatchTooLarge {
                        len: patch.len(),
                        max: MAX_PATCH_BYTES,
                    });
                }

                let mut descriptions = self.describe(&record.filename, patch);
                if descriptions.is_empty() {
                    descriptions.push(FALLBACK_DESCRIPTION.to_string());
                }

                ChangeClassification {
                    status: record.status.clone(),
                    filename: record.filename.clone(),
                    descriptions,
                    additions: record.additions,
                    deletions: record.deletions,
                }
            }
        };

        debug!(
            file = %classification.filename,
            status = %classification.status,
            descriptions = ?classification.descriptions,
            "Classified change"
        );

        Ok(classification)
    }

    fn describe(&self, filename: &str, patch: &str) -> Vec<String> {
        let ctx = PatchContext::new(filename, patch);
        self.matchers
            .iter()
            .flat_map(|m| {
                let findings = m.detect(&ctx);
                if !findings.is_empty() {
                    debug!(matcher = m.name(), file = filename, count = findings.len(), "Matcher fired");
                }
                findings
            })
            .filter(|finding| !finding.detail.is_empty())
            .map(|finding| finding.to_string())
            .collect()
    }
}

/// Classify one record with the standard rule set.
pub fn classify(record: &DiffRecord) -> ChangeClassification {
    Classifier::default().classify(record)
}

/// Classify a whole comparison with the standard rule set.
pub fn classify_all(records: &[DiffRecord]) -> Vec<ChangeClassification> {
    Classifier::default().classify_all(records)
}
