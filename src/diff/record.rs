//! Per-file change records and commit metadata.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Status of a changed file.
///
/// Deserializes from the lowercase strings the GitHub compare API uses.
/// Statuses other than `added`, `modified` and `removed` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Other(String),
}

impl FileStatus {
    /// Get the wire name for the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for FileStatus {
    /// A record without a status is analyzed like a modification.
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FileStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "added" => Self::Added,
            "modified" => Self::Modified,
            "removed" | "deleted" => Self::Removed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for FileStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FileStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(FileStatus::from(s.as_str()))
    }
}

/// One changed file in a commit comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub status: FileStatus,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    /// Unified diff body. Absent for binary files and very large diffs.
    #[serde(default)]
    pub patch: Option<String>,
}

impl DiffRecord {
    pub fn new(filename: impl Into<String>, status: FileStatus) -> Self {
        Self {
            filename: filename.into(),
            status,
            additions: 0,
            deletions: 0,
            patch: None,
        }
    }

    pub fn with_counts(mut self, additions: u64, deletions: u64) -> Self {
        self.additions = additions;
        self.deletions = deletions;
        self
    }

    pub fn with_patch(mut self, patch: impl Into<String>) -> Self {
        self.patch = Some(patch.into());
        self
    }

    /// Patch text, or an empty string when the provider sent none.
    pub fn patch_text(&self) -> &str {
        self.patch.as_deref().unwrap_or("")
    }
}

/// Metadata for the head commit of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub author: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CommitInfo {
    pub fn new(author: impl Into<String>, date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            date: date.into(),
            time: time.into(),
            sha: None,
            message: None,
        }
    }
}

/// Everything a change source returns for one `base...head` window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub commit: CommitInfo,
    pub files: Vec<DiffRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_status_display() {
        assert_eq!(FileStatus::Added.to_string(), "added");
        assert_eq!(FileStatus::Modified.to_string(), "modified");
        assert_eq!(FileStatus::Removed.to_string(), "removed");
        assert_eq!(FileStatus::Other("renamed".into()).to_string(), "renamed");
    }

    #[test]
    fn test_file_status_from_github_strings() {
        assert_eq!(FileStatus::from("added"), FileStatus::Added);
        assert_eq!(FileStatus::from("Modified"), FileStatus::Modified);
        assert_eq!(FileStatus::from("removed"), FileStatus::Removed);
        assert_eq!(FileStatus::from("renamed"), FileStatus::Other("renamed".into()));
    }

    #[test]
    fn test_diff_record_deserializes_without_patch() {
        let json = r#"{"filename": "logo.png", "status": "added", "additions": 0, "deletions": 0}"#;
        let record: DiffRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, FileStatus::Added);
        assert!(record.patch.is_none());
        assert_eq!(record.patch_text(), "");
    }

    #[test]
    fn test_diff_record_missing_counts_default_to_zero() {
        let json = r#"{"filename": "a.rs", "status": "copied", "patch": "+x"}"#;
        let record: DiffRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.additions, 0);
        assert_eq!(record.deletions, 0);
        assert_eq!(record.status, FileStatus::Other("copied".into()));
    }

    #[test]
    fn test_diff_record_missing_fields_default_to_empty() {
        let record: DiffRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.filename, "");
        assert_eq!(record.status, FileStatus::Other(String::new()));
        assert!(record.patch.is_none());
    }
}
