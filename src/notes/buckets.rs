//! Grouping of changed files into presentation buckets.
//!
//! The aggregator reads raw patch text with its own trigger vocabulary,
//! which is broader than the per-file matchers and produces longer prose.
//! Categorizers run in a fixed order and a file only lands in
//! [`Bucket::Other`] when none of them fired.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::classify::matchers::{added_function_names, added_routes, bug_note, is_ui_file};
use crate::diff::{DiffRecord, FileStatus};

/// Presentation buckets, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Ui,
    Features,
    Api,
    BugFixes,
    Other,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Ui,
        Bucket::Features,
        Bucket::Api,
        Bucket::BugFixes,
        Bucket::Other,
    ];

    /// Get the section heading for the bucket.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Ui => "UI Improvements",
            Self::Features => "New Features",
            Self::Api => "API Changes",
            Self::BugFixes => "Bug Fixes",
            Self::Other => "Other Changes",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Ui => "🎨",
            Self::Features => "✨",
            Self::Api => "🔌",
            Self::BugFixes => "🐛",
            Self::Other => "🔧",
        }
    }
}

/// UI vocabulary in priority order, each with its prose template.
/// `{}` is replaced by the filename.
const UI_PHRASES: &[(&str, &str)] = &[
    (r"(?i)modal|dialog|popup", "Enhanced modal functionality in {} for improved user interaction"),
    (r"(?i)<button|\bbtn\b|\bbutton\b", "Improved button interactions in {}"),
    (r"(?i)<form|\bform\b|<input|\binput\b|<select|<textarea", "Refined form handling and input fields in {}"),
    (r"(?i)\bstyle\b|class=|classname|\bcss\b|color:|font-", "Polished visual styling in {}"),
    (r"(?i)layout|container|\bgrid\b|flex|navbar|sidebar", "Reworked page layout in {}"),
    (r"(?i)responsive|@media|viewport|breakpoint", "Improved responsive behavior in {} across screen sizes"),
    (r"(?i)aria-|accessibility|\balt=|\brole=", "Improved accessibility in {}"),
    (r"(?i)<table|\btable\b|<tr|<td", "Enhanced table presentation in {}"),
    (r"(?i)<div|<span|<section|<template|\bcomponent\b|\bview\b", "Refreshed user interface in {}"),
];

static UI_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    UI_PHRASES
        .iter()
        .map(|(pattern, template)| (Regex::new(pattern).expect("Invalid regex"), *template))
        .collect()
});

static FEATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\+.*\b(?:feature|implement(?:s|ed)?|introduce[sd]?|new class)\b")
        .expect("Invalid regex")
});

static API_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bapi\b|/api/|endpoint|\broute|controller|\bhttp|\bjson\b|\brest\b")
        .expect("Invalid regex")
});

static BUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfix(?:e[sd])?\b|\bbug|\bissue\b|\berror\b|exception|\bcrash|\bresolve[sd]?\b|\bhotfix\b")
        .expect("Invalid regex")
});

/// Entries collected per bucket, each in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBuckets {
    entries: BTreeMap<Bucket, Vec<String>>,
}

impl CategoryBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bucket: Bucket, entry: impl Into<String>) {
        self.entries.entry(bucket).or_default().push(entry.into());
    }

    /// Entries of one bucket (empty when nothing was added).
    pub fn get(&self, bucket: Bucket) -> &[String] {
        self.entries.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty buckets in render order.
    pub fn non_empty(&self) -> impl Iterator<Item = (Bucket, &[String])> {
        Bucket::ALL
            .into_iter()
            .map(|b| (b, self.get(b)))
            .filter(|(_, entries)| !entries.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Group every record into buckets.
pub fn aggregate(records: &[DiffRecord]) -> CategoryBuckets {
    let mut buckets = CategoryBuckets::new();

    for record in records {
        match record.status {
            FileStatus::Added => buckets.push(Bucket::Other, format!("Added {}", record.filename)),
            FileStatus::Removed => {
                buckets.push(Bucket::Other, format!("Removed {}", record.filename))
            }
            FileStatus::Modified | FileStatus::Other(_) => {
                let hits = categorize(record);
                if hits.is_empty() {
                    buckets.push(Bucket::Other, format!("Updated {}", record.filename));
                }
                for (bucket, entry) in hits {
                    buckets.push(bucket, entry);
                }
            }
        }
    }

    debug!(entries = buckets.len(), "Aggregated changes into buckets");
    buckets
}

/// Run the categorizers in order over one file. Each contributes at most one entry.
fn categorize(record: &DiffRecord) -> Vec<(Bucket, String)> {
    let patch = record.patch_text();
    let name = record.filename.as_str();

    [
        ui_entry(name, patch).map(|e| (Bucket::Ui, e)),
        feature_entry(name, patch).map(|e| (Bucket::Features, e)),
        api_entry(name, patch).map(|e| (Bucket::Api, e)),
        bug_entry(name, patch).map(|e| (Bucket::BugFixes, e)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn ui_entry(filename: &str, patch: &str) -> Option<String> {
    if patch.trim().is_empty() {
        return None;
    }

    if let Some((_, template)) = UI_RES.iter().find(|(re, _)| re.is_match(patch)) {
        return Some(template.replace("{}", filename));
    }

    is_ui_file(filename).then(|| format!("Updated user interface in {}", filename))
}

fn feature_entry(filename: &str, patch: &str) -> Option<String> {
    let names = added_function_names(patch);
    if !names.is_empty() {
        return Some(format!("Added {} in {}", names.join(", "), filename));
    }

    FEATURE_RE
        .is_match(patch)
        .then(|| format!("Introduced new functionality in {}", filename))
}

fn api_entry(filename: &str, patch: &str) -> Option<String> {
    let routes = added_routes(patch);
    if !routes.is_empty() {
        let listed: Vec<String> = routes.iter().map(ToString::to_string).collect();
        return Some(format!("New endpoints in {}: {}", filename, listed.join(", ")));
    }

    API_RE
        .is_match(patch)
        .then(|| format!("Updated API handling in {}", filename))
}

fn bug_entry(filename: &str, patch: &str) -> Option<String> {
    if !BUG_RE.is_match(patch) {
        return None;
    }

    Some(match bug_note(patch) {
        Some(note) => format!("Fixed {} in {}", note, filename),
        None => format!("Resolved issues in {}", filename),
    })
}
