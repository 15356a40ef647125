//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;

use chrono::NaiveDate;
use diffnote::diff::{CommitInfo, Comparison, DiffRecord, FileStatus};
use git2::{Oid, Repository, Signature, Time};

/// 2024-05-02T10:11:12Z
pub const COMMIT_SECONDS: i64 = 1_714_644_672;

/// Fixed "today" for rendered notes.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 2).expect("valid date")
}

/// A modified file with a patch.
pub fn modified(filename: &str, patch: &str) -> DiffRecord {
    DiffRecord::new(filename, FileStatus::Modified).with_patch(patch)
}

/// A comparison with fixed commit metadata.
pub fn comparison(files: Vec<DiffRecord>) -> Comparison {
    Comparison {
        commit: CommitInfo::new("octocat", "2024-05-02", "10:11:12"),
        files,
    }
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits, at a fixed UTC time.
    fn signature(&self) -> Signature<'_> {
        Signature::new("Test User", "test@example.com", &Time::new(COMMIT_SECONDS, 0))
            .expect("Failed to create signature")
    }

    /// Write files and commit them. Returns the commit OID.
    pub fn commit_files(&self, files: &[(&str, &str)], message: &str) -> Oid {
        let mut index = self.repo.index().expect("Failed to get index");

        for (name, content) in files {
            let file_path = self.dir.path().join(name);
            if let Some(parent) = file_path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create directories");
            }
            std::fs::write(&file_path, content).expect("Failed to write test file");
            index.add_path(Path::new(name)).expect("Failed to add file");
        }

        self.commit_index(&mut index, message)
    }

    /// Delete a file and commit the removal. Returns the commit OID.
    pub fn remove_file(&self, name: &str, message: &str) -> Oid {
        std::fs::remove_file(self.dir.path().join(name)).expect("Failed to remove file");
        let mut index = self.repo.index().expect("Failed to get index");
        index.remove_path(Path::new(name)).expect("Failed to remove from index");
        self.commit_index(&mut index, message)
    }

    fn commit_index(&self, index: &mut git2::Index, message: &str) -> Oid {
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let sig = self.signature();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a lightweight tag pointing to the given OID.
    pub fn tag_lightweight(&self, name: &str, oid: Oid) {
        let obj = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo.tag_lightweight(name, &obj, false).expect("Failed to create lightweight tag");
    }

    /// Create an annotated tag pointing to the given OID.
    pub fn tag_annotated(&self, name: &str, oid: Oid, message: &str) {
        let sig = self.signature();
        let obj = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo.tag(name, &obj, &sig, message, false).expect("Failed to create annotated tag");
    }
}
