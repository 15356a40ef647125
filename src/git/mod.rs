//! Local git operations using git2-rs.

pub mod commits;
pub mod diff;
pub mod range;
pub mod tags;

pub use commits::commit_info;
pub use diff::collect_comparison;
pub use range::{default_base, resolve_commit};
pub use tags::{get_version_from_tag, latest_release_version};
