//! GitHub API operations using octocrab.

pub mod auth;
pub mod compare;
pub mod repo;

pub use auth::get_github_token;
pub use compare::{build_client, fetch_comparison_with_client};
pub use repo::{parse_github_remote, RepoSlug};
