//! Version management and semver bumping.

pub mod bump;

pub use bump::{
    apply_bump_to_version, decide_version, determine_bump_type, is_bumpable, parse_version, BumpType,
    VersionDecision,
};
