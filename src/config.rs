//! Run settings: command-line flags with environment fallbacks, and the
//! resolution of values that have repository-derived defaults.

use std::path::PathBuf;

use clap::Parser;
use git2::Repository;
use semver::Version;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::git::{latest_release_version, resolve_commit};
use crate::github::{parse_github_remote, RepoSlug};
use crate::version::parse_version;

/// Version assumed when nothing else names one.
pub const DEFAULT_VERSION: Version = Version::new(1, 0, 0);

/// Default output file.
pub const DEFAULT_OUTPUT: &str = "release_note.txt";

const ORIGIN_REMOTE: &str = "origin";

/// Generate a release note from the files changed in a commit.
#[derive(Parser, Debug, Clone)]
#[command(name = "diffnote")]
#[command(about = "Generate a release note from the files changed in a commit")]
#[command(version)]
pub struct Args {
    /// GitHub repository as owner/name (defaults to the origin remote)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Commit to describe
    #[arg(long, env = "GITHUB_SHA", default_value = "HEAD")]
    pub head: String,

    /// Commit to compare against (defaults to the head's first parent)
    #[arg(long)]
    pub base: Option<String>,

    /// Version the bump applies to (defaults to the latest release tag, else 1.0.0)
    #[arg(long, env = "DIFFNOTE_CURRENT_VERSION")]
    pub current_version: Option<String>,

    /// Path to the release note file
    #[arg(short = 'o', long, env = "DIFFNOTE_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Read the diff from the local repository instead of the GitHub API
    #[arg(long)]
    pub local: bool,

    /// GitHub API base URL (for GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Print the note without writing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Where the comparison comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    GitHub {
        repo: RepoSlug,
        api_url: Option<String>,
    },
    Local {
        path: PathBuf,
    },
}

/// Pick the change source for a run.
///
/// `local_repo` is the repository in the working directory, if there is one;
/// it supplies the default slug when `--repo` is absent.
pub fn resolve_source(
    args: &Args,
    local_repo: Option<&Repository>,
) -> Result<SourceKind, ConfigError> {
    if args.local {
        return Ok(SourceKind::Local {
            path: PathBuf::from("."),
        });
    }

    let repo = resolve_repo_slug(args.repo.as_deref(), local_repo)?;
    Ok(SourceKind::GitHub {
        repo,
        api_url: args.api_url.clone().filter(|u| !u.trim().is_empty()),
    })
}

/// Repository slug from an explicit value, else the origin remote.
pub fn resolve_repo_slug(
    explicit: Option<&str>,
    local_repo: Option<&Repository>,
) -> Result<RepoSlug, ConfigError> {
    if let Some(slug) = explicit.filter(|s| !s.trim().is_empty()) {
        return Ok(slug.parse()?);
    }

    let remote_url = local_repo
        .and_then(|repo| repo.find_remote(ORIGIN_REMOTE).ok())
        .and_then(|remote| remote.url().map(str::to_string))
        .ok_or_else(|| ConfigError::MissingRemote(ORIGIN_REMOTE.to_string()))?;

    debug!(url = %remote_url, "Using origin remote for repository");
    Ok(parse_github_remote(&remote_url)?)
}

/// The version this run's bump applies to.
///
/// An explicit version wins. Otherwise the newest release tag reachable from
/// `head` in the local repository is used, and [`DEFAULT_VERSION`] when
/// there is no repository, `head` is not present locally, or no tag exists.
pub fn resolve_previous_version(
    explicit: Option<&str>,
    local_repo: Option<&Repository>,
    head: &str,
) -> Result<Version, ConfigError> {
    if let Some(raw) = explicit.filter(|s| !s.trim().is_empty()) {
        return Ok(parse_version(raw)?);
    }

    let Some(repo) = local_repo else {
        debug!("No local repository; using default version");
        return Ok(DEFAULT_VERSION);
    };

    let head_commit = match resolve_commit(repo, head) {
        Ok(commit) => commit,
        Err(e) => {
            warn!("Could not resolve {head} locally, using default version: {e}");
            return Ok(DEFAULT_VERSION);
        }
    };

    Ok(latest_release_version(repo, head_commit.id())?.unwrap_or(DEFAULT_VERSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: [&str; 5] = [
        "GITHUB_REPOSITORY",
        "GITHUB_SHA",
        "DIFFNOTE_CURRENT_VERSION",
        "DIFFNOTE_OUTPUT",
        "GITHUB_API_URL",
    ];

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["diffnote"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        temp_env::with_vars_unset(ENV_VARS, || {
            let args = parse(&[]);
            assert_eq!(args.head, "HEAD");
            assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT));
            assert!(args.repo.is_none());
            assert!(args.base.is_none());
            assert!(!args.local);
            assert!(!args.dry_run);
        });
    }

    #[test]
    #[serial]
    fn test_env_fallbacks() {
        temp_env::with_vars(
            [
                ("GITHUB_REPOSITORY", Some("octo/app")),
                ("GITHUB_SHA", Some("abc123")),
                ("DIFFNOTE_CURRENT_VERSION", Some("2.3.4")),
                ("DIFFNOTE_OUTPUT", Some("notes.txt")),
                ("GITHUB_API_URL", Some("https://ghe.example.com/api/v3")),
            ],
            || {
                let args = parse(&[]);
                assert_eq!(args.repo.as_deref(), Some("octo/app"));
                assert_eq!(args.head, "abc123");
                assert_eq!(args.current_version.as_deref(), Some("2.3.4"));
                assert_eq!(args.output, PathBuf::from("notes.txt"));
                assert_eq!(args.api_url.as_deref(), Some("https://ghe.example.com/api/v3"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_flags_override_env() {
        temp_env::with_vars(
            [("GITHUB_REPOSITORY", Some("octo/app")), ("GITHUB_SHA", Some("abc123"))],
            || {
                let args = parse(&["--repo", "other/repo", "--head", "def456", "-o", "out.txt"]);
                assert_eq!(args.repo.as_deref(), Some("other/repo"));
                assert_eq!(args.head, "def456");
                assert_eq!(args.output, PathBuf::from("out.txt"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_resolve_source_github_from_slug() {
        temp_env::with_vars_unset(ENV_VARS, || {
            let args = parse(&["--repo", "octo/app"]);
            let kind = resolve_source(&args, None).unwrap();
            assert_eq!(
                kind,
                SourceKind::GitHub {
                    repo: RepoSlug::new("octo", "app"),
                    api_url: None,
                }
            );
        });
    }

    #[test]
    #[serial]
    fn test_resolve_source_local_needs_no_slug() {
        temp_env::with_vars_unset(ENV_VARS, || {
            let args = parse(&["--local"]);
            assert!(matches!(resolve_source(&args, None).unwrap(), SourceKind::Local { .. }));
        });
    }

    #[test]
    fn test_repo_slug_from_origin_remote() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.remote("origin", "git@github.com:octo/app.git").unwrap();

        let slug = resolve_repo_slug(None, Some(&repo)).unwrap();
        assert_eq!(slug, RepoSlug::new("octo", "app"));
    }

    #[test]
    fn test_repo_slug_missing_remote() {
        let err = resolve_repo_slug(None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRemote(_)));
    }

    #[test]
    fn test_repo_slug_rejects_bad_value() {
        assert!(resolve_repo_slug(Some("not-a-slug"), None).is_err());
    }

    #[test]
    fn test_previous_version_explicit() {
        let version = resolve_previous_version(Some("v2.1.0"), None, "HEAD").unwrap();
        assert_eq!(version, Version::new(2, 1, 0));
    }

    #[test]
    fn test_previous_version_rejects_prerelease() {
        assert!(resolve_previous_version(Some("2.1.0-rc.1"), None, "HEAD").is_err());
    }

    #[test]
    fn test_previous_version_default_without_repo() {
        let version = resolve_previous_version(None, None, "HEAD").unwrap();
        assert_eq!(version, DEFAULT_VERSION);
    }

    #[test]
    fn test_previous_version_default_when_head_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let version = resolve_previous_version(None, Some(&repo), "HEAD").unwrap();
        assert_eq!(version, DEFAULT_VERSION);
    }
}
