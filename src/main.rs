//! diffnote - CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use git2::Repository;

use diffnote::config::{resolve_previous_version, resolve_source, Args, SourceKind};
use diffnote::github::{build_client, get_github_token};
use diffnote::notes::{build_release_note, generate_summary, prepend_note, ReleaseNote, ReleaseNoteInput};
use diffnote::source::{fetch_comparison, ChangeSource, CompareRange, GitHubSource, LocalGitSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the note on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    // Step 1: Locate the working repository, if any
    let local_repo = Repository::open(".").ok();
    if args.local && local_repo.is_none() {
        anyhow::bail!("Not a git repository. Run diffnote --local from within a git repository.");
    }

    // Step 2: Pick the change source
    let kind = resolve_source(&args, local_repo.as_ref())
        .context("Could not determine which repository to describe")?;
    let source = build_source(kind)?;

    // Step 3: Determine the version the bump applies to
    let previous_version =
        resolve_previous_version(args.current_version.as_deref(), local_repo.as_ref(), &args.head)
            .context("Failed to determine the current version")?;

    // Step 4: Fetch the changed files
    let range = CompareRange::new(args.base.clone(), args.head.clone());
    let comparison = fetch_comparison(source.as_ref(), &range)
        .await
        .context("Failed to fetch changed files")?;

    if comparison.files.is_empty() {
        println!("No changed files found for {}.", args.head);
    } else {
        println!("Found {} changed files", comparison.files.len());
    }

    // Step 5: Analyze and render
    let note = build_release_note(&ReleaseNoteInput {
        comparison,
        previous_version,
        today: chrono::Local::now().date_naive(),
    });

    println!(
        "Version: {} -> {} ({})",
        note.decision.previous, note.decision.version, note.decision.bump
    );

    // Step 6: Write or display the note
    if args.dry_run {
        println!("\n--- Dry Run Output ---\n");
        print_note_preview(&note);
    } else {
        prepend_note(&args.output, &note.text)
            .with_context(|| format!("Failed to write {}", args.output.display()))?;

        println!("✓ {}", generate_summary(&note));
    }

    Ok(())
}

/// Build the provider for a resolved source kind.
fn build_source(kind: SourceKind) -> Result<Box<dyn ChangeSource>> {
    match kind {
        SourceKind::Local { path } => Ok(Box::new(LocalGitSource::new(path))),
        SourceKind::GitHub { repo, api_url } => {
            let token = get_github_token().context("GitHub authentication required")?;
            let client = build_client(&token, api_url.as_deref())?;
            Ok(Box::new(GitHubSource::new(client, repo)))
        }
    }
}

/// Print the per-file analysis followed by the note itself.
fn print_note_preview(note: &ReleaseNote) {
    for classification in &note.classifications {
        println!(
            "[{}] {} (+{}/-{})",
            classification.status,
            classification.filename,
            classification.additions,
            classification.deletions
        );
        for description in &classification.descriptions {
            println!("    {}", description);
        }
    }

    println!("\n{}", note.text);
}
