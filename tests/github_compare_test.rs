//! Integration tests for GitHub comparison fetching with mocked octocrab.

use diffnote::diff::FileStatus;
use diffnote::error::GitHubError;
use diffnote::github::{fetch_comparison_with_client, RepoSlug};
use octocrab::Octocrab;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEAD_SHA: &str = "2222222222222222222222222222222222222222";
const PARENT_SHA: &str = "1111111111111111111111111111111111111111";

/// Helper to create an octocrab client pointing to a mock server.
async fn mock_client(server: &MockServer) -> Octocrab {
    Octocrab::builder()
        .base_uri(server.uri())
        .expect("Failed to set base URI")
        .build()
        .expect("Failed to build octocrab")
}

fn slug() -> RepoSlug {
    RepoSlug::new("owner", "repo")
}

/// A commit object with the fields GitHub returns that we read.
fn mock_commit(login: Option<&str>, parents: &[&str]) -> Value {
    json!({
        "sha": HEAD_SHA,
        "node_id": "C_kwDOAAAB",
        "html_url": format!("https://github.com/owner/repo/commit/{}", HEAD_SHA),
        "commit": {
            "author": {
                "name": "Mona Lisa",
                "email": "mona@example.com",
                "date": "2024-05-02T10:11:12Z"
            },
            "committer": {
                "name": "GitHub",
                "email": "noreply@github.com",
                "date": "2024-05-02T10:11:12Z"
            },
            "message": "Add request handler"
        },
        "author": login.map(|l| json!({ "login": l, "id": 1, "type": "User" })),
        "parents": parents
            .iter()
            .map(|sha| json!({ "sha": sha, "url": "https://api.github.com" }))
            .collect::<Vec<_>>()
    })
}

fn mock_file(filename: &str, status: &str, additions: u64, deletions: u64, patch: Option<&str>) -> Value {
    let mut file = json!({
        "sha": "abc",
        "filename": filename,
        "status": status,
        "additions": additions,
        "deletions": deletions,
        "changes": additions + deletions,
        "blob_url": "https://github.com/owner/repo/blob/x",
        "raw_url": "https://github.com/owner/repo/raw/x",
        "contents_url": "https://api.github.com/repos/owner/repo/contents/x"
    });
    if let Some(patch) = patch {
        file["patch"] = json!(patch);
    }
    file
}

async fn mount_commit(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/owner/repo/commits/{}", HEAD_SHA)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_compare(server: &MockServer, base: &str, files: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/owner/repo/compare/{}...{}", base, HEAD_SHA)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ahead",
            "ahead_by": 1,
            "behind_by": 0,
            "total_commits": 1,
            "files": files
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_compare_against_first_parent() {
    let server = MockServer::start().await;
    mount_commit(&server, mock_commit(Some("octocat"), &[PARENT_SHA])).await;
    mount_compare(
        &server,
        PARENT_SHA,
        vec![
            mock_file("app.py", "modified", 5, 1, Some("@@ -1 +1 @@\n+def handle_request():\n+    pass")),
            mock_file("logo.png", "added", 0, 0, None),
            mock_file("old.txt", "removed", 0, 3, Some("@@ -1,3 +0,0 @@\n-a\n-b\n-c")),
            mock_file("new_name.rs", "renamed", 0, 0, None),
        ],
    )
    .await;

    let client = mock_client(&server).await;
    let comparison = fetch_comparison_with_client(&client, &slug(), None, HEAD_SHA)
        .await
        .unwrap();

    assert_eq!(comparison.commit.author, "octocat");
    assert_eq!(comparison.commit.date, "2024-05-02");
    assert_eq!(comparison.commit.time, "10:11:12");
    assert_eq!(comparison.commit.sha.as_deref(), Some(HEAD_SHA));

    assert_eq!(comparison.files.len(), 4);
    let app = &comparison.files[0];
    assert_eq!(app.filename, "app.py");
    assert_eq!(app.status, FileStatus::Modified);
    assert_eq!((app.additions, app.deletions), (5, 1));
    assert!(app.patch_text().contains("handle_request"));

    assert_eq!(comparison.files[1].status, FileStatus::Added);
    assert!(comparison.files[1].patch.is_none());
    assert_eq!(comparison.files[2].status, FileStatus::Removed);
    assert_eq!(comparison.files[3].status, FileStatus::Other("renamed".to_string()));
}

#[tokio::test]
async fn test_compare_with_explicit_base() {
    let server = MockServer::start().await;
    mount_commit(&server, mock_commit(Some("octocat"), &[PARENT_SHA])).await;
    mount_compare(&server, "v1.0.0", vec![mock_file("README.md", "modified", 1, 0, Some("+docs"))]).await;

    let client = mock_client(&server).await;
    let comparison = fetch_comparison_with_client(&client, &slug(), Some("v1.0.0"), HEAD_SHA)
        .await
        .unwrap();

    assert_eq!(comparison.files.len(), 1);
    assert_eq!(comparison.files[0].filename, "README.md");
}

#[tokio::test]
async fn test_author_falls_back_to_git_name() {
    let server = MockServer::start().await;
    mount_commit(&server, mock_commit(None, &[PARENT_SHA])).await;
    mount_compare(&server, PARENT_SHA, vec![]).await;

    let client = mock_client(&server).await;
    let comparison = fetch_comparison_with_client(&client, &slug(), None, HEAD_SHA)
        .await
        .unwrap();

    assert_eq!(comparison.commit.author, "Mona Lisa");
    assert!(comparison.files.is_empty());
}

#[tokio::test]
async fn test_root_commit_compares_against_itself() {
    let server = MockServer::start().await;
    mount_commit(&server, mock_commit(Some("octocat"), &[])).await;
    mount_compare(&server, HEAD_SHA, vec![]).await;

    let client = mock_client(&server).await;
    let comparison = fetch_comparison_with_client(&client, &slug(), None, HEAD_SHA)
        .await
        .unwrap();

    assert!(comparison.files.is_empty());
}

#[tokio::test]
async fn test_repository_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/owner/repo/commits/{}", HEAD_SHA)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let result = fetch_comparison_with_client(&client, &slug(), None, HEAD_SHA).await;

    match result.unwrap_err() {
        GitHubError::RepositoryNotFound { owner, repo } => {
            assert_eq!(owner, "owner");
            assert_eq!(repo, "repo");
        }
        other => panic!("Expected RepositoryNotFound error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/owner/repo/commits/{}", HEAD_SHA)))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "API rate limit exceeded for user",
            "documentation_url": "https://docs.github.com/rest/overview/resources-in-the-rest-api#rate-limiting"
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let result = fetch_comparison_with_client(&client, &slug(), None, HEAD_SHA).await;

    match result.unwrap_err() {
        GitHubError::RateLimited { .. } => {}
        other => panic!("Expected RateLimited error, got {:?}", other),
    }
}
