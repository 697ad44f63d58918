mod helpers;

use gitsay::app::App;
use gitsay::{ErrorKind, GitError};
use helpers::*;
use std::fs;
use tempfile::TempDir;

const KEEP_INCOMING: &str = r#"{
  "suggestion": "keep_incoming",
  "merged_content": "url = staging\n",
  "explanation": "Main uses production, feature uses staging.",
  "confidence": "HIGH",
  "reasoning": "Feature branches point at staging for testing."
}"#;

const CUSTOM: &str = r#"{"suggestion": "custom", "merged_content": "url = production\nstaging_url = staging", "explanation": "Keeps both URLs.", "confidence": "MEDIUM", "reasoning": "Both values are in use."}"#;

#[tokio::test]
async fn test_accept_proposal_rewrites_file() {
    let (_temp, repo) = create_conflicted_repo();
    let client = ScriptedClient::new(&[KEEP_INCOMING]);

    let mut app = App::new(client.clone(), &test_config(), repo.clone(), console("a\n"));
    let summary = app.resolve_conflicts().await.unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.resolved, 1);
    assert_eq!(
        fs::read_to_string(repo.join("config.txt")).unwrap(),
        "name = app\nurl = staging\nport = 80\n"
    );

    let prompts = client.prompts.lock().unwrap();
    assert!(prompts[0].1.contains("url = production"));
    assert!(prompts[0].1.contains("url = staging"));
    assert!(prompts[0].1.contains("CURRENT BRANCH: main"));
    assert!(prompts[0].1.contains("INCOMING BRANCH: feature"));

    let output = console_output(app.into_console());
    assert!(output.contains("Resolved 1/1 conflicts"));
    assert!(output.contains("git add"));
}

#[tokio::test]
async fn test_custom_merge_without_trailing_newline() {
    let (_temp, repo) = create_conflicted_repo();
    let client = ScriptedClient::new(&[CUSTOM]);

    let mut app = App::new(client, &test_config(), repo.clone(), console("accept\n"));
    app.resolve_conflicts().await.unwrap();

    assert_eq!(
        fs::read_to_string(repo.join("config.txt")).unwrap(),
        "name = app\nurl = production\nstaging_url = staging\nport = 80\n"
    );
}

#[tokio::test]
async fn test_keep_ours() {
    let (_temp, repo) = create_conflicted_repo();
    let client = ScriptedClient::new(&[KEEP_INCOMING]);

    let mut app = App::new(client, &test_config(), repo.clone(), console("o\n"));
    app.resolve_conflicts().await.unwrap();

    assert_eq!(
        fs::read_to_string(repo.join("config.txt")).unwrap(),
        "name = app\nurl = production\nport = 80\n"
    );
}

#[tokio::test]
async fn test_skip_and_cancel_leave_file_untouched() {
    for answer in ["s\n", "c\n", ""] {
        let (_temp, repo) = create_conflicted_repo();
        let before = fs::read_to_string(repo.join("config.txt")).unwrap();
        let client = ScriptedClient::new(&[KEEP_INCOMING]);

        let mut app = App::new(client, &test_config(), repo.clone(), console(answer));
        let summary = app.resolve_conflicts().await.unwrap();

        assert_eq!(summary.resolved, 0, "answer {:?}", answer);
        assert_eq!(fs::read_to_string(repo.join("config.txt")).unwrap(), before);
    }
}

#[tokio::test]
async fn test_malformed_proposal_still_allows_keeping_a_side() {
    let (_temp, repo) = create_conflicted_repo();
    let client = ScriptedClient::new(&["```json\n{\"suggestion\": \"keep_both\"}\n```"]);

    // `a` is not offered without a proposal, so it is asked again
    let mut app = App::new(client, &test_config(), repo.clone(), console("a\nt\n"));
    let summary = app.resolve_conflicts().await.unwrap();

    assert_eq!(summary.resolved, 1);
    assert_eq!(
        fs::read_to_string(repo.join("config.txt")).unwrap(),
        "name = app\nurl = staging\nport = 80\n"
    );
    assert!(console_output(app.into_console()).contains("No proposal:"));
}

#[tokio::test]
async fn test_no_conflicts() {
    let (_temp, repo) = create_test_repo();
    create_commit(&repo, "a.txt", "a\n", "first");
    let client = ScriptedClient::new(&[]);

    let mut app = App::new(client.clone(), &test_config(), repo, console(""));
    let summary = app.resolve_conflicts().await.unwrap();

    assert_eq!(summary.total, 0);
    assert_eq!(client.calls(), 0);
    assert!(console_output(app.into_console()).contains("No conflicts found."));
}

#[tokio::test]
async fn test_outside_repository() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(&[]);

    let mut app = App::new(client, &test_config(), temp.path().to_path_buf(), console(""));
    let err = app.resolve_conflicts().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Git);
    assert!(matches!(err, gitsay::AppError::Git(GitError::NotARepository)));
}

#[test]
fn test_bare_prompt_mentions_conflicts() {
    let (_temp, repo) = create_conflicted_repo();
    let client = ScriptedClient::new(&[]);

    let mut app = App::new(client, &test_config(), repo, console("show status\n"));
    let request = app.prompt_for_request().unwrap();

    assert_eq!(request.as_deref(), Some("show status"));
    let output = console_output(app.into_console());
    assert!(output.contains("Merge conflicts detected:"));
    assert!(output.contains("config.txt"));
    assert!(output.contains("gitsay resolve"));
}
