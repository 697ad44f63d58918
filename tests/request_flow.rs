mod helpers;

use gitsay::app::{App, Outcome};
use gitsay::audit::AuditLogger;
use gitsay::git::ExecutionError;
use gitsay::llm::LLMError;
use gitsay::{AppError, ErrorKind};
use helpers::*;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const SOFT_RESET: &str = "COMMAND: git reset --soft HEAD~1
EXPLANATION: Moves your branch back one commit and keeps the changes staged.
WARNING: none
NEXT: Commit again with git commit -m \"your message\".";

const DELETE_BRANCHES: &str = "COMMAND: git branch -D feature-a feature-b
EXPLANATION: Force-deletes every local branch except main.
WARNING: DANGER: unmerged commits on these branches are lost.
NEXT: none";

fn setup_two_commits() -> (TempDir, std::path::PathBuf) {
    let (temp, repo) = create_test_repo();
    create_commit(&repo, "a.txt", "one\n", "first");
    create_commit(&repo, "b.txt", "two\n", "second");
    (temp, repo)
}

#[tokio::test]
async fn test_soft_reset_runs_after_yes() {
    let (_temp, repo) = setup_two_commits();
    let client = ScriptedClient::new(&[SOFT_RESET]);

    let mut app = App::new(client.clone(), &test_config(), repo.clone(), console("y\n"));
    let outcome = app.run("undo my last commit but keep the changes").await.unwrap();

    assert!(matches!(outcome, Outcome::Executed(ref r) if r.success()));
    assert_eq!(head_subject(&repo), "first");
    assert!(git(&repo, &["diff", "--cached", "--name-only"]).contains("b.txt"));

    let output = console_output(app.into_console());
    assert!(output.contains("git reset --soft HEAD~1"));
    assert!(output.contains("[y/N]"));
    assert!(output.contains("What's next?"));

    // The prompt carried the repository state
    let prompts = client.prompts.lock().unwrap();
    assert!(prompts[0].0.contains("Current branch: main"));
}

#[tokio::test]
async fn test_declined_safe_command_does_nothing() {
    let (_temp, repo) = setup_two_commits();
    let client = ScriptedClient::new(&[SOFT_RESET]);

    let mut app = App::new(client, &test_config(), repo.clone(), console("\n"));
    let outcome = app.run("undo my last commit but keep the changes").await.unwrap();

    assert!(matches!(outcome, Outcome::Declined));
    assert_eq!(head_subject(&repo), "second");
    assert!(console_output(app.into_console()).contains("Nothing was run"));
}

#[tokio::test]
async fn test_destructive_plain_yes_declines() {
    let (_temp, repo) = setup_two_commits();
    git(&repo, &["branch", "feature-a"]);
    git(&repo, &["branch", "feature-b"]);

    let client = ScriptedClient::new(&[DELETE_BRANCHES]);
    let mut app = App::new(client, &test_config(), repo.clone(), console("y\n"));
    let outcome = app.run("delete all local branches except main").await.unwrap();

    assert!(matches!(outcome, Outcome::Declined));
    assert!(branch_exists(&repo, "feature-a"));
    assert!(branch_exists(&repo, "feature-b"));

    let output = console_output(app.into_console());
    assert!(output.contains("DANGER"));
    assert!(output.contains("Type CONFIRM"));
}

#[tokio::test]
async fn test_destructive_runs_after_confirm_phrase() {
    let (_temp, repo) = setup_two_commits();
    git(&repo, &["branch", "feature-a"]);
    git(&repo, &["branch", "feature-b"]);

    let client = ScriptedClient::new(&[DELETE_BRANCHES]);
    let mut app = App::new(client, &test_config(), repo.clone(), console("CONFIRM\n"));
    let outcome = app.run("delete all local branches except main").await.unwrap();

    assert!(matches!(outcome, Outcome::Executed(_)));
    assert!(!branch_exists(&repo, "feature-a"));
    assert!(!branch_exists(&repo, "feature-b"));
    assert!(branch_exists(&repo, "main"));
}

#[tokio::test]
async fn test_service_timeout_prints_and_runs_nothing() {
    let (_temp, repo) = setup_two_commits();
    let client = ScriptedClient::slow(SOFT_RESET, Duration::from_secs(5));

    let mut config = test_config();
    config.llm.timeout_seconds = 1;

    let mut app = App::new(client, &config, repo.clone(), console("y\n"));
    let err = app.run("undo my last commit").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(head_subject(&repo), "second");
    assert!(console_output(app.into_console()).is_empty());
}

#[tokio::test]
async fn test_malformed_reply() {
    let (_temp, repo) = setup_two_commits();
    let client = ScriptedClient::new(&["Sure! Just run `git status`."]);

    let mut app = App::new(client, &test_config(), repo, console("y\n"));
    let err = app.run("what changed").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_empty_request() {
    let (_temp, repo) = setup_two_commits();
    let client = ScriptedClient::new(&[SOFT_RESET]);

    let mut app = App::new(client.clone(), &test_config(), repo, console(""));
    let err = app.run("  \t ").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_service_error_is_reported() {
    let (_temp, repo) = setup_two_commits();
    let client = ScriptedClient::failing(LLMError::ApiError("status 500".to_string()));

    let mut app = App::new(client, &test_config(), repo, console("y\n"));
    let err = app.run("status").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
}

#[tokio::test]
async fn test_rejection_is_audited() {
    let (temp, repo) = setup_two_commits();
    let client = ScriptedClient::new(&["COMMAND: git status; rm -rf ~\nEXPLANATION: Shows status."]);
    let audit = AuditLogger::with_path(temp.path().join("audit").join("history.log")).unwrap();
    let log_path = audit.log_path().to_path_buf();

    let mut app = App::new(client, &test_config(), repo, console("y\n")).with_audit(Some(audit));
    let err = app.run("show status").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Rejected);
    let log = fs::read_to_string(log_path).unwrap();
    assert!(log.contains("[REJECTED]"));
    assert!(log.contains("show status"));
}

#[tokio::test]
async fn test_execution_and_decline_are_audited() {
    let (temp, repo) = setup_two_commits();
    let client = ScriptedClient::new(&[
        "COMMAND: git status --short\nEXPLANATION: Shows changes briefly.",
        SOFT_RESET,
    ]);
    let audit = AuditLogger::with_path(temp.path().join("history.log")).unwrap();
    let log_path = audit.log_path().to_path_buf();

    let mut app = App::new(client, &test_config(), repo, console("y\nn\n")).with_audit(Some(audit));
    app.run("what changed").await.unwrap();
    app.run("undo my last commit").await.unwrap();

    let log = fs::read_to_string(log_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("[exit:0] [risk:safe] git status --short"));
    assert!(lines[1].contains("[DECLINED]"));
}

#[tokio::test]
async fn test_audit_disabled_by_config() {
    let (temp, repo) = setup_two_commits();
    let client = ScriptedClient::new(&["COMMAND: git status\nEXPLANATION: Shows status."]);
    let audit = AuditLogger::with_path(temp.path().join("history.log")).unwrap();
    let log_path = audit.log_path().to_path_buf();

    let mut config = test_config();
    config.behavior.log_commands = false;

    let mut app = App::new(client, &config, repo, console("y\n")).with_audit(Some(audit));
    app.run("status").await.unwrap();

    assert!(!log_path.exists());
}

#[tokio::test]
async fn test_failed_command_returns_its_exit_code() {
    let (_temp, repo) = setup_two_commits();
    let client = ScriptedClient::new(&[
        "COMMAND: git checkout no-such-branch\nEXPLANATION: Switches to the branch.",
    ]);

    let mut app = App::new(client, &test_config(), repo, console("y\n"));
    let err = app.run("go to no-such-branch").await.unwrap_err();

    assert!(matches!(err, AppError::Execution(ExecutionError::NonZeroExit(_))));
    assert_ne!(err.exit_code(), 0);
    assert!(console_output(app.into_console()).contains("Command failed with exit code"));
}

#[tokio::test]
async fn test_dry_run_never_prompts() {
    let (_temp, repo) = setup_two_commits();
    let client = ScriptedClient::new(&[SOFT_RESET]);

    let mut app = App::new(client, &test_config(), repo.clone(), console("y\n")).with_dry_run(true);
    let outcome = app.run("undo my last commit").await.unwrap();

    assert!(matches!(outcome, Outcome::DryRun));
    assert_eq!(head_subject(&repo), "second");
    assert!(!console_output(app.into_console()).contains("[y/N]"));
}

#[tokio::test]
async fn test_outside_repository_still_suggests() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(&["COMMAND: git init\nEXPLANATION: Starts a new repository here."]);

    let mut app = App::new(client, &test_config(), temp.path().to_path_buf(), console("y\n"));
    let outcome = app.run("start a new project here").await.unwrap();

    assert!(matches!(outcome, Outcome::Executed(_)));
    assert!(temp.path().join(".git").exists());
}
