#![allow(dead_code)]

use async_trait::async_trait;
use gitsay::config::Config;
use gitsay::llm::{LLMClient, LLMError};
use gitsay::ui::{Console, Theme};
use std::collections::VecDeque;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Helper to create a test git repository on branch `main`
pub fn create_test_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init", "-b", "main"]);
    git(&repo_path, &["config", "user.name", "Test User"]);
    git(&repo_path, &["config", "user.email", "test@example.com"]);

    (temp_dir, repo_path)
}

/// Helper to create a commit
pub fn create_commit(repo_path: &Path, file: &str, content: &str, message: &str) {
    fs::write(repo_path.join(file), content).expect("Failed to write file");
    git(repo_path, &["add", file]);
    git(repo_path, &["commit", "-m", message]);
}

/// Run git in the repository and return its stdout
pub fn git(repo_path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .expect("Failed to run git");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn branch_exists(repo_path: &Path, name: &str) -> bool {
    !git(repo_path, &["branch", "--list", name]).trim().is_empty()
}

pub fn head_subject(repo_path: &Path) -> String {
    git(repo_path, &["log", "-1", "--format=%s"]).trim().to_string()
}

/// Repository stopped in a merge with one conflict in `config.txt`
pub fn create_conflicted_repo() -> (TempDir, PathBuf) {
    let (temp, repo) = create_test_repo();
    create_commit(&repo, "config.txt", "name = app\nurl = base\nport = 80\n", "base");

    git(&repo, &["checkout", "-b", "feature"]);
    create_commit(&repo, "config.txt", "name = app\nurl = staging\nport = 80\n", "staging url");

    git(&repo, &["checkout", "main"]);
    create_commit(&repo, "config.txt", "name = app\nurl = production\nport = 80\n", "production url");

    git(&repo, &["merge", "feature"]);
    (temp, repo)
}

/// Config for tests: no live echo, short timeouts
pub fn test_config() -> Config {
    let mut config = Config::default_config();
    config.behavior.stream_output = false;
    config.llm.timeout_seconds = 5;
    config.git.timeout_seconds = 30;
    config
}

pub type TestConsole = Console<Cursor<String>, Vec<u8>>;

pub fn console(input: &str) -> TestConsole {
    Console::new(Cursor::new(input.to_string()), Vec::new(), Theme::plain())
}

pub fn console_output(console: TestConsole) -> String {
    let (_, output) = console.into_parts();
    String::from_utf8(output).unwrap()
}

/// Replies with canned text, in order, and records every prompt it was sent
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, LLMError>>>,
    delay: Duration,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self::build(replies, Duration::ZERO))
    }

    pub fn slow(reply: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self::build(&[reply], delay))
    }

    pub fn failing(error: LLMError) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Err(error)])),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn build(replies: &[&str], delay: Duration) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            delay,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMClient for ScriptedClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LLMError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LLMError::InvalidResponse("no scripted reply left".to_string())))
    }

    fn provider(&self) -> &'static str {
        "scripted"
    }
}
