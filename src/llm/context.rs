use crate::git::repository::{Repository, RepositorySnapshot};
use tracing::{debug, warn};

/// Default budget for the repository section of the prompt
pub const DEFAULT_TOKEN_BUDGET: usize = 1500;

const TRUNCATION_MARKER: &str = "\n... [truncated]";

/// Repository state rendered for the system instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    pub os: &'static str,
    pub summary: String,
    pub estimated_tokens: usize,
}

impl RepoContext {
    /// Context for a directory that is not a git repository
    pub fn outside_repository() -> Self {
        Self::from_summary("Not inside a git repository.\n".to_string(), DEFAULT_TOKEN_BUDGET)
    }

    /// Gather context from a repository
    ///
    /// Never fails: when the repository cannot be queried the context says so.
    pub fn gather(repo: Option<&Repository>, budget: usize) -> Self {
        let Some(repo) = repo else {
            return Self::outside_repository();
        };

        match repo.snapshot() {
            Ok(snapshot) => Self::from_snapshot(&snapshot, budget),
            Err(err) => {
                warn!(error = %err, "Could not read repository state");
                Self::from_summary("Repository state unavailable.\n".to_string(), budget)
            }
        }
    }

    pub fn from_snapshot(snapshot: &RepositorySnapshot, budget: usize) -> Self {
        let mut summary = String::new();

        match snapshot.current_branch {
            Some(ref branch) => summary.push_str(&format!("Current branch: {}\n", branch)),
            None => summary.push_str("Detached HEAD state\n"),
        }

        if snapshot.in_merge {
            summary.push_str("Merge in progress\n");
        }
        if snapshot.in_rebase {
            summary.push_str("Rebase in progress\n");
        }

        if snapshot.status.is_empty() {
            summary.push_str("Working tree: clean\n");
        } else {
            summary.push_str("Working tree status (porcelain):\n");
            for line in &snapshot.status {
                summary.push_str("  ");
                summary.push_str(line);
                summary.push('\n');
            }
        }

        Self::from_summary(summary, budget)
    }

    fn from_summary(summary: String, budget: usize) -> Self {
        let mut ctx = Self {
            os: os_family(),
            estimated_tokens: estimate_tokens(&summary),
            summary,
        };
        ctx.truncate_to_budget(budget);
        ctx
    }

    /// Text placed in the system instruction
    pub fn render(&self) -> String {
        format!("Operating system: {}\n{}", self.os, self.summary)
    }

    fn truncate_to_budget(&mut self, max_tokens: usize) {
        if self.estimated_tokens <= max_tokens {
            return;
        }

        debug!(
            tokens = self.estimated_tokens,
            budget = max_tokens,
            "Repository context exceeds token budget, truncating"
        );

        let mut max_chars = max_tokens.saturating_mul(4).saturating_sub(TRUNCATION_MARKER.len());
        while !self.summary.is_char_boundary(max_chars) {
            max_chars -= 1;
        }
        self.summary.truncate(max_chars);
        self.summary.push_str(TRUNCATION_MARKER);
        self.estimated_tokens = estimate_tokens(&self.summary);
    }
}

/// Estimate tokens using 4 characters ≈ 1 token heuristic
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

fn os_family() -> &'static str {
    match std::env::consts::OS {
        "macos" => "macOS",
        "windows" => "Windows",
        "linux" => "Linux",
        other => other,
    }
}
