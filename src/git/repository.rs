use crate::error::{GitError, GitResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A git working tree and the read-only queries the tool needs from it
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

/// Snapshot of the repository state used to build prompt context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    /// `None` when HEAD is detached
    pub current_branch: Option<String>,
    /// Porcelain v1 status lines, empty when the tree is clean
    pub status: Vec<String>,
    pub in_merge: bool,
    pub in_rebase: bool,
}

impl Repository {
    /// Detect git repository starting from a specific directory
    pub fn discover_from<P: AsRef<Path>>(start_path: P) -> GitResult<Self> {
        let mut current = start_path.as_ref().to_path_buf();

        loop {
            // `.git` is a directory, or a file for worktrees and submodules
            if current.join(".git").exists() {
                return Ok(Self::new(current));
            }

            if !current.pop() {
                return Err(GitError::NotARepository);
            }
        }
    }

    /// Create a Repository for a known working tree
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Query the state that goes into the prompt
    pub fn snapshot(&self) -> GitResult<RepositorySnapshot> {
        let status = self
            .git(&["status", "--porcelain"])?
            .lines()
            .map(str::to_string)
            .collect();

        Ok(RepositorySnapshot {
            current_branch: self.current_branch()?,
            status,
            in_merge: self.git_path_exists("MERGE_HEAD")?,
            in_rebase: self.git_path_exists("rebase-merge")? || self.git_path_exists("rebase-apply")?,
        })
    }

    /// Get the current branch name, `None` when detached
    pub fn current_branch(&self) -> GitResult<Option<String>> {
        let branch = self.git(&["branch", "--show-current"])?;
        let branch = branch.trim();
        Ok((!branch.is_empty()).then(|| branch.to_string()))
    }

    /// Files with unresolved merge conflicts, relative to the working tree
    pub fn conflicted_files(&self) -> GitResult<Vec<PathBuf>> {
        let output = self.git(&["diff", "--name-only", "--diff-filter=U"])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    /// Name of the branch being merged in, if a merge is in progress
    pub fn merge_head_name(&self) -> GitResult<Option<String>> {
        if !self.git_path_exists("MERGE_HEAD")? {
            return Ok(None);
        }

        let merge_head = self.git(&["rev-parse", "MERGE_HEAD"])?;
        let name = self.git(&["name-rev", "--name-only", merge_head.trim()])?;
        let name = name.trim();
        Ok((!name.is_empty() && name != "undefined").then(|| name.to_string()))
    }

    /// Whether a file inside the git directory exists (handles worktrees)
    fn git_path_exists(&self, name: &str) -> GitResult<bool> {
        let path = self.git(&["rev-parse", "--git-path", name])?;
        Ok(self.path.join(path.trim()).exists())
    }

    /// Run a read-only git query and return its stdout
    fn git(&self, args: &[&str]) -> GitResult<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()
            .map_err(|e| GitError::CommandFailed(format!("Failed to execute git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed(format!(
                "'git {}' failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
