use crate::suggestion::Suggestion;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Append-only history of what was suggested, run, declined and rejected
pub struct AuditLogger {
    log_path: PathBuf,
    max_size: u64,
}

impl AuditLogger {
    /// Logger writing to `~/.config/gitsay/history.log`
    pub fn new() -> io::Result<Self> {
        Self::with_path(Self::default_log_path()?)
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let log_path = path.as_ref().to_path_buf();

        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            log_path,
            max_size: MAX_LOG_SIZE,
        })
    }

    /// Rotate once the file grows past `bytes`
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    fn default_log_path() -> io::Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "HOME environment variable not set"))?;

        Ok(PathBuf::from(home).join(".config").join("gitsay").join("history.log"))
    }

    /// An approved command and how it ended
    pub fn log_execution(&self, suggestion: &Suggestion, repo_path: &Path, exit_code: i32) -> io::Result<()> {
        self.append(
            repo_path,
            &format!(
                "[exit:{}] [risk:{}] {}",
                exit_code,
                suggestion.risk(),
                suggestion.command_line()
            ),
        )
    }

    /// A suggestion the user turned down
    pub fn log_declined(&self, suggestion: &Suggestion, repo_path: &Path) -> io::Result<()> {
        self.append(
            repo_path,
            &format!("[DECLINED] [risk:{}] {}", suggestion.risk(), suggestion.command_line()),
        )
    }

    /// A reply the guard refused to turn into a suggestion
    pub fn log_rejection(&self, request: &str, command: &str, reason: &str, repo_path: &Path) -> io::Result<()> {
        self.append(
            repo_path,
            &format!(
                "[REJECTED] request={:?} command={:?} reason={:?}",
                request, command, reason
            ),
        )
    }

    /// Conflict blocks written back to a file
    pub fn log_resolution(&self, file: &Path, resolved: usize, repo_path: &Path) -> io::Result<()> {
        self.append(
            repo_path,
            &format!("[RESOLVED] {} block(s) in {}", resolved, file.display()),
        )
    }

    fn append(&self, repo_path: &Path, entry: &str) -> io::Result<()> {
        self.rotate_if_needed()?;

        let timestamp = Utc::now().to_rfc3339();
        let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        writeln!(file, "[{}] [{}] [{}] {}", timestamp, user, repo_path.display(), entry)?;
        file.flush()
    }

    /// history.log -> history.log.1 once the size limit is exceeded
    fn rotate_if_needed(&self) -> io::Result<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        if fs::metadata(&self.log_path)?.len() > self.max_size {
            fs::rename(&self.log_path, self.log_path.with_extension("log.1"))?;
        }

        Ok(())
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
