use crate::ui::confirm::Approval;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// How long an interrupted child gets to exit on its own before it is killed
const INTERRUPT_GRACE: Duration = Duration::from_secs(5);

/// Git skips launching an editor named `:` and keeps the prepared message or todo list
const NO_EDITOR: &str = ":";

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Command did not finish within {0:?} and was stopped")]
    Timeout(Duration),

    #[error("Command was interrupted")]
    Interrupted,

    #[error("Command exited with status {0}")]
    NonZeroExit(i32),

    #[error("Empty command")]
    EmptyCommand,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Exit status and captured output of an executed command
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Runs approved commands as a child process, without a shell
#[derive(Debug)]
pub struct CommandExecutor {
    working_dir: PathBuf,
    timeout: Duration,
    echo: bool,
}

impl CommandExecutor {
    pub fn new<P: AsRef<Path>>(working_dir: P, timeout: Duration) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            timeout,
            echo: false,
        }
    }

    /// Mirror the child's output to this process's stdout/stderr while capturing it
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn echoes(&self) -> bool {
        self.echo
    }

    /// Execute a confirmed suggestion
    ///
    /// A non-zero exit is not an error here; it is returned in the result so
    /// the caller can report it. Nothing is ever retried.
    pub async fn execute(&self, approval: Approval<'_>) -> Result<ExecutionResult, ExecutionError> {
        self.run(approval.suggestion().command()).await
    }

    async fn run(&self, argv: &[String]) -> Result<ExecutionResult, ExecutionError> {
        let (program, args) = argv.split_first().ok_or(ExecutionError::EmptyCommand)?;

        info!(%program, args = ?args, dir = %self.working_dir.display(), "Executing command");

        let mut child = Command::new(program)
            .args(args)
            .current_dir(&self.working_dir)
            // Output is piped, so an interactive editor would hang until the timeout
            .env("GIT_EDITOR", NO_EDITOR)
            .env("GIT_SEQUENCE_EDITOR", NO_EDITOR)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout_task = tokio::spawn(capture(child.stdout.take(), Stream::Stdout, self.echo));
        let stderr_task = tokio::spawn(capture(child.stderr.take(), Stream::Stderr, self.echo));
        let started = Instant::now();

        let status = tokio::select! {
            status = child.wait() => status?,
            _ = tokio::time::sleep(self.timeout) => {
                warn!(timeout = ?self.timeout, "Command timed out, killing it");
                child.kill().await?;
                stdout_task.abort();
                stderr_task.abort();
                return Err(ExecutionError::Timeout(self.timeout));
            }
            _ = tokio::signal::ctrl_c() => {
                // The terminal already delivered SIGINT to the child; give it a chance to exit
                warn!("Interrupted, waiting for the command to exit");
                if tokio::time::timeout(INTERRUPT_GRACE, child.wait()).await.is_err() {
                    child.kill().await?;
                }
                stdout_task.abort();
                stderr_task.abort();
                return Err(ExecutionError::Interrupted);
            }
        };

        let stdout = join_capture(stdout_task).await?;
        let stderr = join_capture(stderr_task).await?;
        let exit_code = status.code().unwrap_or(-1);
        let duration = started.elapsed();

        debug!(exit_code, ?duration, "Command finished");

        Ok(ExecutionResult {
            exit_code,
            stdout,
            stderr,
            duration,
        })
    }
}

/// Read a child stream to the end, optionally echoing each line as it arrives
async fn capture<R>(reader: Option<R>, stream: Stream, echo: bool) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return Ok(String::new());
    };

    let mut reader = BufReader::new(reader);
    let mut captured = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if echo {
            match stream {
                Stream::Stdout => {
                    let mut out = io::stdout().lock();
                    out.write_all(&line)?;
                    out.flush()?;
                }
                Stream::Stderr => io::stderr().lock().write_all(&line)?,
            }
        }
        captured.extend_from_slice(&line);
    }

    Ok(String::from_utf8_lossy(&captured).into_owned())
}

async fn join_capture(task: tokio::task::JoinHandle<io::Result<String>>) -> io::Result<String> {
    task.await.map_err(io::Error::other)?
}
