use std::io;
use thiserror::Error;

// Import module-level errors for AppError
use crate::config::settings::ConfigError;
use crate::git::executor::ExecutionError;
use crate::llm::client::LLMError;
use crate::llm::synthesizer::SynthesisError;

/// Errors that can occur while querying the repository
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Git command failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Top-level application error that wraps all module-specific errors
///
/// Every module keeps its own error enum; they all convert into AppError via
/// `From` so the run loop can use `?` throughout.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Coarse classification of every failure the tool can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    MalformedResponse,
    Timeout,
    Execution,
    Rejected,
    Service,
    Config,
    Git,
    Io,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Synthesis(err) => match err {
                SynthesisError::InvalidInput => ErrorKind::InvalidInput,
                SynthesisError::MalformedResponse(_) => ErrorKind::MalformedResponse,
                SynthesisError::Timeout(_) => ErrorKind::Timeout,
                SynthesisError::Rejected { .. } => ErrorKind::Rejected,
                SynthesisError::Service(_) => ErrorKind::Service,
            },
            AppError::Execution(ExecutionError::Timeout(_)) => ErrorKind::Timeout,
            AppError::Execution(_) => ErrorKind::Execution,
            AppError::Llm(LLMError::Timeout) => ErrorKind::Timeout,
            AppError::Llm(_) => ErrorKind::Service,
            AppError::Git(_) => ErrorKind::Git,
            AppError::Config(_) => ErrorKind::Config,
            AppError::Io(_) => ErrorKind::Io,
        }
    }

    /// Process exit code for this error
    ///
    /// A failed git command hands its own status back to the caller; every
    /// other failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Execution(ExecutionError::NonZeroExit(code)) if (1..=255).contains(code) => {
                *code
            }
            _ => 1,
        }
    }
}

/// Result type for repository queries
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
