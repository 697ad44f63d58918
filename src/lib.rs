pub mod app;
pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod error_translation;
pub mod git;
pub mod llm;
pub mod security;
pub mod suggestion;
pub mod ui;

// Re-export commonly used types for convenience
pub use error::{AppError, AppResult, ErrorKind, GitError};
pub use suggestion::{Request, RiskLevel, Suggestion};
