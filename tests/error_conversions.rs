use gitsay::config::settings::ConfigError;
use gitsay::git::ExecutionError;
use gitsay::llm::response::ReplyError;
use gitsay::llm::{LLMError, SynthesisError};
use gitsay::security::ValidationError;
use gitsay::{AppError, AppResult, ErrorKind, GitError};
use std::error::Error;
use std::time::Duration;

#[test]
fn test_git_error_converts_to_app_error() {
    let app_err: AppError = GitError::NotARepository.into();
    assert!(matches!(app_err, AppError::Git(_)));
    assert_eq!(app_err.kind(), ErrorKind::Git);
}

#[test]
fn test_config_error_converts_to_app_error() {
    let app_err: AppError = ConfigError::DirectoryNotFound.into();
    assert!(matches!(app_err, AppError::Config(_)));
    assert_eq!(app_err.kind(), ErrorKind::Config);
}

#[test]
fn test_io_error_converts_to_app_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
    let app_err: AppError = io_err.into();
    assert!(matches!(app_err, AppError::Io(_)));
}

#[test]
fn test_synthesis_kinds() {
    let cases = [
        (SynthesisError::InvalidInput, ErrorKind::InvalidInput),
        (
            SynthesisError::MalformedResponse(ReplyError::MissingLabel("COMMAND")),
            ErrorKind::MalformedResponse,
        ),
        (SynthesisError::Timeout(Duration::from_secs(30)), ErrorKind::Timeout),
        (
            SynthesisError::Rejected {
                command: "git status | sh".to_string(),
                reason: ValidationError::ShellOperator("|".to_string()),
            },
            ErrorKind::Rejected,
        ),
        (SynthesisError::Service(LLMError::RateLimitExceeded(60)), ErrorKind::Service),
    ];

    for (err, kind) in cases {
        let app_err = AppError::from(err);
        assert_eq!(app_err.kind(), kind, "{}", app_err);
        assert_eq!(app_err.exit_code(), 1);
    }
}

#[test]
fn test_timeouts_share_a_kind() {
    assert_eq!(AppError::from(LLMError::Timeout).kind(), ErrorKind::Timeout);
    assert_eq!(
        AppError::from(ExecutionError::Timeout(Duration::from_secs(1))).kind(),
        ErrorKind::Timeout
    );
}

#[test]
fn test_nonzero_exit_code_propagates() {
    let app_err = AppError::from(ExecutionError::NonZeroExit(128));
    assert_eq!(app_err.kind(), ErrorKind::Execution);
    assert_eq!(app_err.exit_code(), 128);

    assert_eq!(AppError::from(ExecutionError::NonZeroExit(-1)).exit_code(), 1);
    assert_eq!(AppError::from(ExecutionError::Interrupted).exit_code(), 1);
}

#[test]
fn test_error_source_chain() {
    let app_err: AppError = GitError::IoError(std::io::Error::other("disk gone")).into();
    let source = app_err.source().expect("AppError::Git has a source");
    assert!(source.to_string().contains("disk gone"));
}

#[test]
fn test_question_mark_conversion() {
    fn load() -> AppResult<()> {
        let loaded: Result<(), ConfigError> =
            Err(ConfigError::InvalidValue("model must not be empty".to_string()));
        loaded?;
        Ok(())
    }

    let err = load().unwrap_err();
    assert_eq!(err.to_string(), "Configuration error: Invalid config value: model must not be empty");
}
