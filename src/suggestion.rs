use std::fmt;

use crate::llm::synthesizer::SynthesisError;
use crate::security::{DangerousOp, RiskAssessment};

/// A natural-language request, trimmed and guaranteed non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request(String);

impl Request {
    pub fn new(text: &str) -> Result<Self, SynthesisError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SynthesisError::InvalidInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How risky a suggested command is to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Safe,
    Destructive,
    /// The subcommand is not one the guard recognises
    Unknown,
}

impl RiskLevel {
    /// Destructive and unrecognised commands need the typed confirmation
    pub fn requires_strong_confirmation(self) -> bool {
        !matches!(self, RiskLevel::Safe)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Destructive => "destructive",
            RiskLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command proposed for one request, with its explanation and risk
///
/// Suggestions are immutable once built; the only way to run one is through
/// the confirmation gate in [`crate::ui::confirm`].
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    request: Request,
    command: Vec<String>,
    explanation: String,
    risk: RiskLevel,
    danger: Option<DangerousOp>,
    warning: Option<String>,
    next_step: Option<String>,
}

impl Suggestion {
    pub(crate) fn new(
        request: Request,
        command: Vec<String>,
        explanation: String,
        assessment: RiskAssessment,
    ) -> Self {
        debug_assert!(!command.is_empty());
        Self {
            request,
            command,
            explanation,
            risk: assessment.level,
            danger: assessment.danger,
            warning: None,
            next_step: None,
        }
    }

    pub(crate) fn with_notes(mut self, warning: Option<String>, next_step: Option<String>) -> Self {
        self.warning = warning;
        self.next_step = next_step;
        self
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The argv to run, program first
    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn program(&self) -> &str {
        &self.command[0]
    }

    pub fn args(&self) -> &[String] {
        &self.command[1..]
    }

    /// Shell-quoted rendering of the command, for display and logs only
    pub fn command_line(&self) -> String {
        shlex::try_join(self.command.iter().map(String::as_str))
            .unwrap_or_else(|_| self.command.join(" "))
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn risk(&self) -> RiskLevel {
        self.risk
    }

    pub fn danger(&self) -> Option<DangerousOp> {
        self.danger
    }

    /// Ambiguity warning supplied by the model, if any
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// What the user would typically do after running this
    pub fn next_step(&self) -> Option<&str> {
        self.next_step.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(level: RiskLevel) -> RiskAssessment {
        RiskAssessment {
            level,
            danger: None,
            subcommand: "status".to_string(),
        }
    }

    #[test]
    fn test_request_is_trimmed() {
        let request = Request::new("  show me the log \n").unwrap();
        assert_eq!(request.as_str(), "show me the log");
    }

    #[test]
    fn test_blank_request_rejected() {
        assert!(matches!(Request::new(""), Err(SynthesisError::InvalidInput)));
        assert!(matches!(Request::new(" \t\n "), Err(SynthesisError::InvalidInput)));
    }

    #[test]
    fn test_command_line_quotes_arguments() {
        let suggestion = Suggestion::new(
            Request::new("commit").unwrap(),
            vec!["git".into(), "commit".into(), "-m".into(), "fix the bug".into()],
            "Commits staged changes.".into(),
            assessment(RiskLevel::Safe),
        );

        let line = suggestion.command_line();
        assert!(line.starts_with("git commit -m "));
        assert_eq!(shlex::split(&line).unwrap(), suggestion.command());
        assert_eq!(suggestion.program(), "git");
        assert_eq!(suggestion.args().len(), 3);
    }

    #[test]
    fn test_strong_confirmation_levels() {
        assert!(!RiskLevel::Safe.requires_strong_confirmation());
        assert!(RiskLevel::Destructive.requires_strong_confirmation());
        assert!(RiskLevel::Unknown.requires_strong_confirmation());
    }

    #[test]
    fn test_notes_are_optional() {
        let suggestion = Suggestion::new(
            Request::new("status").unwrap(),
            vec!["git".into(), "status".into()],
            "Shows the working tree status.".into(),
            assessment(RiskLevel::Safe),
        )
        .with_notes(None, Some("Stage files with git add".into()));

        assert!(suggestion.warning().is_none());
        assert_eq!(suggestion.next_step(), Some("Stage files with git add"));
    }
}
