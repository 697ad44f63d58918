//! Strict parser for the labeled reply format
//!
//! The model is told to answer with nothing but `LABEL: value` lines:
//!
//! ```text
//! COMMAND: git reset --soft HEAD~1
//! EXPLANATION: Moves the branch back one commit and keeps your changes staged.
//! WARNING: none
//! NEXT: Edit your files and commit again when ready.
//! ```
//!
//! `COMMAND` and `EXPLANATION` are required, `WARNING` and `NEXT` are
//! optional. Anything else is an error; the parser never tries to recover a
//! command from free-form text.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    #[error("reply has no {0} line")]
    MissingLabel(&'static str),

    #[error("reply has more than one {0} line")]
    DuplicateLabel(&'static str),

    #[error("reply has an unknown label '{0}'")]
    UnknownLabel(String),

    #[error("reply contains an unlabeled line: {0}")]
    UnlabeledLine(String),

    #[error("{0} value is empty")]
    EmptyValue(&'static str),

    #[error("command has unbalanced quotes")]
    UnbalancedQuotes,

    #[error("reply is not the expected JSON object: {0}")]
    InvalidJson(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Command,
    Explanation,
    Warning,
    Next,
}

impl Label {
    const ALL: [Label; 4] = [Label::Command, Label::Explanation, Label::Warning, Label::Next];

    fn as_str(self) -> &'static str {
        match self {
            Label::Command => "COMMAND",
            Label::Explanation => "EXPLANATION",
            Label::Warning => "WARNING",
            Label::Next => "NEXT",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The labeled fields of a reply, still untokenized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub command: String,
    pub explanation: String,
    pub warning: Option<String>,
    pub next_step: Option<String>,
}

/// Parse a reply into its labeled fields
pub fn parse_reply(text: &str) -> Result<ParsedReply, ReplyError> {
    let mut values: [Option<String>; 4] = Default::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (name, value) = split_label(line)?;
        let label = Label::parse(name).ok_or_else(|| ReplyError::UnknownLabel(name.to_string()))?;

        let slot = &mut values[label.index()];
        if slot.is_some() {
            return Err(ReplyError::DuplicateLabel(label.as_str()));
        }
        *slot = Some(value.trim().to_string());
    }

    let [command, explanation, warning, next_step] = values;

    Ok(ParsedReply {
        command: required(command, Label::Command)?,
        explanation: required(explanation, Label::Explanation)?,
        warning: optional(warning),
        next_step: optional(next_step),
    })
}

/// Split a command value into argv using POSIX shell word rules
///
/// Only quoting and escaping are interpreted; nothing is expanded or executed.
pub fn tokenize(command: &str) -> Result<Vec<String>, ReplyError> {
    let tokens = shlex::split(command).ok_or(ReplyError::UnbalancedQuotes)?;
    if tokens.is_empty() {
        return Err(ReplyError::EmptyValue(Label::Command.as_str()));
    }
    Ok(tokens)
}

/// A label is a run of upper-case ASCII letters at the start of the line, then ':'
fn split_label(line: &str) -> Result<(&str, &str), ReplyError> {
    let unlabeled = || ReplyError::UnlabeledLine(line.to_string());

    let (name, value) = line.split_once(':').ok_or_else(unlabeled)?;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
        return Err(unlabeled());
    }
    Ok((name, value))
}

fn required(value: Option<String>, label: Label) -> Result<String, ReplyError> {
    match value {
        None => Err(ReplyError::MissingLabel(label.as_str())),
        Some(v) if v.is_empty() => Err(ReplyError::EmptyValue(label.as_str())),
        Some(v) => Ok(v),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("none") && !v.eq_ignore_ascii_case("null"))
}
