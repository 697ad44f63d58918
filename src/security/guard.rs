use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

use crate::security::{DESTRUCTIVE_TOKENS, KNOWN_GIT_SUBCOMMANDS};
use crate::suggestion::RiskLevel;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Only git commands can be run, got '{0}'")]
    NonGitProgram(String),

    #[error("Command contains shell syntax '{0}', but commands are never run through a shell")]
    ShellOperator(String),

    #[error("Command contains dangerous flag: {0}")]
    DangerousFlag(String),

    #[error("Command has no git subcommand")]
    MissingSubcommand,

    #[error("Empty command")]
    EmptyCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerousOp {
    ForcePush,
    HardReset,
    Clean,
    FilterBranch,
    ForceCheckout,
    DeleteBranch,
    DeleteTag,
    DeleteRef,
    Rebase,
    RewriteHistory,
    RemoveFiles,
    DiscardChanges,
    DropStash,
    Other,
}

impl DangerousOp {
    /// One-line description used in the confirmation warning
    pub fn description(self) -> &'static str {
        match self {
            DangerousOp::ForcePush => "Force push overwrites history on the remote",
            DangerousOp::HardReset => "Hard reset discards all uncommitted changes",
            DangerousOp::Clean => "Clean permanently deletes untracked files",
            DangerousOp::FilterBranch => "Filter-branch rewrites the entire repository history",
            DangerousOp::ForceCheckout => "Force checkout discards local changes",
            DangerousOp::DeleteBranch => "Deletes branches, possibly with unmerged commits",
            DangerousOp::DeleteTag => "Deletes tags",
            DangerousOp::DeleteRef => "Deletes refs that may not be recoverable",
            DangerousOp::Rebase => "Rebase rewrites commit history",
            DangerousOp::RewriteHistory => "Rewrites existing commits",
            DangerousOp::RemoveFiles => "Removes files from the working tree",
            DangerousOp::DiscardChanges => "Discards changes in the working tree",
            DangerousOp::DropStash => "Permanently drops stashed changes",
            DangerousOp::Other => "This command can destroy work or rewrite history",
        }
    }
}

/// Outcome of checking a command: how risky it is and why
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub danger: Option<DangerousOp>,
    pub subcommand: String,
}

// Tokens that only make sense to a shell
const SHELL_OPERATORS: &[&str] = &["&&", "||", "|", ";", ">", ">>", "<", "&", "2>&1", "|&"];
const SHELL_METACHARACTERS: &[&str] = &[";", "|", "&", "<", ">", "`", "$("];

// Global options that change which repository or config git uses
const FORBIDDEN_GLOBAL_OPTIONS: &[&str] = &[
    "-c",
    "-C",
    "--exec-path",
    "--git-dir",
    "--work-tree",
    "--config-env",
];

// Options that make git run an arbitrary program
const FORBIDDEN_OPTIONS: &[&str] = &["--exec", "--exec-path", "--upload-pack", "--receive-pack"];

const FORBIDDEN_CONFIG_KEYS: &[&str] = &[
    "core.sshcommand",
    "core.pager",
    "core.editor",
    "core.hookspath",
    "core.fsmonitor",
];

/// Policy checks and risk classification for suggested commands
pub struct CommandGuard {
    known_subcommands: HashSet<&'static str>,
    denylist: HashSet<&'static str>,
}

impl CommandGuard {
    pub fn new() -> Self {
        Self {
            known_subcommands: KNOWN_GIT_SUBCOMMANDS.iter().copied().collect(),
            denylist: DESTRUCTIVE_TOKENS.iter().copied().collect(),
        }
    }

    /// Validate a tokenized command and classify its risk
    pub fn check(&self, tokens: &[String]) -> Result<RiskAssessment, ValidationError> {
        self.validate(tokens)?;
        Ok(self.classify(tokens))
    }

    /// Reject commands that need a shell, are not git, or can run other programs
    pub fn validate(&self, tokens: &[String]) -> Result<(), ValidationError> {
        let Some(program) = tokens.first() else {
            return Err(ValidationError::EmptyCommand);
        };

        // Shell syntax first: a pipeline is never a git command
        self.check_for_shell_syntax(tokens)?;

        if program != "git" {
            return Err(ValidationError::NonGitProgram(program.clone()));
        }

        self.check_dangerous_flags(tokens)?;

        if Self::subcommand_index(tokens).is_none() {
            return Err(ValidationError::MissingSubcommand);
        }

        Ok(())
    }

    /// Classify an already validated command
    pub fn classify(&self, tokens: &[String]) -> RiskAssessment {
        let subcommand = Self::subcommand_index(tokens)
            .map(|idx| tokens[idx].to_lowercase())
            .unwrap_or_default();
        let normalized = Self::normalize(tokens);

        let destructive = normalized
            .iter()
            .any(|token| self.denylist.contains(token.as_str()));

        let args = Self::subcommand_index(tokens)
            .map_or(&[][..], |idx| &tokens[idx + 1..]);
        let danger = if destructive {
            Some(Self::detect_dangerous_op(&subcommand, &normalized))
        } else {
            Self::detect_by_arguments(&subcommand, args)
        };

        let (level, danger) = if let Some(op) = danger {
            (RiskLevel::Destructive, Some(op))
        } else if !self.known_subcommands.contains(subcommand.as_str()) {
            (RiskLevel::Unknown, None)
        } else {
            (RiskLevel::Safe, None)
        };

        debug!(%subcommand, risk = %level, "Classified command");

        RiskAssessment {
            level,
            danger,
            subcommand,
        }
    }

    /// Position of the subcommand: the first non-option token after `git`
    fn subcommand_index(tokens: &[String]) -> Option<usize> {
        tokens
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, token)| !token.starts_with('-'))
            .map(|(idx, _)| idx)
    }

    fn check_for_shell_syntax(&self, tokens: &[String]) -> Result<(), ValidationError> {
        for token in tokens {
            if SHELL_OPERATORS.contains(&token.as_str()) {
                return Err(ValidationError::ShellOperator(token.clone()));
            }

            // Quoted arguments with spaces (commit messages) are passed literally
            if token.chars().any(char::is_whitespace) {
                continue;
            }

            if let Some(meta) = SHELL_METACHARACTERS.iter().find(|m| token.contains(*m)) {
                return Err(ValidationError::ShellOperator(meta.to_string()));
            }
        }

        Ok(())
    }

    fn check_dangerous_flags(&self, tokens: &[String]) -> Result<(), ValidationError> {
        let sub_idx = Self::subcommand_index(tokens).unwrap_or(tokens.len());

        // Options between `git` and the subcommand
        for token in &tokens[1..sub_idx] {
            let flag = Self::strip_value(token);
            if FORBIDDEN_GLOBAL_OPTIONS.contains(&flag) {
                return Err(ValidationError::DangerousFlag(flag.to_string()));
            }
        }

        for token in tokens {
            let flag = Self::strip_value(token);
            if FORBIDDEN_OPTIONS.contains(&flag) {
                return Err(ValidationError::DangerousFlag(flag.to_string()));
            }
        }

        Self::check_config_settings(tokens, sub_idx)?;

        // rebase -x runs a shell command after every commit
        if tokens.get(sub_idx).map(String::as_str) == Some("rebase")
            && tokens[sub_idx..].iter().any(|t| t == "-x")
        {
            return Err(ValidationError::DangerousFlag("-x".to_string()));
        }

        Ok(())
    }

    /// Reject config writes that make git run a program
    ///
    /// Keys are only looked at where git reads them: the arguments of
    /// `git config` and the values of `-c`/`--config` (as `clone` takes them).
    fn check_config_settings(tokens: &[String], sub_idx: usize) -> Result<(), ValidationError> {
        let args = tokens.get(sub_idx + 1..).unwrap_or_default();
        let mut settings: Vec<(&str, Option<&str>)> = Vec::new();

        if tokens.get(sub_idx).map(String::as_str) == Some("config") {
            let positional: Vec<&str> = args
                .iter()
                .map(String::as_str)
                .filter(|arg| !arg.starts_with('-'))
                .collect();
            for (idx, key) in positional.iter().enumerate() {
                settings.push((*key, positional.get(idx + 1).copied()));
            }
        }

        let mut iter = args.iter().map(String::as_str);
        while let Some(arg) = iter.next() {
            let assignment = match arg {
                "-c" | "--config" => iter.next(),
                _ => arg.strip_prefix("--config="),
            };
            if let Some(assignment) = assignment {
                let (key, value) = assignment
                    .split_once('=')
                    .map_or((assignment, None), |(key, value)| (key, Some(value)));
                settings.push((key, value));
            }
        }

        for (key, value) in settings {
            let key = key.to_lowercase();
            if FORBIDDEN_CONFIG_KEYS.contains(&key.as_str()) {
                return Err(ValidationError::DangerousFlag(key));
            }
            // `!` aliases are run by the shell
            if key.starts_with("alias.") && value.is_some_and(|v| v.trim_start().starts_with('!')) {
                return Err(ValidationError::DangerousFlag(key));
            }
        }

        Ok(())
    }

    fn strip_value(token: &str) -> &str {
        if token.starts_with('-') {
            token.split_once('=').map_or(token, |(flag, _)| flag)
        } else {
            token
        }
    }

    /// Lowercase every token, drop `=value` suffixes and split `-abc` into `-a -b -c`
    fn normalize(tokens: &[String]) -> Vec<String> {
        let mut normalized = Vec::with_capacity(tokens.len());

        for token in tokens.iter().skip(1) {
            let lower = token.to_lowercase();
            let flag = Self::strip_value(&lower);

            if flag.starts_with('-') && !flag.starts_with("--") && flag.len() > 2 {
                normalized.extend(flag.chars().skip(1).map(|c| format!("-{c}")));
            } else {
                normalized.push(flag.to_string());
            }
        }

        normalized
    }

    /// Destructive forms that show up in arguments rather than flags
    fn detect_by_arguments(subcommand: &str, args: &[String]) -> Option<DangerousOp> {
        let mut positional = args.iter().map(String::as_str).filter(|arg| !arg.starts_with('-'));

        match subcommand {
            // `+src:dst` forces, `:dst` deletes the remote ref
            "push" => positional.find_map(|refspec| {
                if refspec.starts_with('+') {
                    Some(DangerousOp::ForcePush)
                } else if refspec.starts_with(':') {
                    Some(DangerousOp::DeleteRef)
                } else {
                    None
                }
            }),
            // Pathspecs overwrite uncommitted changes
            "checkout" if args.iter().any(|arg| arg == "--" || arg == ".") => {
                Some(DangerousOp::DiscardChanges)
            }
            "reflog" if matches!(positional.next(), Some("expire" | "delete")) => Some(DangerousOp::DeleteRef),
            _ => None,
        }
    }

    fn detect_dangerous_op(subcommand: &str, normalized: &[String]) -> DangerousOp {
        let has = |flag: &str| normalized.iter().any(|t| t == flag);
        let forced = has("--force") || has("-f") || has("--force-with-lease");
        let deleting = has("-d") || has("--delete");

        match subcommand {
            "push" if forced || has("--mirror") => DangerousOp::ForcePush,
            "push" if deleting || has("--prune") => DangerousOp::DeleteRef,
            "reset" if has("--hard") => DangerousOp::HardReset,
            "clean" => DangerousOp::Clean,
            "filter-branch" | "filter-repo" => DangerousOp::FilterBranch,
            "checkout" | "switch" if forced => DangerousOp::ForceCheckout,
            "branch" if deleting => DangerousOp::DeleteBranch,
            "tag" if deleting => DangerousOp::DeleteTag,
            "rebase" => DangerousOp::Rebase,
            "commit" if has("--amend") => DangerousOp::RewriteHistory,
            "rm" => DangerousOp::RemoveFiles,
            "restore" => DangerousOp::DiscardChanges,
            "stash" if has("drop") || has("clear") => DangerousOp::DropStash,
            "update-ref" | "gc" | "fetch" | "remote" => DangerousOp::DeleteRef,
            _ => DangerousOp::Other,
        }
    }
}

impl Default for CommandGuard {
    fn default() -> Self {
        Self::new()
    }
}
