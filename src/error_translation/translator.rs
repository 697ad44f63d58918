use crate::error::AppError;
use crate::git::executor::ExecutionError;
use crate::llm::client::LLMError;
use crate::llm::synthesizer::SynthesisError;

/// A failure explained in plain words, with an optional next move
#[derive(Debug, Clone)]
pub struct UserFriendlyError {
    pub simple_message: String,
    pub suggestion: Option<String>,
    pub raw_error: String,
}

impl UserFriendlyError {
    fn new(message: &str, suggestion: Option<&str>, raw_error: String) -> Self {
        Self {
            simple_message: message.to_string(),
            suggestion: suggestion.map(str::to_string),
            raw_error,
        }
    }
}

/// One known git failure: all `needles` must appear in the lowercased stderr
struct GitPattern {
    needles: &'static [&'static str],
    message: &'static str,
    hint: Option<&'static str>,
}

// Checked in order, most specific first
const GIT_PATTERNS: &[GitPattern] = &[
    GitPattern {
        needles: &["untracked working tree files would be overwritten"],
        message: "Untracked files would be overwritten by this operation.",
        hint: Some("Move or remove the conflicting files, or commit them first."),
    },
    GitPattern {
        needles: &["would be overwritten"],
        message: "This would overwrite changes you have not committed.",
        hint: Some("Commit or stash your changes first: git stash"),
    },
    GitPattern {
        needles: &["no upstream"],
        message: "No remote branch is configured for tracking.",
        hint: Some("Try: git push -u origin <branch-name>"),
    },
    GitPattern {
        needles: &["does not have an upstream"],
        message: "No remote branch is configured for tracking.",
        hint: Some("Try: git push -u origin <branch-name>"),
    },
    GitPattern {
        needles: &["non-fast-forward"],
        message: "The remote has commits you do not have yet.",
        hint: Some("Pull first: git pull"),
    },
    GitPattern {
        needles: &["diverged"],
        message: "Local and remote branches have diverged.",
        hint: Some("Pull first: git pull"),
    },
    GitPattern {
        needles: &["conflict"],
        message: "There are merge conflicts that need to be resolved.",
        hint: Some("Run 'gitsay resolve', or fix the files by hand, then git add and git commit."),
    },
    GitPattern {
        needles: &["nothing to commit"],
        message: "No changes to commit, the working tree is clean.",
        hint: None,
    },
    GitPattern {
        needles: &["no changes added to commit"],
        message: "No files are staged for commit.",
        hint: Some("Stage files with: git add <file>"),
    },
    GitPattern {
        needles: &["pathspec", "did not match"],
        message: "File path not found in the repository.",
        hint: Some("Check the path. 'git status' lists the files git knows about."),
    },
    GitPattern {
        needles: &["already exists"],
        message: "Something with that name already exists.",
        hint: Some("Use a different name or remove the existing one first."),
    },
    GitPattern {
        needles: &["not fully merged"],
        message: "The branch has commits that are not merged anywhere else.",
        hint: Some("Merge it first, or delete it anyway with git branch -D <name>."),
    },
    GitPattern {
        needles: &["not a git repository"],
        message: "Current directory is not a git repository.",
        hint: Some("Initialize with: git init"),
    },
    GitPattern {
        needles: &["does not appear to be a git repository"],
        message: "Remote repository not found.",
        hint: Some("Check the remote URL with: git remote -v"),
    },
    GitPattern {
        needles: &["authentication failed"],
        message: "Authentication failed, check your credentials.",
        hint: Some("Verify your SSH keys or personal access token."),
    },
    GitPattern {
        needles: &["permission denied"],
        message: "Access was denied.",
        hint: Some("Verify your SSH keys or personal access token."),
    },
    GitPattern {
        needles: &["rebase in progress"],
        message: "A rebase is in progress.",
        hint: Some("Continue with git rebase --continue, or abort with git rebase --abort."),
    },
    GitPattern {
        needles: &["does not have any commits yet"],
        message: "This branch has no commits yet.",
        hint: Some("Make a first commit: git add <file> then git commit -m \"message\""),
    },
    GitPattern {
        needles: &["ambiguous argument 'head"],
        message: "This repository has no commits yet.",
        hint: Some("Make a first commit: git add <file> then git commit -m \"message\""),
    },
];

/// Explain a failed git command from its stderr
pub fn translate_git_output(stderr: &str) -> Option<UserFriendlyError> {
    let lower = stderr.to_lowercase();

    GIT_PATTERNS
        .iter()
        .find(|p| p.needles.iter().all(|n| lower.contains(n)))
        .map(|p| UserFriendlyError::new(p.message, p.hint, stderr.trim().to_string()))
}

/// Explain any error the tool can report
pub fn translate_app_error(error: &AppError) -> UserFriendlyError {
    let raw = error.to_string();

    match error {
        AppError::Synthesis(err) => translate_synthesis(err, raw),
        AppError::Llm(err) => translate_llm(err, raw),
        AppError::Execution(ExecutionError::Spawn { .. }) => {
            UserFriendlyError::new("Could not start git.", Some("Check that git is installed and on your PATH."), raw)
        }
        AppError::Execution(ExecutionError::Timeout(_)) => UserFriendlyError::new(
            "The command took too long and was stopped.",
            Some("Raise [git] timeout_seconds in the config, or use --exec-timeout."),
            raw,
        ),
        AppError::Execution(ExecutionError::Interrupted) => {
            UserFriendlyError::new("The command was interrupted.", None, raw)
        }
        AppError::Execution(_) => UserFriendlyError::new("The command failed.", None, raw),
        AppError::Git(err) => translate_git_output(&err.to_string())
            .unwrap_or_else(|| UserFriendlyError::new("Could not read the repository.", None, raw)),
        AppError::Config(_) => UserFriendlyError::new(
            "Configuration error.",
            Some("Check your config file at ~/.config/gitsay/config.toml"),
            raw,
        ),
        AppError::Io(_) => UserFriendlyError::new(
            "I/O error.",
            Some("Check file permissions and disk space."),
            raw,
        ),
    }
}

fn translate_synthesis(err: &SynthesisError, raw: String) -> UserFriendlyError {
    match err {
        SynthesisError::InvalidInput => UserFriendlyError::new(
            "Tell me what you want to do.",
            Some("Example: gitsay undo my last commit but keep the changes"),
            raw,
        ),
        SynthesisError::MalformedResponse(_) => UserFriendlyError::new(
            "The assistant's reply could not be understood, so nothing was run.",
            Some("Try again, or rephrase the request."),
            raw,
        ),
        SynthesisError::Timeout(_) => UserFriendlyError::new(
            "The assistant did not answer in time, so nothing was run.",
            Some("Check your network connection, or raise --timeout."),
            raw,
        ),
        SynthesisError::Rejected { .. } => UserFriendlyError::new(
            "The suggested command was refused for safety, so nothing was run.",
            Some("Ask for one git step at a time."),
            raw,
        ),
        SynthesisError::Service(err) => translate_llm(err, raw),
    }
}

fn translate_llm(err: &LLMError, raw: String) -> UserFriendlyError {
    match err {
        LLMError::MissingApiKey(var) => UserFriendlyError {
            simple_message: "No API key is configured.".to_string(),
            suggestion: Some(format!("Set the {} environment variable.", var)),
            raw_error: raw,
        },
        LLMError::RateLimitExceeded(_) => UserFriendlyError::new(
            "The service is rate limiting requests.",
            Some("Wait a moment and try again."),
            raw,
        ),
        LLMError::Timeout => UserFriendlyError::new(
            "The assistant did not answer in time, so nothing was run.",
            Some("Check your network connection, or raise --timeout."),
            raw,
        ),
        _ => UserFriendlyError::new(
            "Error communicating with the assistant.",
            Some("Check your API key and network connection."),
            raw,
        ),
    }
}
