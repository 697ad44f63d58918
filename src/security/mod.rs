pub mod guard;

pub use guard::{CommandGuard, DangerousOp, RiskAssessment, ValidationError};

/// Git subcommands the guard recognises
///
/// A command whose subcommand is missing from this list is not rejected, but
/// it is classified `unknown` and goes through the typed confirmation.
pub const KNOWN_GIT_SUBCOMMANDS: &[&str] = &[
    // Read operations
    "status",
    "log",
    "show",
    "diff",
    "branch",
    "tag",
    "remote",
    "reflog",
    "blame",
    "describe",
    "shortlog",
    "grep",
    "ls-files",
    "rev-parse",
    // Write operations
    "init",
    "add",
    "mv",
    "rm",
    "commit",
    "checkout",
    "switch",
    "restore",
    "reset",
    "revert",
    "merge",
    "rebase",
    "cherry-pick",
    "stash",
    "clean",
    // Remote operations
    "push",
    "pull",
    "fetch",
    "clone",
    // Configuration (repo-level only)
    "config",
    // History rewriting and ref plumbing
    "filter-branch",
    "update-ref",
    "gc",
];

/// Tokens that make a command destructive
///
/// Matched case-insensitively against whole tokens, after dropping any
/// `=value` suffix and splitting combined short flags (`-fd` is `-f -d`).
pub const DESTRUCTIVE_TOKENS: &[&str] = &[
    // Force operations
    "--force",
    "-f",
    "--force-with-lease",
    "--mirror",
    // History rewrite
    "--hard",
    "--amend",
    "rebase",
    "filter-branch",
    "filter-repo",
    // Ref deletion
    "-d",
    "--delete",
    "--prune",
    "prune",
    "update-ref",
    // Working tree and stash deletion
    "clean",
    "rm",
    "remove",
    "restore",
    "drop",
    "clear",
];
