//! One invocation of the tool: request in, at most one command out
//!
//! `collect request -> synthesize -> classify -> confirm -> (execute | abort)`

use crate::audit::AuditLogger;
use crate::config::{BehaviorConfig, Config};
use crate::error::{AppResult, GitError};
use crate::error_translation::translate_git_output;
use crate::git::conflicts::{apply_resolutions, parse_conflicts, ConflictBlock};
use crate::git::executor::{CommandExecutor, ExecutionError, ExecutionResult};
use crate::git::repository::Repository;
use crate::llm::client::LLMClient;
use crate::llm::context::{RepoContext, DEFAULT_TOKEN_BUDGET};
use crate::llm::prompt::BranchInfo;
use crate::llm::resolution::ConflictResolver;
use crate::llm::synthesizer::{SynthesisError, Synthesizer};
use crate::ui::console::Console;
use crate::ui::resolve::{self, ConflictChoice};
use crate::ui::{confirm, preview};
use crossterm::style::Color;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// How a request ended when nothing went wrong
#[derive(Debug)]
pub enum Outcome {
    Executed(ExecutionResult),
    Declined,
    /// The suggestion was shown but not offered for execution
    DryRun,
}

/// Counts reported at the end of conflict resolution
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveSummary {
    pub files: usize,
    pub total: usize,
    pub resolved: usize,
    pub cancelled: bool,
}

pub struct App<R, W> {
    synthesizer: Synthesizer,
    resolver: ConflictResolver,
    executor: CommandExecutor,
    repo: Option<Repository>,
    console: Console<R, W>,
    audit: Option<AuditLogger>,
    behavior: BehaviorConfig,
    dry_run: bool,
}

impl<R: BufRead, W: Write> App<R, W> {
    /// Wire up an invocation working in `working_dir`
    ///
    /// Repository context is gathered once, here. Outside a repository the
    /// tool still works; the prompt just says there is no repository.
    pub fn new(
        client: Arc<dyn LLMClient>,
        config: &Config,
        working_dir: PathBuf,
        console: Console<R, W>,
    ) -> Self {
        let repo = Repository::discover_from(&working_dir).ok();
        let context = RepoContext::gather(repo.as_ref(), DEFAULT_TOKEN_BUDGET);

        Self {
            synthesizer: Synthesizer::new(client.clone(), context, config.llm.timeout()),
            resolver: ConflictResolver::new(client, config.llm.timeout()),
            executor: CommandExecutor::new(working_dir, config.git.timeout())
                .with_echo(config.behavior.stream_output),
            repo,
            console,
            audit: None,
            behavior: config.behavior.clone(),
            dry_run: false,
        }
    }

    pub fn with_audit(mut self, audit: Option<AuditLogger>) -> Self {
        self.audit = audit.filter(|_| self.behavior.log_commands);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn repository(&self) -> Option<&Repository> {
        self.repo.as_ref()
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Ask for a request on the console when none was given on the command line
    ///
    /// Pending merge conflicts are pointed out first.
    pub fn prompt_for_request(&mut self) -> AppResult<Option<String>> {
        let theme = self.console.theme();

        if let Some(repo) = self.repo.as_ref() {
            let conflicted = repo.conflicted_files().unwrap_or_default();
            if !conflicted.is_empty() {
                let out = self.console.out();
                writeln!(out, "{}", theme.strong("Merge conflicts detected:", Color::Yellow))?;
                for file in &conflicted {
                    writeln!(out, "  {}", file.display())?;
                }
                writeln!(out, "Run 'gitsay resolve' to work through them.")?;
            }
        }

        Ok(self.console.ask("What do you want to do? ")?)
    }

    /// Handle one natural-language request
    pub async fn run(&mut self, text: &str) -> AppResult<Outcome> {
        let suggestion = match self.synthesizer.synthesize(text).await {
            Ok(suggestion) => suggestion,
            Err(err) => {
                if let SynthesisError::Rejected { ref command, ref reason } = err {
                    self.audit(|log, repo| log.log_rejection(text, command, &reason.to_string(), repo));
                }
                return Err(err.into());
            }
        };

        let theme = self.console.theme();

        if self.dry_run {
            preview::render_suggestion(self.console.out(), theme, &suggestion)?;
            preview::render_risk_warning(self.console.out(), theme, &suggestion)?;
            return Ok(Outcome::DryRun);
        }

        let Some(approval) = confirm::confirm(&mut self.console, &suggestion)?.approval() else {
            writeln!(self.console.out(), "{}", theme.paint("Cancelled. Nothing was run.", Color::Yellow))?;
            self.audit(|log, repo| log.log_declined(&suggestion, repo));
            return Ok(Outcome::Declined);
        };

        writeln!(self.console.out())?;
        let result = self.executor.execute(approval).await?;

        self.audit(|log, repo| log.log_execution(&suggestion, repo, result.exit_code));
        info!(exit_code = result.exit_code, duration = ?result.duration, "Command finished");

        preview::render_result(self.console.out(), theme, &result, self.executor.echoes())?;

        if !result.success() {
            if let Some(friendly) = translate_git_output(&result.stderr) {
                preview::render_hint(self.console.out(), theme, &friendly)?;
            }
            return Err(ExecutionError::NonZeroExit(result.exit_code).into());
        }

        if self.behavior.show_next_steps {
            if let Some(next_step) = suggestion.next_step() {
                preview::render_next_step(self.console.out(), theme, next_step)?;
            }
        }

        Ok(Outcome::Executed(result))
    }

    /// Walk through every conflicted file, one block at a time
    pub async fn resolve_conflicts(&mut self) -> AppResult<ResolveSummary> {
        let repo = self.repo.clone().ok_or(GitError::NotARepository)?;
        let theme = self.console.theme();

        let branches = BranchInfo {
            current: repo.current_branch()?.unwrap_or_else(|| "HEAD".to_string()),
            incoming: repo
                .merge_head_name()?
                .unwrap_or_else(|| BranchInfo::default().incoming),
        };

        writeln!(self.console.out(), "Current branch: {}", theme.paint(&branches.current, Color::Cyan))?;
        writeln!(self.console.out(), "Merging from: {}", theme.paint(&branches.incoming, Color::Cyan))?;

        let files = repo.conflicted_files()?;
        let mut summary = ResolveSummary::default();

        if files.is_empty() {
            writeln!(self.console.out(), "{}", theme.paint("No conflicts found.", Color::Green))?;
            return Ok(summary);
        }

        for file in &files {
            let path = repo.path().join(file);
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(file = %file.display(), error = %err, "Could not read conflicted file");
                    writeln!(self.console.out(), "Could not read {}: {}", file.display(), err)?;
                    continue;
                }
            };

            let blocks = parse_conflicts(file, &content);
            if blocks.is_empty() {
                continue;
            }

            summary.files += 1;
            summary.total += blocks.len();

            let Some(chosen) = self.choose_for_file(&blocks, &branches).await? else {
                writeln!(
                    self.console.out(),
                    "{}",
                    theme.paint(&format!("Cancelled. {} was not changed.", file.display()), Color::Yellow)
                )?;
                summary.cancelled = true;
                break;
            };

            if chosen.is_empty() {
                continue;
            }

            fs::write(&path, apply_resolutions(&content, &chosen))?;
            summary.resolved += chosen.len();
            self.audit(|log, repo_path| log.log_resolution(file, chosen.len(), repo_path));
        }

        self.render_summary(&summary)?;
        Ok(summary)
    }

    /// The replacements picked for one file's blocks, `None` if the user cancelled
    async fn choose_for_file<'b>(
        &mut self,
        blocks: &'b [ConflictBlock],
        branches: &BranchInfo,
    ) -> AppResult<Option<Vec<(&'b ConflictBlock, String)>>> {
        let theme = self.console.theme();
        let mut chosen = Vec::new();

        for (idx, block) in blocks.iter().enumerate() {
            resolve::render_conflict(self.console.out(), theme, block, idx + 1, blocks.len(), branches)?;

            let resolution = match self.resolver.resolve(block, branches).await {
                Ok(resolution) => {
                    resolve::render_resolution(self.console.out(), theme, &resolution)?;
                    Some(resolution)
                }
                Err(err) => {
                    warn!(error = %err, "No resolution proposal");
                    writeln!(
                        self.console.out(),
                        "{} {}",
                        theme.paint("No proposal:", Color::Red),
                        err
                    )?;
                    None
                }
            };

            match resolve::choose(&mut self.console, resolution.is_some())? {
                ConflictChoice::Cancel => return Ok(None),
                choice => {
                    if let Some(text) = choice.replacement(block, resolution.as_ref()) {
                        chosen.push((block, text));
                    }
                }
            }
        }

        Ok(Some(chosen))
    }

    fn render_summary(&mut self, summary: &ResolveSummary) -> io::Result<()> {
        let theme = self.console.theme();
        let out = self.console.out();

        writeln!(out)?;
        writeln!(
            out,
            "{}",
            theme.strong(
                &format!("Resolved {}/{} conflicts", summary.resolved, summary.total),
                Color::Green
            )
        )?;

        if summary.resolved > 0 {
            writeln!(out, "Next steps:")?;
            writeln!(out, "  1. Review: git diff")?;
            writeln!(out, "  2. Stage: git add <files>")?;
            writeln!(out, "  3. Commit: git commit")?;
        }

        Ok(())
    }

    /// Write an audit entry; failures are logged and never abort the run
    fn audit<F>(&self, write: F)
    where
        F: FnOnce(&AuditLogger, &Path) -> io::Result<()>,
    {
        let Some(ref log) = self.audit else {
            return;
        };

        let repo_path = self
            .repo
            .as_ref()
            .map(Repository::path)
            .unwrap_or_else(|| self.executor.working_dir());

        if let Err(err) = write(log, repo_path) {
            warn!(error = %err, path = %log.log_path().display(), "Could not write audit log");
        }
    }
}
