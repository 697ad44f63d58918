//! Command-line interface

use crate::app::App;
use crate::audit::AuditLogger;
use crate::config::{Config, Provider};
use crate::error::AppResult;
use crate::llm::{self, LLMError};
use crate::ui::console::{Console, Theme};
use clap::{ArgAction, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

/// gitsay: say what you want to do, get the git command that does it
#[derive(Parser, Debug)]
#[command(name = "gitsay")]
#[command(about = "Turn plain-English requests into git commands, with a confirmation before anything runs", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// What you want to do, e.g. "undo my last commit but keep the changes"
    #[arg(trailing_var_arg = true, value_name = "REQUEST")]
    pub request: Vec<String>,

    /// Config file to use instead of ~/.config/gitsay/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Text-generation provider: anthropic or gemini
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Model name for the provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Seconds to wait for the model's reply
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Seconds a git command may run before it is stopped
    #[arg(long, global = true, value_name = "SECS")]
    pub exec_timeout: Option<u64>,

    /// Show the suggestion without offering to run it
    #[arg(long)]
    pub dry_run: bool,

    /// Write the effective configuration (file plus overrides) and exit
    #[arg(long)]
    pub write_config: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// More diagnostics on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Work through merge conflicts with proposed resolutions
    Resolve,
}

impl Cli {
    /// Default tracing filter when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "gitsay=debug",
            _ => "gitsay=trace",
        }
    }

    /// Load the config file and apply command-line overrides
    pub fn load_config(&self) -> AppResult<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if let Some(ref provider) = self.provider {
            config.llm.set_provider(provider.parse::<Provider>()?);
        }
        if let Some(ref model) = self.model {
            config.llm.model = model.clone();
        }
        if let Some(secs) = self.timeout {
            config.llm.timeout_seconds = secs;
        }
        if let Some(secs) = self.exec_timeout {
            config.git.timeout_seconds = secs;
        }

        config.validate()?;
        Ok(config)
    }

    /// Save `config` where it was loaded from, returning the path written
    pub fn save_config(&self, config: &Config) -> AppResult<PathBuf> {
        let path = match self.config {
            Some(ref path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => {
                config.save()?;
                Config::config_path()?
            }
        };
        Ok(path)
    }

    /// Executes the CLI command
    pub async fn execute(self) -> AppResult<()> {
        let config = self.load_config()?;
        debug!(provider = %config.llm.provider, model = %config.llm.model, "Loaded configuration");

        if self.write_config {
            let path = self.save_config(&config)?;
            println!("Configuration written to {}", path.display());
            return Ok(());
        }

        let api_key = config
            .get_api_key()
            .ok_or_else(|| LLMError::MissingApiKey(config.llm.api_key_env.clone()))?;
        let client = llm::build_client(&config.llm, api_key)?;

        let theme = if self.no_color { Theme::plain() } else { Theme::detect() };
        let console = Console::new(io::stdin().lock(), io::stdout(), theme);

        let audit = if config.behavior.log_commands {
            AuditLogger::new()
                .inspect_err(|err| warn!(error = %err, "Audit log unavailable"))
                .ok()
        } else {
            None
        };

        let mut app = App::new(client, &config, std::env::current_dir()?, console)
            .with_audit(audit)
            .with_dry_run(self.dry_run);

        match self.command {
            Some(Commands::Resolve) => {
                app.resolve_conflicts().await?;
            }
            None => {
                let text = if self.request.is_empty() {
                    match app.prompt_for_request()? {
                        Some(text) => text,
                        None => return Ok(()),
                    }
                } else {
                    collect_request(&self.request)
                };
                app.run(&text).await?;
            }
        }

        Ok(())
    }
}

/// Join request words given on the command line into one request
pub fn collect_request(words: &[String]) -> String {
    words.join(" ")
}
