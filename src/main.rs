use std::process;

use clap::Parser;
use gitsay::cli::Cli;
use gitsay::error_translation::translate_app_error;
use gitsay::git::ExecutionError;
use gitsay::AppError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr so they never mix with git's output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_filter())),
        )
        .init();

    if let Err(e) = cli.execute().await {
        // The failed command's output and hint were already shown
        if !matches!(e, AppError::Execution(ExecutionError::NonZeroExit(_))) {
            let friendly = translate_app_error(&e);
            eprintln!("Error: {}", friendly.simple_message);
            eprintln!("  {}", friendly.raw_error);
            if let Some(suggestion) = friendly.suggestion {
                eprintln!("Hint: {}", suggestion);
            }
        }

        process::exit(e.exit_code());
    }
}
