use crate::error_translation::UserFriendlyError;
use crate::git::executor::ExecutionResult;
use crate::suggestion::{RiskLevel, Suggestion};
use crate::ui::console::Theme;
use crossterm::style::Color;
use std::io::{self, Write};

/// Print the proposed command, its explanation and any ambiguity warning
pub fn render_suggestion<W: Write>(out: &mut W, theme: Theme, suggestion: &Suggestion) -> io::Result<()> {
    if let Some(warning) = suggestion.warning() {
        writeln!(out, "{} {}", theme.strong("Warning:", Color::Yellow), warning)?;
    }

    writeln!(out, "{}", theme.strong("Proposed command", Color::Cyan))?;
    writeln!(out, "  {}", theme.paint(&suggestion.command_line(), Color::Green))?;
    writeln!(out, "{} {}", theme.paint("Explanation:", Color::DarkGrey), suggestion.explanation())?;

    Ok(())
}

/// The extra warning shown before a destructive or unrecognised command
pub fn render_risk_warning<W: Write>(out: &mut W, theme: Theme, suggestion: &Suggestion) -> io::Result<()> {
    match suggestion.risk() {
        RiskLevel::Safe => Ok(()),
        RiskLevel::Destructive => {
            let reason = suggestion
                .danger()
                .map(|op| op.description())
                .unwrap_or("This command can destroy work or rewrite history");
            writeln!(out)?;
            writeln!(out, "{}", theme.strong("DANGER: destructive command", Color::Red))?;
            writeln!(out, "  {}", theme.paint(reason, Color::Red))?;
            writeln!(out, "  This may not be undoable.")
        }
        RiskLevel::Unknown => {
            writeln!(out)?;
            writeln!(out, "{}", theme.strong("CAUTION: unrecognised git subcommand", Color::Yellow))?;
            writeln!(out, "  Its effects could not be checked. Review it carefully.")
        }
    }
}

/// Summarise a finished command
///
/// When output was echoed live it is not printed a second time.
pub fn render_result<W: Write>(
    out: &mut W,
    theme: Theme,
    result: &ExecutionResult,
    echoed: bool,
) -> io::Result<()> {
    if !echoed {
        if !result.stdout.is_empty() {
            write!(out, "{}", result.stdout)?;
        }
        if !result.stderr.is_empty() {
            write!(out, "{}", theme.paint(&result.stderr, Color::DarkGrey))?;
        }
    }

    if result.success() {
        writeln!(out, "{}", theme.strong("Command succeeded.", Color::Green))
    } else {
        writeln!(
            out,
            "{}",
            theme.strong(&format!("Command failed with exit code {}.", result.exit_code), Color::Red)
        )
    }
}

pub fn render_next_step<W: Write>(out: &mut W, theme: Theme, next_step: &str) -> io::Result<()> {
    writeln!(out, "{} {}", theme.strong("What's next?", Color::Blue), next_step)
}

pub fn render_hint<W: Write>(out: &mut W, theme: Theme, error: &UserFriendlyError) -> io::Result<()> {
    writeln!(out, "{}", theme.paint(&error.simple_message, Color::Yellow))?;
    if let Some(ref suggestion) = error.suggestion {
        writeln!(out, "{} {}", theme.paint("Hint:", Color::Cyan), suggestion)?;
    }
    Ok(())
}
