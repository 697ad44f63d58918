//! The confirmation gate
//!
//! An [`Approval`] can only be produced here, after the user has answered the
//! prompt for one specific [`Suggestion`]. The executor takes an `Approval`,
//! so nothing can run without going through this function first.

use crate::suggestion::Suggestion;
use crate::ui::console::Console;
use crate::ui::preview;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// What the user must type to run a destructive or unrecognised command
pub const CONFIRM_PHRASE: &str = "CONFIRM";

/// Proof that the user approved exactly this suggestion
///
/// Executing consumes it, so one confirmation runs one command:
///
/// ```compile_fail
/// use gitsay::git::CommandExecutor;
/// use gitsay::ui::confirm::Approval;
///
/// async fn run_twice(executor: &CommandExecutor, approval: Approval<'_>) {
///     let _ = executor.execute(approval).await;
///     let _ = executor.execute(approval).await;
/// }
/// ```
#[derive(Debug)]
pub struct Approval<'a> {
    suggestion: &'a Suggestion,
}

impl<'a> Approval<'a> {
    fn new(suggestion: &'a Suggestion) -> Self {
        Self { suggestion }
    }

    pub fn suggestion(&self) -> &'a Suggestion {
        self.suggestion
    }

    #[cfg(test)]
    pub(crate) fn for_test(suggestion: &'a Suggestion) -> Self {
        Self::new(suggestion)
    }
}

#[derive(Debug)]
pub enum Decision<'a> {
    Approved(Approval<'a>),
    Declined,
}

impl<'a> Decision<'a> {
    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved(_))
    }

    pub fn approval(self) -> Option<Approval<'a>> {
        match self {
            Decision::Approved(approval) => Some(approval),
            Decision::Declined => None,
        }
    }
}

/// Show a suggestion and ask whether to run it
///
/// Safe commands take `y`/`yes` and default to no. Destructive and
/// unrecognised commands show a warning and only accept [`CONFIRM_PHRASE`]
/// typed exactly; a plain `y` declines them. End of input always declines.
pub fn confirm<'a, R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    suggestion: &'a Suggestion,
) -> io::Result<Decision<'a>> {
    let theme = console.theme();
    preview::render_suggestion(console.out(), theme, suggestion)?;
    preview::render_risk_warning(console.out(), theme, suggestion)?;

    let approved = if suggestion.risk().requires_strong_confirmation() {
        let prompt = format!("Type {} to run this command, anything else cancels: ", CONFIRM_PHRASE);
        console
            .ask(&prompt)?
            .is_some_and(|answer| answer == CONFIRM_PHRASE)
    } else {
        console
            .ask("Execute this command? [y/N] ")?
            .is_some_and(|answer| is_yes(&answer))
    };

    debug!(risk = %suggestion.risk(), approved, "Confirmation answered");

    if approved {
        Ok(Decision::Approved(Approval::new(suggestion)))
    } else {
        Ok(Decision::Declined)
    }
}

fn is_yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
