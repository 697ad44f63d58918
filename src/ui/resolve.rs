use crate::git::conflicts::ConflictBlock;
use crate::llm::prompt::BranchInfo;
use crate::llm::resolution::{Confidence, Resolution};
use crate::ui::console::{Console, Theme};
use crossterm::style::Color;
use std::io::{self, BufRead, Write};

/// What to do with one conflict block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Use the proposed merged content
    Accept,
    KeepCurrent,
    KeepIncoming,
    Skip,
    /// Stop without writing the current file
    Cancel,
}

impl ConflictChoice {
    fn parse(answer: &str) -> Option<Self> {
        match answer.to_ascii_lowercase().as_str() {
            "a" | "accept" => Some(ConflictChoice::Accept),
            "o" | "ours" => Some(ConflictChoice::KeepCurrent),
            "t" | "theirs" => Some(ConflictChoice::KeepIncoming),
            "s" | "skip" => Some(ConflictChoice::Skip),
            "c" | "cancel" | "q" => Some(ConflictChoice::Cancel),
            _ => None,
        }
    }

    /// Replacement text for the block, `None` when the block is left as is
    pub fn replacement(self, block: &ConflictBlock, resolution: Option<&Resolution>) -> Option<String> {
        match self {
            ConflictChoice::Accept => resolution.map(|r| r.merged_content.clone()),
            ConflictChoice::KeepCurrent => Some(block.current.clone()),
            ConflictChoice::KeepIncoming => Some(block.incoming.clone()),
            ConflictChoice::Skip | ConflictChoice::Cancel => None,
        }
    }
}

pub fn render_conflict<W: Write>(
    out: &mut W,
    theme: Theme,
    block: &ConflictBlock,
    index: usize,
    total: usize,
    branches: &BranchInfo,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        theme.strong(
            &format!(
                "Conflict {}/{} in {} (line {})",
                index,
                total,
                block.file_path.display(),
                block.start_line + 1
            ),
            Color::Cyan
        )
    )?;
    writeln!(out, "{}", theme.paint(&format!("--- {} (yours)", branches.current), Color::Green))?;
    write!(out, "{}", block.current)?;
    writeln!(out, "{}", theme.paint(&format!("--- {} (theirs)", branches.incoming), Color::Magenta))?;
    write!(out, "{}", block.incoming)
}

pub fn render_resolution<W: Write>(out: &mut W, theme: Theme, resolution: &Resolution) -> io::Result<()> {
    let confidence_color = match resolution.confidence {
        Confidence::High => Color::Green,
        Confidence::Medium => Color::Yellow,
        Confidence::Low => Color::Red,
    };

    writeln!(
        out,
        "{} {} ({} confidence)",
        theme.strong("Proposal:", Color::Cyan),
        resolution.kind.as_str(),
        theme.paint(&resolution.confidence.to_string(), confidence_color)
    )?;
    writeln!(out, "{}", resolution.merged_content.trim_end())?;
    writeln!(out, "{} {}", theme.paint("Why:", Color::DarkGrey), resolution.explanation)?;
    writeln!(out, "{}", theme.paint(&resolution.reasoning, Color::DarkGrey))
}

/// Ask what to do with a block, re-asking until the answer is understood
///
/// `[a]ccept` is only offered when there is a proposal. End of input cancels.
pub fn choose<R: BufRead, W: Write>(console: &mut Console<R, W>, has_proposal: bool) -> io::Result<ConflictChoice> {
    let prompt = if has_proposal {
        "[a]ccept, keep [o]urs, keep [t]heirs, [s]kip, [c]ancel: "
    } else {
        "keep [o]urs, keep [t]heirs, [s]kip, [c]ancel: "
    };

    loop {
        let Some(answer) = console.ask(prompt)? else {
            return Ok(ConflictChoice::Cancel);
        };

        match ConflictChoice::parse(&answer) {
            Some(ConflictChoice::Accept) if !has_proposal => {}
            Some(choice) => return Ok(choice),
            None => {}
        }
        writeln!(console.out(), "Please answer with one of the listed letters.")?;
    }
}
