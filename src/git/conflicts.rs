use std::path::{Path, PathBuf};

const CONTEXT_LINES: usize = 5;

/// One `<<<<<<<` ... `>>>>>>>` region of a conflicted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictBlock {
    pub file_path: PathBuf,
    /// Zero-based line of the `<<<<<<<` marker
    pub start_line: usize,
    /// Zero-based line of the `>>>>>>>` marker
    pub end_line: usize,
    /// Our side (the checked-out branch)
    pub current: String,
    /// Their side (the branch being merged in)
    pub incoming: String,
    pub context_before: String,
    pub context_after: String,
}

/// Find every complete conflict block in a file's content
///
/// diff3-style base sections (`|||||||`) are skipped. A block without a
/// closing marker is ignored rather than guessed at.
pub fn parse_conflicts(file_path: &Path, content: &str) -> Vec<ConflictBlock> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !lines[i].starts_with("<<<<<<<") {
            i += 1;
            continue;
        }

        let start = i;
        let mut current = String::new();
        let mut incoming = String::new();
        let mut in_base = false;
        let mut in_incoming = false;
        let mut end = None;

        i += 1;
        while i < lines.len() {
            let line = lines[i];
            if line.starts_with(">>>>>>>") && in_incoming {
                end = Some(i);
                break;
            } else if line.starts_with("=======") && !in_incoming {
                in_incoming = true;
                in_base = false;
            } else if line.starts_with("|||||||") && !in_incoming {
                in_base = true;
            } else if line.starts_with("<<<<<<<") {
                // A new block started before this one closed
                break;
            } else if in_incoming {
                incoming.push_str(line);
            } else if !in_base {
                current.push_str(line);
            }
            i += 1;
        }

        let Some(end) = end else {
            continue;
        };

        blocks.push(ConflictBlock {
            file_path: file_path.to_path_buf(),
            start_line: start,
            end_line: end,
            current,
            incoming,
            context_before: lines[start.saturating_sub(CONTEXT_LINES)..start].concat(),
            context_after: lines[end + 1..(end + 1 + CONTEXT_LINES).min(lines.len())].concat(),
        });
        i = end + 1;
    }

    blocks
}

/// Replace conflict blocks with the chosen content
///
/// Replacements are applied from the bottom of the file up so the line
/// numbers recorded for earlier blocks stay valid.
pub fn apply_resolutions(content: &str, resolutions: &[(&ConflictBlock, String)]) -> String {
    let mut lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();

    let mut ordered: Vec<&(&ConflictBlock, String)> = resolutions.iter().collect();
    ordered.sort_by(|a, b| b.0.start_line.cmp(&a.0.start_line));

    for (block, replacement) in ordered {
        if block.end_line >= lines.len() || block.start_line > block.end_line {
            continue;
        }

        let mut replacement = replacement.clone();
        if !replacement.is_empty() && !replacement.ends_with('\n') {
            replacement.push('\n');
        }

        let new_lines: Vec<String> = replacement.split_inclusive('\n').map(str::to_string).collect();
        lines.splice(block.start_line..=block.end_line, new_lines);
    }

    lines.concat()
}
