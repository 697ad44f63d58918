use crate::git::conflicts::ConflictBlock;
use crate::llm::context::RepoContext;
use std::path::Path;

/// System instruction for turning a request into one labeled git command
pub fn command_system_prompt(context: &RepoContext) -> String {
    format!(
        r#"You translate plain-English requests into a single git command for people who are new to git.

CURRENT CONTEXT:
{context}
RULES:
1. Reply with exactly these lines and nothing else. No markdown, no code fences, no other text.
   COMMAND: <one git command>
   EXPLANATION: <one short, beginner-friendly sentence>
   WARNING: <ambiguity or danger warning, or none>
   NEXT: <what the user would usually do next, or none>
2. COMMAND must start with `git`. Use exactly one git command: no `&&`, `;`, pipes, redirects, `cd`, `mkdir`, or other programs.
3. Quote arguments containing spaces with single or double quotes. Never rely on variables or command substitution.
4. Never use `-c`, `-C`, `--git-dir`, `--work-tree`, `--exec`, or options that run other programs.
5. Prefer non-destructive commands. If a destructive command is the only way, say so in WARNING starting with "DANGER:".
6. If the request is vague, pick the most likely meaning and explain the assumption in WARNING.
7. Map beginner wording: "start a project" is `git init`, "prepare files" is `git add`, "save my changes" is `git commit`, "upload my work" is `git push`, "get the latest" is `git pull`.

EXAMPLE
Request: undo my last commit but keep the changes
COMMAND: git reset --soft HEAD~1
EXPLANATION: Moves your branch back one commit and keeps those changes staged.
WARNING: none
NEXT: Edit your files if needed, then commit again with git commit -m "your message".

EXAMPLE
Request: save my work with message fixed login bug
COMMAND: git commit -am "fixed login bug"
EXPLANATION: Stages all tracked changes and saves them as a new commit.
WARNING: New files that were never added are not included.
NEXT: Send the commit to the remote with git push.
"#,
        context = context.render()
    )
}

/// User turn carrying the request text verbatim
pub fn command_user_prompt(request: &str) -> String {
    format!("Request: {}", request)
}

/// Branch names shown in the conflict prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub current: String,
    pub incoming: String,
}

impl Default for BranchInfo {
    fn default() -> Self {
        Self {
            current: "current".to_string(),
            incoming: "incoming".to_string(),
        }
    }
}

pub const CONFLICT_SYSTEM_PROMPT: &str = r#"You are an expert git merge conflict resolver. Analyze the conflict you are given and propose the best resolution.

Reply with a single JSON object and nothing else, with exactly these keys:
- "suggestion": one of "keep_current", "keep_incoming", "keep_both", "custom"
- "merged_content": the resolved code, without conflict markers
- "explanation": a brief explanation, 2-3 sentences
- "confidence": one of "HIGH", "MEDIUM", "LOW"
- "reasoning": why this resolution, 3-4 sentences

Guidelines:
1. If one side adds new code and the other is unchanged, keep the addition.
2. If both sides made different changes, merge them carefully.
3. For configuration, feature branches usually point at staging or dev, main at production.
4. For version numbers, keep the higher version.
5. For imports, keep both unless they directly conflict.
6. If the right answer is unclear, set confidence to LOW.

Example:
{"suggestion": "keep_incoming", "merged_content": "const API_URL = 'https://api-staging.example.com';", "explanation": "Current uses production, incoming uses staging.", "confidence": "HIGH", "reasoning": "Feature branches use staging for testing. Keeping the staging URL allows proper testing before the production merge."}"#;

/// User turn describing one conflict block
pub fn conflict_user_prompt(block: &ConflictBlock, branches: &BranchInfo) -> String {
    let path = block.file_path.display();
    format!(
        "FILE: {path} ({kind})\nCURRENT BRANCH: {current}\nINCOMING BRANCH: {incoming}\n\n\
         CONTEXT BEFORE CONFLICT:\n{before}\n\
         CONFLICT:\n<<<<<<< {current} (YOUR VERSION)\n{ours}=======\n{theirs}>>>>>>> {incoming} (THEIR VERSION)\n\n\
         CONTEXT AFTER CONFLICT:\n{after}",
        kind = file_kind(&block.file_path),
        current = branches.current,
        incoming = branches.incoming,
        before = block.context_before,
        ours = block.current,
        theirs = block.incoming,
        after = block.context_after,
    )
}

fn file_kind(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "rs" => "Rust source code",
        "py" => "Python source code",
        "js" | "jsx" | "mjs" => "JavaScript source code",
        "ts" | "tsx" => "TypeScript source code",
        "java" => "Java source code",
        "go" => "Go source code",
        "json" => "JSON configuration",
        "yml" | "yaml" => "YAML configuration",
        "toml" => "TOML configuration",
        "md" => "Markdown document",
        _ => "source code file",
    }
}
