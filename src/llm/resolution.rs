use crate::git::conflicts::ConflictBlock;
use crate::llm::client::{LLMClient, LLMError};
use crate::llm::prompt::{self, BranchInfo};
use crate::llm::response::ReplyError;
use crate::llm::synthesizer::SynthesisError;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    KeepCurrent,
    KeepIncoming,
    KeepBoth,
    Custom,
}

impl ResolutionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionKind::KeepCurrent => "keep current",
            ResolutionKind::KeepIncoming => "keep incoming",
            ResolutionKind::KeepBoth => "keep both",
            ResolutionKind::Custom => "custom merge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
            Confidence::Low => "LOW",
        })
    }
}

/// A proposed resolution for one conflict block
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Resolution {
    #[serde(rename = "suggestion")]
    pub kind: ResolutionKind,
    pub merged_content: String,
    pub explanation: String,
    pub confidence: Confidence,
    pub reasoning: String,
}

/// Parse the JSON reply for a conflict
///
/// The reply must be exactly one JSON object with the five expected keys.
pub fn parse_resolution(text: &str) -> Result<Resolution, ReplyError> {
    serde_json::from_str(text.trim()).map_err(|e| ReplyError::InvalidJson(e.to_string()))
}

/// Asks the text-generation service how to resolve conflict blocks
pub struct ConflictResolver {
    client: Arc<dyn LLMClient>,
    timeout: Duration,
}

impl ConflictResolver {
    pub fn new(client: Arc<dyn LLMClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn resolve(
        &self,
        block: &ConflictBlock,
        branches: &BranchInfo,
    ) -> Result<Resolution, SynthesisError> {
        let user = prompt::conflict_user_prompt(block, branches);

        debug!(
            file = %block.file_path.display(),
            line = block.start_line + 1,
            "Requesting conflict resolution"
        );

        let reply = match tokio::time::timeout(
            self.timeout,
            self.client.complete(prompt::CONFLICT_SYSTEM_PROMPT, &user),
        )
        .await
        {
            Err(_) | Ok(Err(LLMError::Timeout)) => return Err(SynthesisError::Timeout(self.timeout)),
            Ok(Err(err)) => return Err(SynthesisError::Service(err)),
            Ok(Ok(reply)) => reply,
        };

        Ok(parse_resolution(&reply)?)
    }
}
