use crate::llm::client::{LLMClient, LLMError};
use crate::llm::context::RepoContext;
use crate::llm::prompt;
use crate::llm::response::{self, ReplyError};
use crate::security::{CommandGuard, ValidationError};
use crate::suggestion::{Request, Suggestion};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Request is empty")]
    InvalidInput,

    #[error("The model's reply could not be understood: {0}")]
    MalformedResponse(#[from] ReplyError),

    #[error("No reply within {0:?}")]
    Timeout(Duration),

    #[error("Refusing to run '{command}': {reason}")]
    Rejected {
        command: String,
        reason: ValidationError,
    },

    #[error("{0}")]
    Service(LLMError),
}

/// Turns a natural-language request into a checked, classified [`Suggestion`]
///
/// Synthesis has no side effects beyond the API call: nothing is executed
/// or logged to the audit trail here.
pub struct Synthesizer {
    client: Arc<dyn LLMClient>,
    guard: CommandGuard,
    context: RepoContext,
    timeout: Duration,
}

impl Synthesizer {
    pub fn new(client: Arc<dyn LLMClient>, context: RepoContext, timeout: Duration) -> Self {
        Self {
            client,
            guard: CommandGuard::new(),
            context,
            timeout,
        }
    }

    pub async fn synthesize(&self, text: &str) -> Result<Suggestion, SynthesisError> {
        let request = Request::new(text)?;

        let system = prompt::command_system_prompt(&self.context);
        let user = prompt::command_user_prompt(request.as_str());

        debug!(
            provider = self.client.provider(),
            request_len = request.as_str().len(),
            "Requesting command suggestion"
        );

        let reply = match tokio::time::timeout(self.timeout, self.client.complete(&system, &user)).await {
            Err(_) | Ok(Err(LLMError::Timeout)) => {
                warn!(timeout = ?self.timeout, "Suggestion request timed out");
                return Err(SynthesisError::Timeout(self.timeout));
            }
            Ok(Err(err)) => return Err(SynthesisError::Service(err)),
            Ok(Ok(reply)) => reply,
        };

        debug!(reply_len = reply.len(), "Received reply");

        let parsed = response::parse_reply(&reply)?;
        let command = response::tokenize(&parsed.command)?;

        let assessment = self
            .guard
            .check(&command)
            .map_err(|reason| SynthesisError::Rejected {
                command: parsed.command.clone(),
                reason,
            })?;

        info!(risk = %assessment.level, subcommand = %assessment.subcommand, "Suggestion ready");

        Ok(Suggestion::new(request, command, parsed.explanation, assessment)
            .with_notes(parsed.warning, parsed.next_step))
    }
}
