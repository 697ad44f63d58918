pub mod anthropic;
pub mod client;
pub mod context;
pub mod gemini;
pub mod prompt;
pub mod resolution;
pub mod response;
pub mod synthesizer;

pub use anthropic::AnthropicClient;
pub use client::{LLMClient, LLMError};
pub use context::RepoContext;
pub use gemini::GeminiClient;
pub use resolution::{ConflictResolver, Resolution};
pub use synthesizer::{SynthesisError, Synthesizer};

use crate::config::settings::{LLMConfig, Provider};
use std::sync::Arc;

/// Build the client for the configured provider
pub fn build_client(config: &LLMConfig, api_key: String) -> Result<Arc<dyn LLMClient>, LLMError> {
    let timeout = config.timeout();

    let client: Arc<dyn LLMClient> = match config.provider {
        Provider::Anthropic => {
            let mut client = AnthropicClient::with_model(api_key, config.model.clone(), timeout)?
                .with_max_tokens(config.max_tokens);
            if let Some(ref base_url) = config.base_url {
                client = client.with_base_url(base_url.clone());
            }
            Arc::new(client)
        }
        Provider::Gemini => {
            let mut client = GeminiClient::new(api_key, config.model.clone(), timeout)?
                .with_max_tokens(config.max_tokens);
            if let Some(ref base_url) = config.base_url {
                client = client.with_base_url(base_url.clone());
            }
            Arc::new(client)
        }
    };

    Ok(client)
}
