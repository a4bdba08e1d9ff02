//! LLM Client module for Maestro
//!
//! Provider clients behind one stateless completion trait, plus helpers to
//! pull JSON out of answers that ignored the requested tool.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod gemini;
mod http;
mod openai;
mod parse;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use parse::{extract_first_json_object, strip_fences};
pub use types::{
    CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage, ToolCall, ToolChoice, ToolDefinition,
};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports "gemini", "anthropic" and "openai" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        "anthropic" => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_config(config)?))
        }
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::Config(format!(
                "Unknown LLM provider: '{}'. Supported: gemini, anthropic, openai",
                other
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_unknown_provider() {
        let mut config = LlmConfig::default().with_api_key("k");
        config.provider = "mistral".to_string();
        let err = create_client(&config).err().unwrap();
        assert!(err.to_string().contains("mistral"));
    }

    #[test]
    fn test_create_client_known_providers() {
        for provider in ["gemini", "anthropic", "openai"] {
            let mut config = LlmConfig::default().with_api_key("k");
            config.provider = provider.to_string();
            assert!(create_client(&config).is_ok(), "{}", provider);
        }
    }
}
