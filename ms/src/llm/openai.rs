//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for OpenAI's Chat Completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::http::{build_http, post_json};
use super::{
    CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, Role, StopReason, TokenUsage, ToolCall,
    ToolChoice,
};
use crate::config::LlmConfig;

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl OpenAIClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "from_config: called");
        let api_key = config.get_api_key().map_err(|e| LlmError::Config(e.to_string()))?;
        let http = build_http(Duration::from_millis(config.timeout_ms))?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the OpenAI API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];
        messages.extend(convert_messages(&request.messages));

        let max_tokens = request.max_tokens.min(self.max_tokens);

        // GPT-5.x and o1/o3 models use max_completion_tokens instead of max_tokens
        let uses_completion_tokens =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        if uses_completion_tokens {
            body["max_completion_tokens"] = serde_json::json!(max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(request.tools.iter().map(|t| t.to_openai_schema()).collect::<Vec<_>>());
            body["tool_choice"] = match &request.tool_choice {
                ToolChoice::Auto => serde_json::json!("auto"),
                ToolChoice::Tool(name) => serde_json::json!({"type": "function", "function": {"name": name}}),
            };
        }

        body
    }

    /// Parse the OpenAI API response
    fn parse_response(&self, api_response: OpenAIResponse) -> Result<CompletionResponse, LlmError> {
        debug!(choice_count = api_response.choices.len(), "parse_response: called");
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::EmptyCompletion { provider: "OpenAI" })?;

        let mut tool_calls = Vec::new();
        for tc in choice.message.tool_calls.unwrap_or_default() {
            let input = serde_json::from_str(&tc.function.arguments)?;
            tool_calls.push(ToolCall {
                id: tc.id,
                name: tc.function.name,
                input,
            });
        }

        Ok(CompletionResponse {
            content: choice.message.content,
            tool_calls,
            stop_reason: StopReason::from_openai(choice.finish_reason.as_deref()),
            usage: TokenUsage {
                input_tokens: api_response.usage.prompt_tokens,
                output_tokens: api_response.usage.completion_tokens,
            },
        })
    }
}

/// Convert internal Message types to OpenAI API format
fn convert_messages(messages: &[Message]) -> Vec<serde_json::Value> {
    messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            serde_json::json!({
                "role": role,
                "content": msg.content,
            })
        })
        .collect()
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);
        let headers = [("Authorization", format!("Bearer {}", self.api_key))];

        let api_response: OpenAIResponse = post_json(&self.http, &url, &headers, &body).await?;
        self.parse_response(api_response)
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: OpenAIUsage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIToolCall {
    id: String,
    function: OpenAIFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ToolDefinition;

    fn client(model: &str) -> OpenAIClient {
        let mut config = LlmConfig::default().with_api_key("test-key");
        config.provider = "openai".to_string();
        config.model = model.to_string();
        config.base_url = "https://api.openai.com".to_string();
        OpenAIClient::from_config(&config).unwrap()
    }

    #[test]
    fn test_body_prepends_system_message() {
        let req = CompletionRequest::text("be brief", vec![Message::user("hi")], 50);
        let body = client("gpt-4o").build_request_body(&req);

        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 50);
    }

    #[test]
    fn test_body_uses_completion_tokens_for_new_models() {
        let req = CompletionRequest::text("s", vec![], 50);
        let body = client("gpt-5-mini").build_request_body(&req);
        assert_eq!(body["max_completion_tokens"], 50);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_body_forces_function() {
        let tool = ToolDefinition::new("emit_menu", "Emit", serde_json::json!({"type": "object"}));
        let req = CompletionRequest::structured("s", vec![], tool, 50);
        let body = client("gpt-4o").build_request_body(&req);
        assert_eq!(body["tool_choice"]["function"]["name"], "emit_menu");
    }

    #[test]
    fn test_parse_response_decodes_arguments() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{"id": "c1", "type": "function", "function": {"name": "emit", "arguments": "{\"k\": [1,2]}"}}]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 3, "completion_tokens": 4}
        }"#;
        let api: OpenAIResponse = serde_json::from_str(raw).unwrap();
        let resp = client("gpt-4o").parse_response(api).unwrap();
        assert_eq!(resp.tool_calls[0].input["k"][1], 2);
        assert_eq!(resp.stop_reason, StopReason::ToolUse);
    }

    #[test]
    fn test_parse_response_without_choices_is_error() {
        let api: OpenAIResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            client("gpt-4o").parse_response(api),
            Err(LlmError::EmptyCompletion { provider: "OpenAI" })
        ));
    }
}
