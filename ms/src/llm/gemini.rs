//! Google Gemini API client implementation
//!
//! Implements the LlmClient trait for the `generateContent` endpoint.
//! Structured answers come back as `functionCall` parts.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::http::{build_http, post_json};
use super::{
    CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, Role, StopReason, TokenUsage, ToolCall,
    ToolChoice,
};
use crate::config::LlmConfig;

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl GeminiClient {
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

    fn endpoint(&self) -> String {
        let model_path = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        format!("{}/{}:generateContent", self.base_url, model_path)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &CompletionRequest) -> Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");
        let mut body = json!({
            "system_instruction": {
                "parts": [{"text": request.system_prompt}]
            },
            "contents": convert_messages(&request.messages),
            "generationConfig": {
                "maxOutputTokens": request.max_tokens.min(self.max_tokens),
            }
        });

        if !request.tools.is_empty() {
            body["tools"] = json!([{
                "functionDeclarations": request.tools.iter().map(|t| t.to_gemini_declaration()).collect::<Vec<_>>()
            }]);
            body["toolConfig"] = match &request.tool_choice {
                ToolChoice::Auto => json!({"functionCallingConfig": {"mode": "AUTO"}}),
                ToolChoice::Tool(name) => json!({
                    "functionCallingConfig": {
                        "mode": "ANY",
                        "allowedFunctionNames": [name]
                    }
                }),
            };
        }

        body
    }

    /// Parse the Gemini API response
    fn parse_response(&self, api_response: GeminiResponse) -> Result<CompletionResponse, LlmError> {
        debug!(candidate_count = api_response.candidates.len(), "parse_response: called");
        let candidate = api_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::EmptyCompletion { provider: "Gemini" })?;

        let mut texts = Vec::new();
        let mut tool_calls = Vec::new();
        for (idx, part) in candidate.content.parts.into_iter().enumerate() {
            if let Some(text) = part.text {
                texts.push(text);
            }
            if let Some(call) = part.function_call {
                tool_calls.push(ToolCall {
                    id: format!("call_{}", idx),
                    name: call.name,
                    input: call.args.unwrap_or_else(|| json!({})),
                });
            }
        }

        let stop_reason = StopReason::from_gemini(candidate.finish_reason.as_deref(), !tool_calls.is_empty());
        Ok(CompletionResponse {
            content: if texts.is_empty() { None } else { Some(texts.join("")) },
            tool_calls,
            stop_reason,
            usage: TokenUsage {
                input_tokens: api_response.usage_metadata.prompt_token_count,
                output_tokens: api_response.usage_metadata.candidates_token_count,
            },
        })
    }
}

/// Gemini names the assistant role "model"
fn convert_messages(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "model",
            };
            json!({
                "role": role,
                "parts": [{"text": msg.content}],
            })
        })
        .collect()
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = self.endpoint();
        let body = self.build_request_body(&request);
        let headers = [("x-goog-api-key", self.api_key.clone())];

        let api_response: GeminiResponse = post_json(&self.http, &url, &headers, &body).await?;
        self.parse_response(api_response)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: GeminiUsage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ToolDefinition;

    fn client() -> GeminiClient {
        let config = LlmConfig::default().with_api_key("test-key");
        GeminiClient::from_config(&config).unwrap()
    }

    #[test]
    fn test_endpoint_adds_models_prefix() {
        assert_eq!(
            client().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_body_maps_assistant_to_model_role() {
        let req = CompletionRequest::text("sys", vec![Message::user("a"), Message::assistant("b")], 100);
        let body = client().build_request_body(&req);

        assert_eq!(body["system_instruction"]["parts"][0]["text"], "sys");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 100);
        assert!(body.get("toolConfig").is_none());
    }

    #[test]
    fn test_body_forces_function_call() {
        let tool = ToolDefinition::new("summarize", "Summarize", json!({"type": "object"}));
        let req = CompletionRequest::structured("sys", vec![], tool, 100);
        let body = client().build_request_body(&req);

        assert_eq!(body["toolConfig"]["functionCallingConfig"]["mode"], "ANY");
        assert_eq!(body["toolConfig"]["functionCallingConfig"]["allowedFunctionNames"][0], "summarize");
        assert_eq!(body["tools"][0]["functionDeclarations"][0]["name"], "summarize");
    }

    #[test]
    fn test_parse_function_call() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [{"functionCall": {"name": "summarize", "args": {"ingredients": ["gin"]}}}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4}
        }"#;
        let api: GeminiResponse = serde_json::from_str(raw).unwrap();
        let resp = client().parse_response(api).unwrap();

        assert!(resp.content.is_none());
        assert_eq!(resp.tool_input("summarize").unwrap()["ingredients"][0], "gin");
        assert_eq!(resp.stop_reason, StopReason::ToolUse);
        assert_eq!(resp.usage.input_tokens, 10);
    }

    #[test]
    fn test_parse_text_parts_joined() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "Try "}, {"text": "this"}]}}]}"#;
        let api: GeminiResponse = serde_json::from_str(raw).unwrap();
        let resp = client().parse_response(api).unwrap();
        assert_eq!(resp.content.as_deref(), Some("Try this"));
        assert_eq!(resp.stop_reason, StopReason::EndTurn);
    }

    #[test]
    fn test_parse_no_candidates_is_error() {
        let api: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            client().parse_response(api),
            Err(LlmError::EmptyCompletion { provider: "Gemini" })
        ));
    }
}
