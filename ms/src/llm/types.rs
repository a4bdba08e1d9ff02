//! LLM request/response types for Maestro
//!
//! Provider-agnostic: each client converts these into its own wire format.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (rendered from a Handlebars template)
    pub system_prompt: String,

    /// Conversation so far, oldest first
    pub messages: Vec<Message>,

    /// Tools offered to the model
    pub tools: Vec<ToolDefinition>,

    /// Whether the model may answer in text or must call a tool
    pub tool_choice: ToolChoice,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Plain text request without tools
    pub fn text(system_prompt: impl Into<String>, messages: Vec<Message>, max_tokens: u32) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages,
            tools: vec![],
            tool_choice: ToolChoice::Auto,
            max_tokens,
        }
    }

    /// Request whose answer must be a call to `tool`
    pub fn structured(
        system_prompt: impl Into<String>,
        messages: Vec<Message>,
        tool: ToolDefinition,
        max_tokens: u32,
    ) -> Self {
        debug!(tool = %tool.name, "CompletionRequest::structured: called");
        let tool_choice = ToolChoice::Tool(tool.name.clone());
        Self {
            system_prompt: system_prompt.into(),
            messages,
            tools: vec![tool],
            tool_choice,
            max_tokens,
        }
    }
}

/// Tool selection policy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolChoice {
    /// Model decides between text and any offered tool
    #[default]
    Auto,
    /// Model must call the named tool
    Tool(String),
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Text-only response, mostly for tests and mocks
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: vec![],
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    /// Response consisting of one tool call
    pub fn tool(name: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            content: None,
            tool_calls: vec![ToolCall {
                id: "call_0".to_string(),
                name: name.into(),
                input,
            }],
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage::default(),
        }
    }

    /// First call to the named tool, if any
    pub fn tool_input(&self, name: &str) -> Option<&serde_json::Value> {
        debug!(%name, call_count = self.tool_calls.len(), "CompletionResponse::tool_input: called");
        self.tool_calls.iter().find(|c| c.name == name).map(|c| &c.input)
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    StopSequence,
}

impl StopReason {
    /// Parse from Anthropic API stop_reason string
    pub fn from_anthropic(s: &str) -> Self {
        debug!(%s, "StopReason::from_anthropic: called");
        match s {
            "end_turn" => StopReason::EndTurn,
            "tool_use" => StopReason::ToolUse,
            "max_tokens" => StopReason::MaxTokens,
            "stop_sequence" => StopReason::StopSequence,
            _ => {
                debug!("StopReason::from_anthropic: unknown, defaulting to EndTurn");
                StopReason::EndTurn
            }
        }
    }

    /// Parse from OpenAI finish_reason string
    pub fn from_openai(s: Option<&str>) -> Self {
        match s {
            Some("tool_calls") => StopReason::ToolUse,
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        }
    }

    /// Parse from Gemini finishReason string
    pub fn from_gemini(s: Option<&str>, has_function_call: bool) -> Self {
        if has_function_call {
            return StopReason::ToolUse;
        }
        match s {
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token usage for logging
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Tool definition for the LLM
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: serde_json::Value) -> Self {
        let name = name.into();
        let description = description.into();
        debug!(%name, "ToolDefinition::new: called");
        Self {
            name,
            description,
            input_schema,
        }
    }

    /// Convert to Anthropic API schema format
    pub fn to_anthropic_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.input_schema,
        })
    }

    /// Convert to OpenAI function-tool format
    pub fn to_openai_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.input_schema,
            }
        })
    }

    /// Convert to a Gemini function declaration
    pub fn to_gemini_declaration(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.input_schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_message_assistant() {
        let msg = Message::assistant("Hi there");
        assert_eq!(msg.role, Role::Assistant);
    }

    #[test]
    fn test_structured_request_forces_tool() {
        let tool = ToolDefinition::new("emit", "Emit", serde_json::json!({"type": "object"}));
        let req = CompletionRequest::structured("sys", vec![], tool, 100);
        assert_eq!(req.tool_choice, ToolChoice::Tool("emit".to_string()));
        assert_eq!(req.tools.len(), 1);
    }

    #[test]
    fn test_stop_reason_from_anthropic() {
        assert_eq!(StopReason::from_anthropic("end_turn"), StopReason::EndTurn);
        assert_eq!(StopReason::from_anthropic("tool_use"), StopReason::ToolUse);
        assert_eq!(StopReason::from_anthropic("max_tokens"), StopReason::MaxTokens);
        assert_eq!(StopReason::from_anthropic("unknown"), StopReason::EndTurn);
    }

    #[test]
    fn test_stop_reason_from_gemini() {
        assert_eq!(StopReason::from_gemini(Some("STOP"), true), StopReason::ToolUse);
        assert_eq!(StopReason::from_gemini(Some("MAX_TOKENS"), false), StopReason::MaxTokens);
        assert_eq!(StopReason::from_gemini(None, false), StopReason::EndTurn);
    }

    #[test]
    fn test_tool_definition_schemas() {
        let tool = ToolDefinition::new(
            "summarize",
            "Summarize",
            serde_json::json!({"type": "object", "properties": {"x": {"type": "string"}}}),
        );

        let anthropic = tool.to_anthropic_schema();
        assert_eq!(anthropic["name"], "summarize");
        assert!(anthropic["input_schema"].is_object());

        let openai = tool.to_openai_schema();
        assert_eq!(openai["type"], "function");
        assert_eq!(openai["function"]["name"], "summarize");

        let gemini = tool.to_gemini_declaration();
        assert!(gemini["parameters"]["properties"]["x"].is_object());
    }

    #[test]
    fn test_tool_input_lookup() {
        let resp = CompletionResponse::tool("emit", serde_json::json!({"a": 1}));
        assert_eq!(resp.tool_input("emit").unwrap()["a"], 1);
        assert!(resp.tool_input("other").is_none());
    }
}
