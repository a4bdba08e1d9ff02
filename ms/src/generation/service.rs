//! GenerationService over a stateless LLM client
//!
//! Structured answers are requested as forced tool calls. Providers that
//! reply in prose anyway get a second chance: the first JSON object in the
//! text is decoded instead.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{
    ChatReply, ChatSession, GenerationError, GenerationService, MAX_FILTER_OPTIONS, MAX_REFINED_QUESTIONS,
    READY_TO_MATERIALIZE, SessionMode, clean_options, schema,
};
use crate::config::Config;
use crate::domain::{
    ChatMessage, ConversationSummary, MarketReport, MaterializeRequest, MenuMarketReport, MenuProject, Recipe,
};
use crate::i18n::Locale;
use crate::llm::{
    CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, ToolDefinition, create_client,
    extract_first_json_object, strip_fences,
};
use crate::prompts::{PromptContext, PromptLoader, names};

/// Token budget for a chat turn
const CHAT_MAX_TOKENS: u32 = 2048;

/// Token budget for structured documents (capped again by config)
const STRUCTURED_MAX_TOKENS: u32 = 16384;

/// Token budget for short option lists
const OPTIONS_MAX_TOKENS: u32 = 512;

#[derive(Debug, Deserialize)]
struct OptionList {
    #[serde(default)]
    options: Vec<String>,
}

/// Production generation service
pub struct LlmGenerationService {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    locale: Locale,
    default_courses: u32,
}

impl LlmGenerationService {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader, locale: Locale) -> Self {
        debug!(%locale, "LlmGenerationService::new: called");
        Self {
            client,
            prompts,
            locale,
            default_courses: crate::config::MenuConfig::default().default_courses,
        }
    }

    /// Course count used when a request does not carry one
    pub fn with_default_courses(mut self, courses: u32) -> Self {
        self.default_courses = courses.max(1);
        self
    }

    /// Build the client and prompt loader described by `config`
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        debug!("LlmGenerationService::from_config: called");
        let client = create_client(&config.llm)?;
        let prompts = PromptLoader::new(&config.prompts.override_dir);
        Ok(Self::new(client, prompts, config.locale).with_default_courses(config.menu.default_courses))
    }

    fn context(&self) -> PromptContext {
        PromptContext::for_locale(self.locale)
    }

    fn render(&self, template: &str, context: &PromptContext) -> Result<String, GenerationError> {
        self.prompts
            .render(template, context)
            .map_err(|e| GenerationError::Prompt(e.to_string()))
    }

    fn materialize_context(&self, request: &MaterializeRequest) -> PromptContext {
        PromptContext {
            expertise: request.expertise.as_str().to_string(),
            ingredients: request.ingredients.clone(),
            constraints: request.constraints.clone(),
            course_count: Some(request.course_count.unwrap_or(self.default_courses)),
            ..self.context()
        }
    }

    /// One forced-tool call, decoded into `T`
    async fn structured<T: DeserializeOwned>(
        &self,
        system_prompt: String,
        messages: Vec<Message>,
        tool: ToolDefinition,
        max_tokens: u32,
    ) -> Result<T, GenerationError> {
        let tool_name = tool.name.clone();
        debug!(%tool_name, message_count = messages.len(), "structured: called");
        let request = CompletionRequest::structured(system_prompt, messages, tool, max_tokens);
        let response = self.client.complete(request).await?;
        decode(response, &tool_name)
    }
}

/// Decode a structured answer from the tool call, or from JSON in the text
fn decode<T: DeserializeOwned>(response: CompletionResponse, tool_name: &str) -> Result<T, GenerationError> {
    debug!(%tool_name, "decode: called");
    if let Some(input) = response.tool_input(tool_name) {
        return serde_json::from_value(input.clone()).map_err(|e| GenerationError::Schema(e.to_string()));
    }

    let text = response
        .content
        .as_deref()
        .ok_or_else(|| GenerationError::Empty(format!("no `{}` call and no text", tool_name)))?;
    warn!(%tool_name, "decode: tool not called, falling back to JSON in text");
    let stripped = strip_fences(text);
    let fragment = extract_first_json_object(&stripped)
        .ok_or_else(|| GenerationError::Schema(format!("no JSON object in answer for `{}`", tool_name)))?;
    serde_json::from_str(fragment).map_err(|e| GenerationError::Schema(e.to_string()))
}

/// Render the visible transcript as plain text for prompts
fn transcript_text(transcript: &[ChatMessage]) -> String {
    transcript
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl GenerationService for LlmGenerationService {
    async fn start_chat_session(&self, mode: SessionMode) -> Result<ChatSession, GenerationError> {
        debug!(?mode, "start_chat_session: called");
        let (template, context) = match mode {
            SessionMode::Single => (names::CHAT_SINGLE, self.context()),
            SessionMode::Menu => (
                names::CHAT_MENU,
                PromptContext {
                    is_menu: true,
                    course_count: Some(self.default_courses),
                    ..self.context()
                },
            ),
        };
        let system_prompt = self.render(template, &context)?;
        let session = ChatSession::new(mode, system_prompt);
        info!(id = %session.id(), ?mode, "Chat session started");
        Ok(session)
    }

    async fn send_message(&self, session: &mut ChatSession, text: &str) -> Result<ChatReply, GenerationError> {
        debug!(id = %session.id(), text_len = text.len(), "send_message: called");
        let mut messages = session.history().to_vec();
        messages.push(Message::user(text));

        let mut request = CompletionRequest::text(session.system_prompt(), messages, CHAT_MAX_TOKENS);
        request.tools = vec![schema::ready_to_materialize()];
        let response = self.client.complete(request).await?;

        if response.tool_input(schema::READY_TOOL).is_some() {
            debug!("send_message: model called ready_to_materialize");
            session.record_turn(text, READY_TO_MATERIALIZE);
            return Ok(ChatReply::Materialize);
        }

        let reply = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| GenerationError::Empty("chat reply had no text".to_string()))?;
        session.record_turn(text, reply.clone());
        Ok(ChatReply::Text(reply))
    }

    async fn summarize(&self, session: &ChatSession) -> Result<ConversationSummary, GenerationError> {
        debug!(id = %session.id(), "summarize: called");
        let context = PromptContext {
            is_menu: session.mode() == SessionMode::Menu,
            ..self.context()
        };
        let system_prompt = self.render(names::SUMMARIZE, &context)?;

        let mut messages = session.history().to_vec();
        messages.push(Message::user("Summarize our conversation now."));
        let summary: ConversationSummary = self
            .structured(system_prompt, messages, schema::summary(), STRUCTURED_MAX_TOKENS)
            .await?;

        if summary.ingredients.is_empty() {
            return Err(GenerationError::Empty("summary lists no ingredients".to_string()));
        }
        Ok(summary)
    }

    async fn generate_dish(&self, request: &MaterializeRequest) -> Result<Recipe, GenerationError> {
        debug!(ingredients = ?request.ingredients, "generate_dish: called");
        let system_prompt = self.render(names::DISH, &self.materialize_context(request))?;
        let messages = vec![Message::user("Create the recipe.")];
        let recipe: Recipe = self
            .structured(system_prompt, messages, schema::recipe(), STRUCTURED_MAX_TOKENS)
            .await?;
        info!(dish = %recipe.name(), "Dish generated");
        Ok(recipe)
    }

    async fn generate_menu(&self, request: &MaterializeRequest) -> Result<MenuProject, GenerationError> {
        debug!(ingredients = ?request.ingredients, course_count = ?request.course_count, "generate_menu: called");
        let system_prompt = self.render(names::MENU, &self.materialize_context(request))?;
        let messages = vec![Message::user("Create the menu.")];
        let menu: MenuProject = self
            .structured(system_prompt, messages, schema::menu(), STRUCTURED_MAX_TOKENS)
            .await?;
        if menu.courses.is_empty() {
            return Err(GenerationError::Empty("menu has no courses".to_string()));
        }
        info!(title = %menu.concept.title, courses = menu.courses.len(), "Menu generated");
        Ok(menu)
    }

    async fn modify_menu(&self, menu: &MenuProject, instruction: &str) -> Result<MenuProject, GenerationError> {
        debug!(%instruction, "modify_menu: called");
        let context = PromptContext {
            menu_json: serde_json::to_string_pretty(menu).map_err(|e| GenerationError::Schema(e.to_string()))?,
            instruction: instruction.to_string(),
            ..self.context()
        };
        let system_prompt = self.render(names::MODIFY_MENU, &context)?;
        let messages = vec![Message::user(instruction)];
        let updated: MenuProject = self
            .structured(system_prompt, messages, schema::menu(), STRUCTURED_MAX_TOKENS)
            .await?;
        if updated.courses.is_empty() {
            return Err(GenerationError::Empty("modified menu has no courses".to_string()));
        }
        Ok(updated)
    }

    async fn analyze_dish_market(&self, recipe: &Recipe) -> Result<MarketReport, GenerationError> {
        debug!(dish = %recipe.name(), "analyze_dish_market: called");
        let context = PromptContext {
            recipe_json: serde_json::to_string_pretty(recipe).map_err(|e| GenerationError::Schema(e.to_string()))?,
            ..self.context()
        };
        let system_prompt = self.render(names::DISH_MARKET, &context)?;
        let messages = vec![Message::user("Produce the cost report.")];
        self.structured(system_prompt, messages, schema::market_report(), STRUCTURED_MAX_TOKENS)
            .await
    }

    async fn analyze_menu_market(&self, menu: &MenuProject) -> Result<MenuMarketReport, GenerationError> {
        debug!(title = %menu.concept.title, "analyze_menu_market: called");
        let context = PromptContext {
            menu_json: serde_json::to_string_pretty(menu).map_err(|e| GenerationError::Schema(e.to_string()))?,
            ..self.context()
        };
        let system_prompt = self.render(names::MENU_MARKET, &context)?;
        let messages = vec![Message::user("Produce the cost report.")];
        self.structured(system_prompt, messages, schema::menu_market_report(), STRUCTURED_MAX_TOKENS)
            .await
    }

    async fn generate_filter_options(
        &self,
        category_description: &str,
        locale: Locale,
        current_options: &[String],
    ) -> Result<Vec<String>, GenerationError> {
        debug!(%category_description, %locale, "generate_filter_options: called");
        let context = PromptContext {
            category: category_description.to_string(),
            current_options: current_options.to_vec(),
            max_options: MAX_FILTER_OPTIONS,
            ..PromptContext::for_locale(locale)
        };
        let system_prompt = self.render(names::FILTERS, &context)?;
        let messages = vec![Message::user("Suggest the options.")];
        let list: OptionList = self
            .structured(system_prompt, messages, schema::options(), OPTIONS_MAX_TOKENS)
            .await?;
        Ok(clean_options(list.options, MAX_FILTER_OPTIONS))
    }

    async fn generate_refined_questions(
        &self,
        transcript: &[ChatMessage],
        locale: Locale,
    ) -> Result<Vec<String>, GenerationError> {
        debug!(turns = transcript.len(), %locale, "generate_refined_questions: called");
        let context = PromptContext {
            transcript: transcript_text(transcript),
            max_questions: MAX_REFINED_QUESTIONS,
            ..PromptContext::for_locale(locale)
        };
        let system_prompt = self.render(names::QUESTIONS, &context)?;
        let messages = vec![Message::user("Suggest the next answers.")];
        let list: OptionList = self
            .structured(system_prompt, messages, schema::options(), OPTIONS_MAX_TOKENS)
            .await?;
        Ok(clean_options(list.options, MAX_REFINED_QUESTIONS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpertiseLevel;
    use crate::llm::ToolChoice;
    use crate::llm::client::mock::MockLlmClient;
    use serde_json::json;

    fn service(responses: Vec<CompletionResponse>) -> (LlmGenerationService, Arc<MockLlmClient>) {
        let client = Arc::new(MockLlmClient::new(responses));
        let svc = LlmGenerationService::new(client.clone(), PromptLoader::embedded_only(), Locale::En);
        (svc, client)
    }

    fn request() -> MaterializeRequest {
        MaterializeRequest {
            ingredients: vec!["gin".to_string()],
            expertise: ExpertiseLevel::Professional,
            constraints: vec!["VEGAN".to_string()],
            course_count: None,
        }
    }

    fn recipe_json(name: &str) -> serde_json::Value {
        json!({
            "meta": {"dish_name": name, "concept_summary": "c"},
            "maestro_synthesis": {"rationale": "r", "ingredients": [], "steps": []}
        })
    }

    #[tokio::test]
    async fn test_send_message_text_is_recorded() {
        let (svc, client) = service(vec![CompletionResponse::text("Hello ||| A | B")]);
        let mut session = svc.start_chat_session(SessionMode::Single).await.unwrap();

        let reply = svc.send_message(&mut session, "hi").await.unwrap();
        assert_eq!(reply, ChatReply::Text("Hello ||| A | B".to_string()));
        assert_eq!(session.history().len(), 2);

        let sent = &client.requests()[0];
        assert_eq!(sent.tools[0].name, schema::READY_TOOL);
        assert_eq!(sent.tool_choice, ToolChoice::Auto);
        assert!(sent.system_prompt.contains("English"));
    }

    #[tokio::test]
    async fn test_send_message_tool_call_materializes() {
        let (svc, _) = service(vec![CompletionResponse::tool(schema::READY_TOOL, json!({}))]);
        let mut session = svc.start_chat_session(SessionMode::Menu).await.unwrap();
        let reply = svc.send_message(&mut session, "that's all").await.unwrap();
        assert_eq!(reply, ChatReply::Materialize);
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_session_untouched() {
        let (svc, _) = service(vec![]);
        let mut session = svc.start_chat_session(SessionMode::Single).await.unwrap();
        assert!(svc.send_message(&mut session, "hi").await.is_err());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_summarize_resends_history() {
        let (svc, client) = service(vec![
            CompletionResponse::text("Gin? ||| Yes"),
            CompletionResponse::tool(
                schema::SUMMARY_TOOL,
                json!({"ingredients": ["gin"], "constraints": [], "concept_abstract": "Coastal"}),
            ),
        ]);
        let mut session = svc.start_chat_session(SessionMode::Single).await.unwrap();
        svc.send_message(&mut session, "gin").await.unwrap();

        let summary = svc.summarize(&session).await.unwrap();
        assert_eq!(summary.ingredients, vec!["gin"]);
        assert_eq!(summary.concept_abstract.as_deref(), Some("Coastal"));
        assert_eq!(client.requests()[1].messages.len(), 3);
    }

    #[tokio::test]
    async fn test_summarize_without_ingredients_is_empty_error() {
        let (svc, _) = service(vec![CompletionResponse::tool(
            schema::SUMMARY_TOOL,
            json!({"ingredients": [], "constraints": []}),
        )]);
        let session = svc.start_chat_session(SessionMode::Single).await.unwrap();
        assert!(matches!(svc.summarize(&session).await, Err(GenerationError::Empty(_))));
    }

    #[tokio::test]
    async fn test_generate_dish_falls_back_to_fenced_json() {
        let text = format!("Here it is:\n```json\n{}\n```", recipe_json("Olive Martini"));
        let (svc, client) = service(vec![CompletionResponse::text(text)]);

        let recipe = svc.generate_dish(&request()).await.unwrap();
        assert_eq!(recipe.name(), "Olive Martini");
        let prompt = &client.requests()[0].system_prompt;
        assert!(prompt.contains("- gin"));
        assert!(prompt.contains("- VEGAN"));
        assert!(prompt.contains("Professionista"));
    }

    #[tokio::test]
    async fn test_generate_dish_schema_error() {
        let (svc, _) = service(vec![CompletionResponse::tool(schema::RECIPE_TOOL, json!({"meta": 3}))]);
        assert!(matches!(svc.generate_dish(&request()).await, Err(GenerationError::Schema(_))));
    }

    #[tokio::test]
    async fn test_generate_menu_uses_default_courses() {
        let menu = json!({"concept": {"title": "T", "description": "D"}, "courses": [recipe_json("a")]});
        let (svc, client) = service(vec![CompletionResponse::tool(schema::MENU_TOOL, menu)]);
        let svc = svc.with_default_courses(4);

        let result = svc.generate_menu(&request()).await.unwrap();
        assert_eq!(result.courses.len(), 1);
        assert!(client.requests()[0].system_prompt.contains("menu of 4 courses"));
    }

    #[tokio::test]
    async fn test_generate_menu_without_courses_is_empty() {
        let menu = json!({"concept": {"title": "T", "description": "D"}, "courses": []});
        let (svc, _) = service(vec![CompletionResponse::tool(schema::MENU_TOOL, menu)]);
        assert!(matches!(svc.generate_menu(&request()).await, Err(GenerationError::Empty(_))));
    }

    #[tokio::test]
    async fn test_filter_options_truncated_to_five() {
        let options = json!({"options": ["a", "b", "c", "d", "e", "f", "g"]});
        let (svc, client) = service(vec![CompletionResponse::tool(schema::OPTIONS_TOOL, options)]);

        let result = svc
            .generate_filter_options("Seasonality", Locale::It, &["Estate".to_string()])
            .await
            .unwrap();
        assert_eq!(result.len(), 5);
        let prompt = &client.requests()[0].system_prompt;
        assert!(prompt.contains("Italian"));
        assert!(prompt.contains("- Estate"));
    }

    #[tokio::test]
    async fn test_refined_questions_truncated_to_three() {
        let options = json!({"options": ["a", " ", "b", "c", "d"]});
        let (svc, client) = service(vec![CompletionResponse::tool(schema::OPTIONS_TOOL, options)]);

        let transcript = vec![ChatMessage::user("gin"), ChatMessage::model("Nice")];
        let result = svc.generate_refined_questions(&transcript, Locale::En).await.unwrap();
        assert_eq!(result, vec!["a", "b", "c"]);
        assert!(client.requests()[0].system_prompt.contains("user: gin"));
    }

    #[tokio::test]
    async fn test_service_error_propagates() {
        let (svc, _) = service(vec![]);
        let menu = MenuProject::default();
        assert!(matches!(
            svc.modify_menu(&menu, "lighter").await,
            Err(GenerationError::Service(_))
        ));
    }
}
