//! Scripted GenerationService for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::debug;

use super::*;
use crate::domain::{MarketReport, MenuMarketReport};

type Queue<T> = Mutex<VecDeque<Result<T, GenerationError>>>;

/// Replays scripted results per method and records every call
///
/// An exhausted queue answers with `GenerationError::Empty`. With a gate
/// set, every call waits for one `Notify` permit before answering.
#[derive(Default)]
pub struct MockGenerationService {
    chat: Queue<ChatReply>,
    summaries: Queue<ConversationSummary>,
    dishes: Queue<Recipe>,
    menus: Queue<MenuProject>,
    modified: Queue<MenuProject>,
    dish_reports: Queue<MarketReport>,
    menu_reports: Queue<MenuMarketReport>,
    options: Queue<Vec<String>>,
    questions: Queue<Vec<String>>,
    calls: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

/// A generic service failure for scripting
pub fn failure() -> GenerationError {
    GenerationError::Service(LlmError::InvalidResponse("scripted failure".to_string()))
}

fn pop<T>(queue: &Queue<T>, what: &str) -> Result<T, GenerationError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(GenerationError::Empty(format!("no scripted {}", what))))
}

impl MockGenerationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every call until the returned `Notify` gets a permit
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn chat(self, reply: Result<ChatReply, GenerationError>) -> Self {
        self.chat.lock().unwrap().push_back(reply);
        self
    }

    pub fn text(self, reply: &str) -> Self {
        self.chat(Ok(ChatReply::Text(reply.to_string())))
    }

    pub fn summary(self, summary: Result<ConversationSummary, GenerationError>) -> Self {
        self.summaries.lock().unwrap().push_back(summary);
        self
    }

    pub fn dish(self, recipe: Result<Recipe, GenerationError>) -> Self {
        self.dishes.lock().unwrap().push_back(recipe);
        self
    }

    pub fn menu(self, menu: Result<MenuProject, GenerationError>) -> Self {
        self.menus.lock().unwrap().push_back(menu);
        self
    }

    pub fn modified(self, menu: Result<MenuProject, GenerationError>) -> Self {
        self.modified.lock().unwrap().push_back(menu);
        self
    }

    pub fn dish_report(self, report: Result<MarketReport, GenerationError>) -> Self {
        self.dish_reports.lock().unwrap().push_back(report);
        self
    }

    pub fn menu_report(self, report: Result<MenuMarketReport, GenerationError>) -> Self {
        self.menu_reports.lock().unwrap().push_back(report);
        self
    }

    pub fn options(self, options: Result<Vec<String>, GenerationError>) -> Self {
        self.options.lock().unwrap().push_back(options);
        self
    }

    pub fn questions(self, questions: Result<Vec<String>, GenerationError>) -> Self {
        self.questions.lock().unwrap().push_back(questions);
        self
    }

    /// Names of the methods called so far, with their main argument
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) {
        debug!(%call, "MockGenerationService: called");
        self.calls.lock().unwrap().push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    async fn start_chat_session(&self, mode: SessionMode) -> Result<ChatSession, GenerationError> {
        self.calls.lock().unwrap().push(format!("start_chat_session:{:?}", mode));
        Ok(ChatSession::new(mode, "mock system prompt"))
    }

    async fn send_message(&self, session: &mut ChatSession, text: &str) -> Result<ChatReply, GenerationError> {
        self.enter(format!("send_message:{}", text)).await;
        let reply = pop(&self.chat, "chat reply")?;
        let recorded = match &reply {
            ChatReply::Materialize => READY_TO_MATERIALIZE.to_string(),
            ChatReply::Text(t) => t.clone(),
        };
        session.record_turn(text, recorded);
        Ok(reply)
    }

    async fn summarize(&self, _session: &ChatSession) -> Result<ConversationSummary, GenerationError> {
        self.enter("summarize".to_string()).await;
        pop(&self.summaries, "summary")
    }

    async fn generate_dish(&self, request: &MaterializeRequest) -> Result<Recipe, GenerationError> {
        self.enter(format!("generate_dish:{}", request.constraints.join(","))).await;
        pop(&self.dishes, "dish")
    }

    async fn generate_menu(&self, request: &MaterializeRequest) -> Result<MenuProject, GenerationError> {
        self.enter(format!("generate_menu:{}", request.constraints.join(","))).await;
        pop(&self.menus, "menu")
    }

    async fn modify_menu(&self, _menu: &MenuProject, instruction: &str) -> Result<MenuProject, GenerationError> {
        self.enter(format!("modify_menu:{}", instruction)).await;
        pop(&self.modified, "modified menu")
    }

    async fn analyze_dish_market(&self, recipe: &Recipe) -> Result<MarketReport, GenerationError> {
        self.enter(format!("analyze_dish_market:{}", recipe.name())).await;
        pop(&self.dish_reports, "dish report")
    }

    async fn analyze_menu_market(&self, menu: &MenuProject) -> Result<MenuMarketReport, GenerationError> {
        self.enter(format!("analyze_menu_market:{}", menu.concept.title)).await;
        pop(&self.menu_reports, "menu report")
    }

    async fn generate_filter_options(
        &self,
        category_description: &str,
        _locale: Locale,
        _current_options: &[String],
    ) -> Result<Vec<String>, GenerationError> {
        self.enter(format!("generate_filter_options:{}", category_description)).await;
        pop(&self.options, "options")
    }

    async fn generate_refined_questions(
        &self,
        transcript: &[ChatMessage],
        _locale: Locale,
    ) -> Result<Vec<String>, GenerationError> {
        self.enter(format!("generate_refined_questions:{}", transcript.len())).await;
        pop(&self.questions, "questions")
    }
}
