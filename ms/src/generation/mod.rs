//! Generation Service
//!
//! The narrow contract between the orchestration layer and the remote model:
//! chat turns, conversation summaries, structured dish/menu generation, menu
//! edits, cost reports and short option lists. [`LlmGenerationService`] is
//! the production implementation on top of an [`LlmClient`](crate::llm::LlmClient).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    ChatMessage, ConversationSummary, CreationMode, MaterializeRequest, MarketReport, MenuMarketReport, MenuProject,
    Recipe,
};
use crate::i18n::Locale;
use crate::llm::{LlmError, Message};

mod schema;
mod service;

#[cfg(test)]
pub mod mock;

pub use service::LlmGenerationService;

/// Sentinel a model may emit instead of calling the materialize tool
pub const READY_TO_MATERIALIZE: &str = "READY_TO_MATERIALIZE";

/// Upper bound on options returned by `generate_filter_options`
pub const MAX_FILTER_OPTIONS: usize = 5;

/// Upper bound on suggestions returned by `generate_refined_questions`
pub const MAX_REFINED_QUESTIONS: usize = 3;

/// Which chat variant a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    Single,
    Menu,
}

impl SessionMode {
    /// Chat variant for a creation mode; non-generative modes have none
    pub fn for_mode(mode: CreationMode) -> Option<Self> {
        match mode {
            CreationMode::Single => Some(Self::Single),
            CreationMode::Menu => Some(Self::Menu),
            CreationMode::Analysis | CreationMode::Calculator => None,
        }
    }
}

/// Handle to one chat session with the model
///
/// Holds the model-facing transcript, which is resent on every turn. A turn
/// is only recorded once the model answered, so a failed call leaves the
/// session exactly as it was.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    mode: SessionMode,
    system_prompt: String,
    history: Vec<Message>,
    started_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(mode: SessionMode, system_prompt: impl Into<String>) -> Self {
        let id = Uuid::now_v7();
        debug!(%id, ?mode, "ChatSession::new: called");
        Self {
            id,
            mode,
            system_prompt: system_prompt.into(),
            history: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Completed exchanges so far
    pub fn turns(&self) -> usize {
        self.history.len() / 2
    }

    /// Append a completed user/model exchange
    pub fn record_turn(&mut self, user: impl Into<String>, model: impl Into<String>) {
        self.history.push(Message::user(user));
        self.history.push(Message::assistant(model));
        debug!(id = %self.id, len = self.history.len(), "ChatSession::record_turn: called");
    }
}

/// What the model answered to a chat turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// The model decided the conversation holds enough to generate
    Materialize,
    /// Free text, possibly using the `main ||| s1 | s2` encoding
    Text(String),
}

/// Errors from the generation service
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport or API failure
    #[error("generation service failed: {0}")]
    Service(#[from] LlmError),

    /// The answer could not be read as the requested shape
    #[error("response does not match the expected shape: {0}")]
    Schema(String),

    /// The answer parsed but carried nothing usable
    #[error("empty result: {0}")]
    Empty(String),

    /// A prompt template failed to load or render
    #[error("prompt error: {0}")]
    Prompt(String),
}

/// The remote generation contract
///
/// No method retries; failures propagate to the caller as-is.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Open a fresh chat session for the given variant
    async fn start_chat_session(&self, mode: SessionMode) -> Result<ChatSession, GenerationError>;

    /// Send one turn and wait for the reply
    async fn send_message(&self, session: &mut ChatSession, text: &str) -> Result<ChatReply, GenerationError>;

    /// Summarize the session into the materialization payload
    async fn summarize(&self, session: &ChatSession) -> Result<ConversationSummary, GenerationError>;

    async fn generate_dish(&self, request: &MaterializeRequest) -> Result<Recipe, GenerationError>;

    async fn generate_menu(&self, request: &MaterializeRequest) -> Result<MenuProject, GenerationError>;

    /// Apply a natural-language instruction to a whole menu
    async fn modify_menu(&self, menu: &MenuProject, instruction: &str) -> Result<MenuProject, GenerationError>;

    async fn analyze_dish_market(&self, recipe: &Recipe) -> Result<MarketReport, GenerationError>;

    async fn analyze_menu_market(&self, menu: &MenuProject) -> Result<MenuMarketReport, GenerationError>;

    /// New options for a filter category, at most [`MAX_FILTER_OPTIONS`]
    async fn generate_filter_options(
        &self,
        category_description: &str,
        locale: Locale,
        current_options: &[String],
    ) -> Result<Vec<String>, GenerationError>;

    /// Fresh follow-up suggestions, at most [`MAX_REFINED_QUESTIONS`]
    async fn generate_refined_questions(
        &self,
        transcript: &[ChatMessage],
        locale: Locale,
    ) -> Result<Vec<String>, GenerationError>;
}

/// Trim entries, drop empty ones and cap the list
pub fn clean_options(options: Vec<String>, max: usize) -> Vec<String> {
    options
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_mode_for_mode() {
        assert_eq!(SessionMode::for_mode(CreationMode::Single), Some(SessionMode::Single));
        assert_eq!(SessionMode::for_mode(CreationMode::Menu), Some(SessionMode::Menu));
        assert_eq!(SessionMode::for_mode(CreationMode::Analysis), None);
        assert_eq!(SessionMode::for_mode(CreationMode::Calculator), None);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = ChatSession::new(SessionMode::Single, "s");
        let b = ChatSession::new(SessionMode::Single, "s");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_record_turn_appends_pair() {
        let mut session = ChatSession::new(SessionMode::Menu, "s");
        session.record_turn("hi", "hello");
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[1], Message::assistant("hello"));
        assert_eq!(session.turns(), 1);
        assert!(session.started_at() <= chrono::Utc::now());
    }

    #[test]
    fn test_clean_options_trims_and_caps() {
        let raw = vec![" a ", "", "b", "  ", "c", "d", "e", "f", "g"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(clean_options(raw, MAX_FILTER_OPTIONS), vec!["a", "b", "c", "d", "e"]);
    }
}
