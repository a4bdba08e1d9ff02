//! Conversation Engine
//!
//! Owns one chat session per materialization attempt: the visible
//! transcript, the filter board and the single-flight guard. The engine is
//! discarded once it has produced a `MaterializeRequest`.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::filters::{FilterBoard, FilterGroup};
use super::protocol::{ParsedReply, merge_constraints, parse_model_reply};
use super::ConversationError;
use crate::domain::{ChatMessage, ChatRole, ExpertiseLevel, MaterializeRequest};
use crate::generation::{ChatReply, ChatSession, GenerationService, MAX_REFINED_QUESTIONS, SessionMode, clean_options};
use crate::i18n::{Locale, Text};

/// Where the engine is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Only the welcome message so far
    Greeting,
    Conversing,
    /// Summary requested, waiting for the service
    Materializing,
    /// A request was emitted; the engine is spent
    Done,
    /// The last turn or hand-off failed; sending again resumes the chat
    Error,
}

/// Result of a successful turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A model message was appended to the transcript
    Replied,
    /// The conversation was summarized into a generation request
    Materialized(MaterializeRequest),
}

pub struct ConversationEngine {
    service: Arc<dyn GenerationService>,
    session: ChatSession,
    locale: Locale,
    messages: Vec<ChatMessage>,
    state: EngineState,
    in_flight: bool,
    expertise: ExpertiseLevel,
    course_count: Option<u32>,
    filters: FilterBoard,
}

impl ConversationEngine {
    /// Open a session and seed the welcome message
    pub async fn start(
        service: Arc<dyn GenerationService>,
        mode: SessionMode,
        locale: Locale,
    ) -> Result<Self, ConversationError> {
        debug!(?mode, %locale, "ConversationEngine::start: called");
        let session = service
            .start_chat_session(mode)
            .await
            .map_err(ConversationError::Start)?;
        info!(id = %session.id(), ?mode, "Conversation started");

        let welcome = ChatMessage::model_with_suggestions(
            locale.text(Text::ChatWelcome),
            Some(locale.default_suggestions(mode)),
        );
        Ok(Self {
            service,
            session,
            locale,
            messages: vec![welcome],
            state: EngineState::Greeting,
            in_flight: false,
            expertise: ExpertiseLevel::default(),
            course_count: None,
            filters: FilterBoard::new(locale),
        })
    }

    /// Number of courses requested for a menu
    pub fn with_course_count(mut self, courses: u32) -> Self {
        self.course_count = Some(courses.max(1));
        self
    }

    pub fn set_expertise(&mut self, expertise: ExpertiseLevel) {
        debug!(%expertise, "set_expertise: called");
        self.expertise = expertise;
    }

    pub fn expertise(&self) -> ExpertiseLevel {
        self.expertise
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn mode(&self) -> SessionMode {
        self.session.mode()
    }

    pub fn session_id(&self) -> Uuid {
        self.session.id()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn filters(&self) -> &FilterBoard {
        &self.filters
    }

    /// True while a service call is outstanding (or was abandoned)
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Clear the in-flight flag after a turn future was dropped
    pub fn abandon_turn(&mut self) {
        debug!(state = ?self.state, "abandon_turn: called");
        self.in_flight = false;
        if self.state == EngineState::Materializing {
            self.state = EngineState::Error;
        }
    }

    fn begin(&mut self) -> Result<(), ConversationError> {
        if self.in_flight {
            debug!("begin: rejected, request in flight");
            return Err(ConversationError::Busy);
        }
        self.in_flight = true;
        Ok(())
    }

    fn ensure_open(&self, action: &'static str) -> Result<(), ConversationError> {
        match self.state {
            EngineState::Done | EngineState::Materializing => Err(ConversationError::WrongState {
                state: self.state,
                action,
            }),
            _ => Ok(()),
        }
    }

    fn apologize(&mut self, key: Text) {
        self.messages.push(ChatMessage::model(self.locale.text(key)));
        self.state = EngineState::Error;
    }

    /// Send a user turn and process the reply
    pub async fn send_message(&mut self, text: &str) -> Result<TurnOutcome, ConversationError> {
        let text = text.trim();
        debug!(text_len = text.len(), state = ?self.state, "send_message: called");
        if text.is_empty() {
            return Err(ConversationError::EmptyInput);
        }
        self.ensure_open("send a message")?;
        self.begin()?;

        self.messages.push(ChatMessage::user(text));
        self.state = EngineState::Conversing;
        let result = self.service.send_message(&mut self.session, text).await;
        self.in_flight = false;

        let raw = match result {
            Ok(ChatReply::Materialize) => return self.materialize_now().await,
            Ok(ChatReply::Text(raw)) => raw,
            Err(e) => {
                warn!(error = %e, "Chat turn failed");
                self.apologize(Text::ChatError);
                return Err(ConversationError::Turn(e));
            }
        };

        match parse_model_reply(&raw) {
            ParsedReply::Materialize => self.materialize_now().await,
            ParsedReply::Message { text, suggestions } => {
                self.messages.push(ChatMessage::model_with_suggestions(text, suggestions));
                Ok(TurnOutcome::Replied)
            }
        }
    }

    /// Same as typing the suggestion and sending it
    pub async fn select_suggestion(&mut self, suggestion: &str) -> Result<TurnOutcome, ConversationError> {
        debug!(%suggestion, "select_suggestion: called");
        self.send_message(suggestion).await
    }

    /// Deliver a hidden context update; failures are only logged
    pub async fn inject_system(&mut self, text: &str) {
        debug!(%text, "inject_system: called");
        if self.begin().is_err() {
            warn!("System update skipped, a request is in flight");
            return;
        }
        let result = self.service.send_message(&mut self.session, text).await;
        self.in_flight = false;
        if let Err(e) = result {
            warn!(error = %e, "Failed to update context");
        }
    }

    /// Toggle a filter option and tell the model; returns the new selection state
    pub async fn toggle_constraint(&mut self, option: &str) -> bool {
        debug!(%option, "toggle_constraint: called");
        let injection = self.filters.toggle(option);
        self.inject_system(&injection).await;
        self.filters.is_selected(option)
    }

    /// Regenerate one filter group's options
    pub async fn randomize_filters(&mut self, group: FilterGroup) -> bool {
        debug!(%group, "randomize_filters: called");
        self.filters.randomize(self.service.as_ref(), group).await
    }

    /// Replace the newest suggestion row with fresh questions
    ///
    /// Returns false when there is no row to refresh, or when the service
    /// failed or returned nothing; the transcript is unchanged then.
    pub async fn refresh_questions(&mut self) -> Result<bool, ConversationError> {
        debug!("refresh_questions: called");
        let Some(idx) = self.messages.iter().rposition(|m| m.offers_suggestions()) else {
            debug!("refresh_questions: no message with suggestions");
            return Ok(false);
        };
        self.begin()?;
        let result = self
            .service
            .generate_refined_questions(&self.messages, self.locale)
            .await;
        self.in_flight = false;

        let questions = match result {
            Ok(q) => clean_options(q, MAX_REFINED_QUESTIONS),
            Err(e) => {
                warn!(error = %e, "Failed to refresh questions");
                return Ok(false);
            }
        };
        if questions.is_empty() {
            return Ok(false);
        }
        self.messages[idx].suggestions = Some(questions);
        Ok(true)
    }

    /// Summarize the conversation into a generation request
    pub async fn materialize(&mut self) -> Result<MaterializeRequest, ConversationError> {
        debug!(state = ?self.state, "materialize: called");
        self.ensure_open("materialize")?;
        if !self.messages.iter().any(|m| m.role == ChatRole::User) {
            return Err(ConversationError::NothingToMaterialize);
        }
        match self.materialize_now().await? {
            TurnOutcome::Materialized(request) => Ok(request),
            TurnOutcome::Replied => Err(ConversationError::NothingToMaterialize),
        }
    }

    async fn materialize_now(&mut self) -> Result<TurnOutcome, ConversationError> {
        self.begin()?;
        self.state = EngineState::Materializing;
        let result = self.service.summarize(&self.session).await;
        self.in_flight = false;

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Materialization failed");
                self.apologize(Text::HandoffError);
                return Err(ConversationError::Materialize(e));
            }
        };

        let constraints = merge_constraints(&self.filters.selected_labels(), &summary);
        let course_count = match self.session.mode() {
            SessionMode::Menu => self.course_count,
            SessionMode::Single => None,
        };
        let request = MaterializeRequest {
            ingredients: summary.ingredients,
            expertise: self.expertise,
            constraints,
            course_count,
        };
        self.state = EngineState::Done;
        let elapsed = chrono::Utc::now() - self.session.started_at();
        info!(
            ingredients = ?request.ingredients,
            constraints = request.constraints.len(),
            turns = self.session.turns(),
            elapsed_secs = elapsed.num_seconds(),
            "Conversation materialized"
        );
        Ok(TurnOutcome::Materialized(request))
    }
}
