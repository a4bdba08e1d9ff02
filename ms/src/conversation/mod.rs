//! Conversation layer
//!
//! Turns free-form chat with the generation service into a structured
//! `MaterializeRequest`.

use thiserror::Error;

use crate::generation::GenerationError;
use crate::i18n::{Locale, Text};

mod engine;
mod filters;
mod protocol;

pub use engine::{ConversationEngine, EngineState, TurnOutcome};
pub use filters::{FilterBoard, FilterGroup};
pub use protocol::{CONCEPT_THEME_PREFIX, ParsedReply, merge_constraints, parse_model_reply};

/// Errors from the conversation engine
///
/// Every variant leaves the engine usable unless it is `Done`.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("a request is already in flight")]
    Busy,

    #[error("message is empty")]
    EmptyInput,

    #[error("cannot {action} while the conversation is {state:?}")]
    WrongState { state: EngineState, action: &'static str },

    #[error("nothing to materialize yet")]
    NothingToMaterialize,

    #[error("could not start chat session: {0}")]
    Start(#[source] GenerationError),

    #[error("chat turn failed: {0}")]
    Turn(#[source] GenerationError),

    #[error("materialization failed: {0}")]
    Materialize(#[source] GenerationError),
}

impl ConversationError {
    /// Localized sentence for the user; turn and hand-off failures match
    /// the apology already appended to the transcript
    pub fn notice(&self, locale: Locale) -> &'static str {
        match self {
            Self::Busy => locale.text(Text::Busy),
            Self::EmptyInput => locale.text(Text::EmptyMessage),
            Self::WrongState { .. } => locale.text(Text::ConversationClosed),
            Self::NothingToMaterialize => locale.text(Text::NothingToMaterialize),
            Self::Start(_) => locale.text(Text::SessionStartFailed),
            Self::Turn(_) => locale.text(Text::ChatError),
            Self::Materialize(_) => locale.text(Text::HandoffError),
        }
    }
}
