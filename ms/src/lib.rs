//! Maestro - generation orchestration for recipe and menu co-authoring
//!
//! Maestro sits between an interactive front end and a remote generative
//! model. A user picks a creation mode, chats with the model until the idea
//! is ripe, and the conversation is materialized into a structured dish or
//! multi-course menu that can then be edited, undone and costed.
//!
//! # Core Concepts
//!
//! - **One Store, One Truth**: loading, error and result are mutually exclusive
//! - **Stale Answers Are Dropped**: navigation invalidates in-flight generations
//! - **Edits Are Undoable**: every menu change snapshots the previous menu first
//! - **Locale Everywhere**: user-facing sentences come from one lookup
//!
//! # Modules
//!
//! - [`store`] - Mode/Result Store
//! - [`conversation`] - Conversation Engine and strategic filters
//! - [`workspace`] - Menu Workspace Controller
//! - [`generation`] - Generation Service contract and LLM-backed implementation
//! - [`llm`] - Provider clients (Gemini, Anthropic, OpenAI)
//! - [`app`] - Wires the pieces into one session
//! - [`repl`] - Interactive terminal front end

pub mod app;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod domain;
pub mod generation;
pub mod i18n;
pub mod llm;
pub mod prompts;
pub mod repl;
pub mod sor;
pub mod store;
pub mod workspace;

// Re-export commonly used types
pub use app::{App, AppError};
pub use config::{Config, LlmConfig};
pub use conversation::{ConversationEngine, ConversationError, EngineState, FilterBoard, FilterGroup, TurnOutcome};
pub use domain::{
    AppState, ChatMessage, ChatRole, ConversationSummary, CostReport, CreationMode, ExpertiseLevel, GenerationStatus,
    MarketReport, MaterializeRequest, MenuMarketReport, MenuProject, Recipe,
};
pub use generation::{ChatReply, ChatSession, GenerationError, GenerationService, LlmGenerationService, SessionMode};
pub use i18n::{Locale, Text};
pub use llm::{LlmClient, LlmError, create_client};
pub use sor::{SearchCriteria, SorCategory, SorItem, SorLibrary};
pub use store::{GenerationResult, GenerationTicket, ModeStore, StoreError};
pub use workspace::{MenuWorkspace, WorkspaceError};
