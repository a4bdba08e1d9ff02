//! Domain types for Maestro
//!
//! Modes and statuses driving the state machine, the chat transcript
//! entities, and the recipe/menu/cost documents handed to downstream views.
//! Everything here is plain data: serde-serializable and compared by value.

mod chat;
mod market;
mod mode;
mod recipe;

pub use chat::{ChatMessage, ChatRole, ConversationSummary, ExpertiseLevel, MaterializeRequest};
pub use market::{
    CostReport, DishFinancialSummary, IngredientCost, MarketReport, MarketTrend, MenuMarketReport, NutritionalProfile,
};
pub use mode::{AppState, CreationMode, GenerationStatus};
pub use recipe::{
    GlasswareGuide, HomemadePrep, MenuConcept, MenuProject, Recipe, RecipeIngredient, RecipeMeta, RecipeStep,
    SageAnalysis, SagesCouncil, SensoryProfile, Synthesis,
};
