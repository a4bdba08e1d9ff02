//! Chat transcript entities and the materialization hand-off payload

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Who authored a visible chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// One visible turn in the conversation
///
/// `suggestions` is `None` when the model offered none; consumers must not
/// render an empty suggestion row for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ChatMessage {
    /// A user turn
    pub fn user(content: impl Into<String>) -> Self {
        debug!("ChatMessage::user: called");
        Self {
            role: ChatRole::User,
            content: content.into(),
            suggestions: None,
        }
    }

    /// A model turn without suggestions
    pub fn model(content: impl Into<String>) -> Self {
        debug!("ChatMessage::model: called");
        Self {
            role: ChatRole::Model,
            content: content.into(),
            suggestions: None,
        }
    }

    /// A model turn carrying follow-up suggestions
    pub fn model_with_suggestions(content: impl Into<String>, suggestions: Option<Vec<String>>) -> Self {
        debug!(has_suggestions = suggestions.is_some(), "ChatMessage::model_with_suggestions: called");
        Self {
            role: ChatRole::Model,
            content: content.into(),
            suggestions,
        }
    }

    /// True for model turns that currently offer suggestions
    pub fn offers_suggestions(&self) -> bool {
        self.role == ChatRole::Model && self.suggestions.is_some()
    }
}

/// Structured summary of a conversation, produced on materialization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_abstract: Option<String>,
}

/// Culinary expertise the recipe is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExpertiseLevel {
    #[serde(rename = "Principiante", alias = "Beginner")]
    Beginner,
    #[serde(rename = "Didatta", alias = "Teacher")]
    Teacher,
    #[default]
    #[serde(rename = "Appassionato", alias = "Enthusiast")]
    Enthusiast,
    #[serde(rename = "Professionista", alias = "Professional")]
    Professional,
}

impl ExpertiseLevel {
    pub const ALL: [ExpertiseLevel; 4] = [Self::Beginner, Self::Teacher, Self::Enthusiast, Self::Professional];

    /// Parse either the English or the canonical name
    pub fn parse(s: &str) -> Option<Self> {
        debug!(%s, "ExpertiseLevel::parse: called");
        match s.trim().to_lowercase().as_str() {
            "beginner" | "principiante" => Some(Self::Beginner),
            "teacher" | "didatta" => Some(Self::Teacher),
            "enthusiast" | "appassionato" => Some(Self::Enthusiast),
            "professional" | "pro" | "professionista" => Some(Self::Professional),
            _ => None,
        }
    }

    /// Canonical name used in prompts
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Principiante",
            Self::Teacher => "Didatta",
            Self::Enthusiast => "Appassionato",
            Self::Professional => "Professionista",
        }
    }
}

impl std::fmt::Display for ExpertiseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything needed to generate a dish or a menu
///
/// Emitted by the conversation engine on materialization, consumed by the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializeRequest {
    pub ingredients: Vec<String>,
    pub expertise: ExpertiseLevel,
    pub constraints: Vec<String>,
    /// Requested number of courses; only meaningful for menus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_count: Option<u32>,
}
