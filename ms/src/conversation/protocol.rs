//! The inline text protocol of chat replies
//!
//! A reply either contains the `READY_TO_MATERIALIZE` sentinel, or is
//! `main text ||| suggestion | suggestion | ...`. There is no escaping for a
//! literal `|` in generated text; the first `|||` always splits.

use tracing::debug;

use crate::domain::ConversationSummary;
use crate::generation::READY_TO_MATERIALIZE;

/// Separates the visible text from the suggestion list
pub const SUGGESTION_MARKER: &str = "|||";

/// Separates suggestions from each other
pub const SUGGESTION_SEPARATOR: char = '|';

/// Prefix of the synthetic constraint carrying the summary's concept
pub const CONCEPT_THEME_PREFIX: &str = "CONCEPT_THEME: ";

/// A chat reply after protocol parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReply {
    /// The sentinel was present; nothing is shown
    Materialize,
    /// A visible model message
    Message {
        text: String,
        /// `None` when the reply had no marker or only empty entries
        suggestions: Option<Vec<String>>,
    },
}

/// Parse a raw chat reply
pub fn parse_model_reply(raw: &str) -> ParsedReply {
    debug!(raw_len = raw.len(), "parse_model_reply: called");
    if raw.contains(READY_TO_MATERIALIZE) {
        debug!("parse_model_reply: sentinel found");
        return ParsedReply::Materialize;
    }

    let Some((main, tail)) = raw.split_once(SUGGESTION_MARKER) else {
        return ParsedReply::Message {
            text: raw.trim().to_string(),
            suggestions: None,
        };
    };

    let suggestions: Vec<String> = tail
        .split(SUGGESTION_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    debug!(count = suggestions.len(), "parse_model_reply: suggestions parsed");

    ParsedReply::Message {
        text: main.trim().to_string(),
        suggestions: (!suggestions.is_empty()).then_some(suggestions),
    }
}

/// Merge UI-selected constraint labels with those found in the summary
///
/// UI labels come first; duplicates are removed by exact string equality,
/// keeping the first occurrence. The concept theme, when present, is
/// appended last.
pub fn merge_constraints(ui_labels: &[String], summary: &ConversationSummary) -> Vec<String> {
    debug!(ui = ui_labels.len(), chat = summary.constraints.len(), "merge_constraints: called");
    let mut merged: Vec<String> = Vec::with_capacity(ui_labels.len() + summary.constraints.len() + 1);
    for constraint in ui_labels.iter().chain(summary.constraints.iter()) {
        if !merged.contains(constraint) {
            merged.push(constraint.clone());
        }
    }

    if let Some(concept) = summary.concept_abstract.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        merged.push(format!("{}{}", CONCEPT_THEME_PREFIX, concept));
    }
    merged
}
