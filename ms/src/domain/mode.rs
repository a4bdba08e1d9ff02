//! Creation mode, top-level app state and derived generation status

use serde::{Deserialize, Serialize};
use tracing::debug;

/// What the user is creating; chosen once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreationMode {
    /// One signature dish
    Single,
    /// A multi-course tasting menu
    Menu,
    /// Audit of an existing menu
    Analysis,
    /// Dilution/ABV calculator
    Calculator,
}

impl CreationMode {
    /// All modes in display order
    pub const ALL: [CreationMode; 4] = [Self::Single, Self::Menu, Self::Analysis, Self::Calculator];

    /// Parse a mode name, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        debug!(%s, "CreationMode::parse: called");
        match s.trim().to_lowercase().as_str() {
            "single" | "dish" => Some(Self::Single),
            "menu" => Some(Self::Menu),
            "analysis" => Some(Self::Analysis),
            "calculator" | "calc" => Some(Self::Calculator),
            _ => None,
        }
    }

    /// Whether the conversational generation flow exists for this mode
    pub fn is_generative(self) -> bool {
        matches!(self, Self::Single | Self::Menu)
    }
}

impl std::fmt::Display for CreationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Menu => write!(f, "menu"),
            Self::Analysis => write!(f, "analysis"),
            Self::Calculator => write!(f, "calculator"),
        }
    }
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppState {
    /// Mode selection
    #[default]
    Home,
    /// Active mode's workflow
    Dashboard,
}

/// Generation status, always derived from the store flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationStatus {
    Idle,
    Loading,
    Error,
    Success,
}

impl GenerationStatus {
    /// `loading ? LOADING : error ? ERROR : result ? SUCCESS : IDLE`
    pub fn derive(loading: bool, has_error: bool, has_result: bool) -> Self {
        if loading {
            Self::Loading
        } else if has_error {
            Self::Error
        } else if has_result {
            Self::Success
        } else {
            Self::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!(CreationMode::parse("MENU"), Some(CreationMode::Menu));
        assert_eq!(CreationMode::parse(" single "), Some(CreationMode::Single));
        assert_eq!(CreationMode::parse("calc"), Some(CreationMode::Calculator));
        assert_eq!(CreationMode::parse("buffet"), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in CreationMode::ALL {
            assert_eq!(CreationMode::parse(&mode.to_string()), Some(mode));
        }
    }

    #[test]
    fn test_status_priority() {
        assert_eq!(GenerationStatus::derive(true, true, true), GenerationStatus::Loading);
        assert_eq!(GenerationStatus::derive(false, true, true), GenerationStatus::Error);
        assert_eq!(GenerationStatus::derive(false, false, true), GenerationStatus::Success);
        assert_eq!(GenerationStatus::derive(false, false, false), GenerationStatus::Idle);
    }

    #[test]
    fn test_mode_serde_upper() {
        assert_eq!(serde_json::to_string(&CreationMode::Menu).unwrap(), "\"MENU\"");
    }
}
