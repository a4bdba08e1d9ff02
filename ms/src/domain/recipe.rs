//! Recipe and menu documents
//!
//! These mirror the schema the generation service is asked to fill. Optional
//! fields default so that a slightly sparse model answer still parses.

use serde::{Deserialize, Serialize};

use super::ExpertiseLevel;

/// One expert's take on the dish
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SageAnalysis {
    pub headline: String,
    pub analysis: String,
}

/// The four-voice council behind every recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SagesCouncil {
    pub scientist: SageAnalysis,
    pub artist: SageAnalysis,
    pub historian: SageAnalysis,
    pub philosopher: SageAnalysis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    /// e.g. "60ml", "2 dashes"
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub step_number: u32,
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlasswareGuide {
    pub glass_type: String,
    pub ice_type: String,
    pub garnish_detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensoryProfile {
    pub taste_balance: String,
    pub texture_map: String,
}

/// A component prepared in-house, e.g. a cordial or a ferment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomemadePrep {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_note: Option<String>,
}

/// The actionable part of a recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub rationale: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<RecipeStep>,
    #[serde(default)]
    pub glassware_guide: GlasswareGuide,
    #[serde(default)]
    pub sensory_profile: SensoryProfile,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub homemade_preps: Vec<HomemadePrep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeMeta {
    pub dish_name: String,
    pub concept_summary: String,
    #[serde(default)]
    pub preparation_time_minutes: u32,
    #[serde(default)]
    pub difficulty_level: ExpertiseLevel,
    #[serde(default)]
    pub philosophical_pillar_alignment: String,
    #[serde(default)]
    pub abv_estimate: String,
    #[serde(default)]
    pub calories_estimate: u32,
    #[serde(default)]
    pub category: String,
}

/// A complete single-dish document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub meta: RecipeMeta,
    #[serde(default)]
    pub sages_council: SagesCouncil,
    #[serde(rename = "maestro_synthesis")]
    pub synthesis: Synthesis,
}

impl Recipe {
    pub fn name(&self) -> &str {
        &self.meta.dish_name
    }
}

/// The thread tying a menu's courses together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuConcept {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub seasonality: String,
    #[serde(default)]
    pub philosophical_theme: String,
}

/// A multi-course menu
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuProject {
    pub concept: MenuConcept,
    pub courses: Vec<Recipe>,
}

impl MenuProject {
    pub fn course(&self, index: usize) -> Option<&Recipe> {
        self.courses.get(index)
    }
}
