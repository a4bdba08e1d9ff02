//! Strategic filters shown beside the chat
//!
//! Four option groups the user can toggle as hard constraints. Selected
//! options become the UI constraint labels merged in at materialization.

use tracing::{debug, warn};

use crate::generation::{GenerationService, MAX_FILTER_OPTIONS};
use crate::i18n::Locale;

/// One of the four option groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterGroup {
    Nutrition,
    Technique,
    Mood,
    Base,
}

impl FilterGroup {
    pub const ALL: [FilterGroup; 4] = [Self::Nutrition, Self::Technique, Self::Mood, Self::Base];

    /// Parse a group by number (1-4) or name
    pub fn parse(s: &str) -> Option<Self> {
        debug!(%s, "FilterGroup::parse: called");
        match s.trim().to_lowercase().as_str() {
            "1" | "group1" | "nutrition" => Some(Self::Nutrition),
            "2" | "group2" | "technique" => Some(Self::Technique),
            "3" | "group3" | "mood" => Some(Self::Mood),
            "4" | "group4" | "base" => Some(Self::Base),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Nutrition => 0,
            Self::Technique => 1,
            Self::Mood => 2,
            Self::Base => 3,
        }
    }

    /// Category description handed to the generation service
    pub fn description(self) -> &'static str {
        match self {
            Self::Nutrition => "Nutritional Profile, Dietary Requirements, Health Considerations",
            Self::Technique => "Cooking Technique, Temperature Control, Preparation Methods",
            Self::Mood => "Seasonality, Atmosphere, Dining Experience, Food Mood",
            Self::Base => "Ingredient Base, Primary Components, Protein Source, Staple Foundation",
        }
    }

    fn seed(self) -> [&'static str; 5] {
        match self {
            Self::Nutrition => [
                "grp1_vegetarian",
                "grp1_vegan",
                "grp1_gluten_free",
                "grp1_dairy_free",
                "grp1_low_calorie",
            ],
            Self::Technique => ["grp2_baked", "grp2_grilled", "grp2_sous_vide", "grp2_sauteed", "grp2_steamed"],
            Self::Mood => ["grp3_spring", "grp3_summer", "grp3_autumn", "grp3_winter", "grp3_fine_dining"],
            Self::Base => ["grp4_pasta", "grp4_rice", "grp4_fish", "grp4_beef", "grp4_vegetables"],
        }
    }
}

impl std::fmt::Display for FilterGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Nutrition => "nutrition",
            Self::Technique => "technique",
            Self::Mood => "mood",
            Self::Base => "base",
        };
        write!(f, "{}", name)
    }
}

/// Visible options per group plus the user's current selection
///
/// Options are stored as keys; generated options have no key and are
/// stored as their label, which `Locale::option_label` passes through.
#[derive(Debug, Clone)]
pub struct FilterBoard {
    locale: Locale,
    visible: [Vec<String>; 4],
    selected: Vec<String>,
}

impl FilterBoard {
    pub fn new(locale: Locale) -> Self {
        debug!(%locale, "FilterBoard::new: called");
        Self {
            locale,
            visible: FilterGroup::ALL.map(|g| g.seed().iter().map(|k| k.to_string()).collect()),
            selected: Vec::new(),
        }
    }

    pub fn options(&self, group: FilterGroup) -> &[String] {
        &self.visible[group.index()]
    }

    pub fn label(&self, option: &str) -> String {
        self.locale.option_label(option)
    }

    pub fn is_selected(&self, option: &str) -> bool {
        self.selected.iter().any(|s| s == option)
    }

    /// Flip an option and return the system update describing the change
    pub fn toggle(&mut self, option: &str) -> String {
        debug!(%option, "FilterBoard::toggle: called");
        let action = if let Some(pos) = self.selected.iter().position(|s| s == option) {
            self.selected.remove(pos);
            "DEACTIVATED"
        } else {
            self.selected.push(option.to_string());
            "ACTIVATED"
        };
        format!("[SYSTEM UPDATE: User {} constraint: {}]", action, self.label(option))
    }

    /// Localized labels of the selected options, in selection order
    pub fn selected_labels(&self) -> Vec<String> {
        self.selected.iter().map(|k| self.label(k)).collect()
    }

    /// Replace a group's options with freshly generated ones
    ///
    /// Returns true when the group changed. A failed or empty answer leaves
    /// the group as it was. Selections are kept even if their option is no
    /// longer visible.
    pub async fn randomize(&mut self, service: &dyn GenerationService, group: FilterGroup) -> bool {
        debug!(%group, "FilterBoard::randomize: called");
        let current: Vec<String> = self.options(group).iter().map(|k| self.label(k)).collect();

        match service
            .generate_filter_options(group.description(), self.locale, &current)
            .await
        {
            Ok(options) => {
                let options: Vec<String> = options
                    .into_iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .take(MAX_FILTER_OPTIONS)
                    .collect();
                if options.is_empty() {
                    debug!(%group, "FilterBoard::randomize: empty answer, keeping options");
                    return false;
                }
                self.visible[group.index()] = options;
                true
            }
            Err(e) => {
                warn!(%group, error = %e, "Failed to regenerate filter options");
                false
            }
        }
    }
}
