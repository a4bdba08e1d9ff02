//! SOR knowledge library
//!
//! Quick technical reference cards (ingredients and techniques) loaded from
//! a JSON file. Matching cards are handed to generation as extra context.
//! The library is optional: a missing or broken file leaves it empty.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Prefix of the constraint that carries library context into generation
pub const SERVER_INSTRUCTION_PREFIX: &str = "SERVER_INSTRUCTION: Prioritize these facts: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SorCategory {
    Ingredient,
    Technique,
}

impl std::fmt::Display for SorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ingredient => write!(f, "INGREDIENT"),
            Self::Technique => write!(f, "TECHNIQUE"),
        }
    }
}

/// One reference card, e.g. "I-045" or "T-008"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SorItem {
    pub id: String,
    pub category: SorCategory,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_principle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_context: Option<String>,
    #[serde(default)]
    pub pairing_tags: Vec<String>,
    pub technical_notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    /// Case-insensitive substring of the title or any tag
    pub query: Option<String>,
    pub category: Option<SorCategory>,
    /// Any tag matches, case-insensitive
    pub tags: Vec<String>,
}

impl SearchCriteria {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    fn is_empty(&self) -> bool {
        self.query.as_deref().is_none_or(|q| q.is_empty()) && self.category.is_none() && self.tags.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SorLibrary {
    items: Vec<SorItem>,
}

impl SorLibrary {
    pub fn new(items: Vec<SorItem>) -> Self {
        Self { items }
    }

    /// Load from a JSON array; any failure yields an empty library
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        debug!(?path, "SorLibrary::load: called");
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "SOR library failed to load, functionality limited");
                return Self::default();
            }
        };
        match serde_json::from_str::<Vec<SorItem>>(&content) {
            Ok(items) => {
                info!(count = items.len(), "SOR library loaded");
                Self { items }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "SOR library is malformed, functionality limited");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cards matching every given criterion; empty criteria match nothing
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<&SorItem> {
        debug!(?criteria, "search: called");
        if criteria.is_empty() {
            return Vec::new();
        }
        let query = criteria.query.as_deref().map(str::to_lowercase).filter(|q| !q.is_empty());
        let tags: Vec<String> = criteria.tags.iter().map(|t| t.to_lowercase()).collect();

        self.items
            .iter()
            .filter(|item| {
                query.as_deref().is_none_or(|q| {
                    item.title.to_lowercase().contains(q)
                        || item.pairing_tags.iter().any(|t| t.to_lowercase().contains(q))
                })
            })
            .filter(|item| criteria.category.is_none_or(|c| item.category == c))
            .filter(|item| tags.is_empty() || item.pairing_tags.iter().any(|t| tags.contains(&t.to_lowercase())))
            .collect()
    }

    /// Context block for the cards matching any of the ingredients
    ///
    /// Returns an empty string when nothing matches.
    pub fn relevant_context(&self, ingredients: &[String]) -> String {
        debug!(?ingredients, "relevant_context: called");
        let mut found: Vec<&SorItem> = Vec::new();
        for ingredient in ingredients {
            for item in self.search(&SearchCriteria::query(ingredient.trim())) {
                if !found.iter().any(|f| f.id == item.id) {
                    found.push(item);
                }
            }
        }
        if found.is_empty() {
            return String::new();
        }

        let mut context = String::from("SCHEDE OPERATIVE RAPIDE (SOR) DATA - PRIORITIZE THIS TECHNICAL KNOWLEDGE:\n");
        for item in found {
            context.push_str(&format!(
                "[REF {}] {} ({}): {} Principle: {}\n",
                item.id,
                item.title,
                item.category,
                item.technical_notes,
                item.scientific_principle.as_deref().unwrap_or("-"),
            ));
        }
        context
    }

    /// The extra generation constraint for these ingredients, if any card matches
    pub fn enrichment(&self, ingredients: &[String]) -> Option<String> {
        let context = self.relevant_context(ingredients);
        (!context.is_empty()).then(|| format!("{}{}", SERVER_INSTRUCTION_PREFIX, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn library() -> SorLibrary {
        let json = r#"[
            {"id": "I-001", "category": "INGREDIENT", "title": "Olive Brine",
             "scientific_principle": "Osmosis", "pairing_tags": ["Gin", "Martini"],
             "technical_notes": "Use filtered brine."},
            {"id": "T-008", "category": "TECHNIQUE", "title": "Fat Washing",
             "pairing_tags": ["gin", "butter"], "technical_notes": "Freeze and strain."},
            {"id": "I-002", "category": "INGREDIENT", "title": "Saffron",
             "pairing_tags": ["risotto"], "technical_notes": "Bloom in warm water."}
        ]"#;
        SorLibrary::new(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_empty_criteria_returns_nothing() {
        assert!(library().search(&SearchCriteria::default()).is_empty());
        assert!(library().search(&SearchCriteria::query("")).is_empty());
    }

    #[test]
    fn test_query_matches_title_and_tags_case_insensitive() {
        let lib = library();
        let ids: Vec<&str> = lib.search(&SearchCriteria::query("GIN")).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["I-001", "T-008"]);
    }

    #[test]
    fn test_category_and_tag_filters() {
        let lib = library();
        let criteria = SearchCriteria {
            query: None,
            category: Some(SorCategory::Technique),
            tags: vec!["BUTTER".to_string()],
        };
        let found = lib.search(&criteria);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "T-008");
    }

    #[test]
    fn test_relevant_context_dedups_cards() {
        let lib = library();
        let ctx = lib.relevant_context(&["gin".to_string(), "martini".to_string()]);
        assert_eq!(ctx.matches("[REF I-001]").count(), 1);
        assert!(ctx.contains("[REF T-008] Fat Washing (TECHNIQUE): Freeze and strain."));
        assert!(ctx.contains("Principle: Osmosis"));
    }

    #[test]
    fn test_enrichment_absent_without_matches() {
        assert_eq!(library().enrichment(&["tofu".to_string()]), None);
        assert!(
            library()
                .enrichment(&["saffron".to_string()])
                .unwrap()
                .starts_with(SERVER_INSTRUCTION_PREFIX)
        );
    }

    #[test]
    fn test_load_missing_or_malformed_is_empty() {
        assert!(SorLibrary::load("/nonexistent/sor.json").is_empty());

        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{not json").unwrap();
        assert!(SorLibrary::load(file.path()).is_empty());
    }

    #[test]
    fn test_load_valid_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"[{"id": "I-9", "category": "INGREDIENT", "title": "Yuzu", "technical_notes": "Zest only."}]"#,
        )
        .unwrap();
        assert_eq!(SorLibrary::load(file.path()).len(), 1);
    }
}
