//! Prompt Loader
//!
//! Loads prompt templates from the override directory or falls back to
//! embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;
use crate::i18n::Locale;

/// Template names, one per generation call
pub mod names {
    pub const CHAT_SINGLE: &str = "chat-single";
    pub const CHAT_MENU: &str = "chat-menu";
    pub const SUMMARIZE: &str = "summarize";
    pub const DISH: &str = "dish";
    pub const MENU: &str = "menu";
    pub const MODIFY_MENU: &str = "modify-menu";
    pub const DISH_MARKET: &str = "dish-market";
    pub const MENU_MARKET: &str = "menu-market";
    pub const FILTERS: &str = "filters";
    pub const QUESTIONS: &str = "questions";
}

/// Variables available to every template
///
/// Fields a template does not use are simply ignored by Handlebars.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptContext {
    pub language: String,
    pub expertise: String,
    pub is_menu: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_count: Option<u32>,
    pub ingredients: Vec<String>,
    pub constraints: Vec<String>,
    pub instruction: String,
    pub menu_json: String,
    pub recipe_json: String,
    pub category: String,
    pub current_options: Vec<String>,
    pub max_options: usize,
    pub max_questions: usize,
    pub transcript: String,
}

impl PromptContext {
    /// Context carrying only the output language
    pub fn for_locale(locale: Locale) -> Self {
        debug!(%locale, "PromptContext::for_locale: called");
        Self {
            language: locale.language_name().to_string(),
            ..Default::default()
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.maestro/prompts/`)
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that prefers templates found in `override_dir`
    pub fn new(override_dir: impl AsRef<Path>) -> Self {
        let override_dir = override_dir.as_ref();
        let exists = override_dir.is_dir();
        debug!(?override_dir, %exists, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            override_dir: exists.then(|| override_dir.to_path_buf()),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle quotes in recipes
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks the override directory first, then the embedded defaults.
    pub fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in override directory");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_dish_lists_ingredients_and_constraints() {
        let loader = PromptLoader::embedded_only();
        let ctx = PromptContext {
            ingredients: vec!["gin".to_string(), "olive".to_string()],
            constraints: vec!["VEGAN".to_string()],
            expertise: "Professionista".to_string(),
            ..PromptContext::for_locale(Locale::En)
        };

        let out = loader.render(names::DISH, &ctx).unwrap();
        assert!(out.contains("- gin"));
        assert!(out.contains("- olive"));
        assert!(out.contains("- VEGAN"));
        assert!(out.contains("English"));
        assert!(out.contains("Professionista"));
    }

    #[test]
    fn test_render_does_not_escape_json() {
        let loader = PromptLoader::embedded_only();
        let ctx = PromptContext {
            menu_json: r#"{"title": "L'orto"}"#.to_string(),
            instruction: "make it \"lighter\"".to_string(),
            ..PromptContext::for_locale(Locale::It)
        };

        let out = loader.render(names::MODIFY_MENU, &ctx).unwrap();
        assert!(out.contains(r#"{"title": "L'orto"}"#));
        assert!(out.contains("make it \"lighter\""));
    }

    #[test]
    fn test_override_directory_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("filters.pmt"), "custom {{category}}").unwrap();
        let loader = PromptLoader::new(dir.path());

        let ctx = PromptContext {
            category: "Seasonality".to_string(),
            ..Default::default()
        };
        assert_eq!(loader.render(names::FILTERS, &ctx).unwrap(), "custom Seasonality");
        // Templates missing from the directory still come from the binary
        assert!(loader.load_template(names::DISH).is_ok());
    }

    #[test]
    fn test_unknown_template_is_error() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
