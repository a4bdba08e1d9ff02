//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for every generation call.
//!
//! Template loading chain:
//! 1. `{prompts.override-dir}/{name}.pmt` (user override)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{PromptContext, PromptLoader, names};
