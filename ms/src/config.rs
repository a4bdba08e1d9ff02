//! Maestro configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::i18n::Locale;

/// Main Maestro configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Language for every user-visible sentence
    pub locale: Locale,

    /// Menu generation defaults
    pub menu: MenuConfig,

    /// Technical knowledge library
    pub sor: SorConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the API key is reachable. Call this early in startup to
    /// fail fast with a clear error message.
    pub fn validate(&self) -> Result<()> {
        debug!(provider = %self.llm.provider, "validate: called");
        if self.llm.api_key_override.is_none() && std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .maestro.yml
        let local_config = PathBuf::from(".maestro.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/maestro/maestro.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("maestro").join("maestro.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed: a broken config file is reported later by `load`.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "gemini", "anthropic" or "openai"
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Key supplied at runtime; kept in memory only
    #[serde(skip)]
    api_key_override: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            max_tokens: 8192,
            timeout_ms: 120_000,
            api_key_override: None,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key_env", &self.api_key_env)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .field("api_key_override", &self.api_key_override.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl LlmConfig {
    /// Use a key entered at runtime instead of the environment variable
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        debug!("with_api_key: called");
        self.api_key_override = Some(key.into());
        self
    }

    /// Drop a runtime key and fall back to the environment
    pub fn clear_api_key(&mut self) {
        debug!("clear_api_key: called");
        self.api_key_override = None;
    }

    /// Resolve the API key: runtime override first, then the environment variable
    pub fn get_api_key(&self) -> Result<String> {
        debug!(api_key_env = %self.api_key_env, "get_api_key: called");
        if let Some(key) = &self.api_key_override {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env).context(format!("Environment variable {} is not set", self.api_key_env))
    }
}

/// Menu generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Number of courses requested when the user does not say otherwise
    #[serde(rename = "default-courses")]
    pub default_courses: u32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self { default_courses: 5 }
    }
}

/// Technical knowledge library configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SorConfig {
    /// JSON file holding the library cards; unset means an empty library
    #[serde(rename = "library-path")]
    pub library_path: Option<PathBuf>,
}

/// Prompt template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory searched for `{name}.pmt` overrides before the embedded defaults
    #[serde(rename = "override-dir")]
    pub override_dir: PathBuf,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            override_dir: PathBuf::from(".maestro/prompts"),
        }
    }
}
