use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Generative backend settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Image shown when the hero illustration cannot be generated
    #[serde(default = "default_hero_fallback_url")]
    pub hero_fallback_url: String,
    /// Base URL of the text-overlay placeholder used when a recipe photo fails
    #[serde(default = "default_placeholder_base_url")]
    pub placeholder_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            hero_fallback_url: default_hero_fallback_url(),
            placeholder_base_url: default_placeholder_base_url(),
        }
    }
}

/// Configuration for the generative AI backend
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for the API endpoint (for custom or proxy endpoints)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used for structured ingredient and recipe extraction
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Model used when an image is requested in the response
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            timeout: default_timeout(),
        }
    }
}

impl BackendConfig {
    /// API key from configuration, falling back to `API_KEY` then `GEMINI_API_KEY`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("API_KEY").ok())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_hero_fallback_url() -> String {
    "https://images.unsplash.com/photo-1542838132-92c53300491e?q=80&w=1374".to_string()
}

fn default_placeholder_base_url() -> String {
    "https://placehold.co/600x400/E2E8F0/475569".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FRIDGEWISE__ prefix
    /// 2. fridgewise.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FRIDGEWISE__BACKEND__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the priority order.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("fridgewise").required(false))
        // Use double underscore for nested: FRIDGEWISE__BACKEND__API_KEY
        .add_source(
            Environment::with_prefix("FRIDGEWISE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
