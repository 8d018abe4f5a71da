use log::{info, warn};
use std::sync::Arc;

use super::generate_image_url;
use crate::config::AppConfig;
use crate::prompt::build_hero_prompt;
use crate::providers::LlmProvider;

/// Produces the decorative illustration for the landing view
pub struct HeroImageService {
    provider: Arc<dyn LlmProvider>,
    fallback_url: String,
}

impl HeroImageService {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AppConfig) -> Self {
        Self {
            provider,
            fallback_url: config.hero_fallback_url.clone(),
        }
    }

    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(provider, &AppConfig::default())
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }

    /// Generated hero image as a data URL. Never fails: any error yields the
    /// static fallback URL.
    pub async fn generate_hero_image(&self) -> String {
        info!("Generating hero image for FridgeWise...");
        match generate_image_url(self.provider.as_ref(), &build_hero_prompt()).await {
            Ok(url) => url,
            Err(e) => {
                warn!("Failed to generate hero image: {}", e);
                self.fallback_url.clone()
            }
        }
    }
}
