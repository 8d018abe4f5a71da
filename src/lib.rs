pub mod app;
pub mod config;
pub mod encoder;
pub mod error;
pub mod model;
pub mod pipelines;
pub mod prompt;
pub mod providers;
pub mod schema;

// Re-export main types
pub use app::{App, AppState};
pub use config::AppConfig;
pub use encoder::{EncodedImage, ImageResource};
pub use error::{BackendError, EncodeError, FridgeWiseError, GenerationError, ParseError};
pub use model::{DietaryFilter, Difficulty, ExtractionResult, Recipe, RecipeDraft};
pub use pipelines::{HeroImageService, RecipeService};
pub use providers::{GoogleProvider, LlmProvider};

use std::sync::Arc;

/// Backend client built from configuration, shared by both services
pub fn provider_from_config(config: &AppConfig) -> Result<Arc<dyn LlmProvider>, FridgeWiseError> {
    Ok(Arc::new(GoogleProvider::new(&config.backend)?))
}

/// Generate recipes from image files using configuration from
/// `fridgewise.toml` and the environment.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = fridgewise::recipes_from_files(&["fridge.jpg", "pantry.png"]).await?;
/// for recipe in &result.recipes {
///     println!("{} ({} min)", recipe.title(), recipe.draft.prep_time);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn recipes_from_files(paths: &[&str]) -> Result<ExtractionResult, FridgeWiseError> {
    let config = AppConfig::load()?;
    let service = RecipeService::new(provider_from_config(&config)?, &config);

    let images: Vec<ImageResource> = paths.iter().map(|p| ImageResource::from_path(*p)).collect();
    service.generate_recipes_from_images(&images).await
}

/// Generate the landing-page hero image, or the fallback URL on any failure
/// (including missing configuration).
pub async fn hero_image() -> String {
    let config = AppConfig::load().unwrap_or_default();
    match provider_from_config(&config) {
        Ok(provider) => {
            HeroImageService::new(provider, &config)
                .generate_hero_image()
                .await
        }
        Err(e) => {
            log::warn!("Cannot create AI backend for hero image: {}", e);
            config.hero_fallback_url
        }
    }
}
