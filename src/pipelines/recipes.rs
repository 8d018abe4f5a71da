use futures::future::join_all;
use log::{debug, info, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;
use uuid::Uuid;

use super::generate_image_url;
use crate::config::AppConfig;
use crate::encoder::{encode_all, ImageResource};
use crate::error::{BackendError, FridgeWiseError, GenerationError, ParseError};
use crate::model::{ExtractionPayload, ExtractionResult, Recipe, RecipeDraft};
use crate::prompt::{build_extraction_request, build_recipe_image_prompt};
use crate::providers::LlmProvider;
use crate::schema::recipe_schema;

/// Escaped in placeholder titles: everything except alphanumerics and `-_.!~*'()`
const TITLE_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Turns ingredient photos into recipes with photos
pub struct RecipeService {
    provider: Arc<dyn LlmProvider>,
    placeholder_base_url: String,
}

impl RecipeService {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AppConfig) -> Self {
        Self {
            provider,
            placeholder_base_url: config.placeholder_base_url.clone(),
        }
    }

    /// Service using the default placeholder image host
    pub fn with_provider(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(provider, &AppConfig::default())
    }

    /// Generates an ingredient list and recipes from one or more photos
    ///
    /// Encoding, the extraction call and parsing are all-or-nothing: any
    /// failure there is returned as [`FridgeWiseError::Generation`]. A failed
    /// recipe photo only swaps that recipe's image for a placeholder.
    ///
    /// # Errors
    /// - [`FridgeWiseError::Validation`] when `images` is empty
    /// - [`FridgeWiseError::Generation`] when encoding, the backend call or
    ///   parsing fails
    pub async fn generate_recipes_from_images(
        &self,
        images: &[ImageResource],
    ) -> Result<ExtractionResult, FridgeWiseError> {
        if images.is_empty() {
            return Err(FridgeWiseError::Validation(
                "At least one image is required".to_string(),
            ));
        }

        info!("Generating recipes from {} image(s)...", images.len());

        let payload = self.extract(images).await?;
        info!(
            "Found {} ingredient(s) and {} recipe(s), generating photos",
            payload.ingredients.len(),
            payload.recipes.len()
        );

        let recipes = join_all(
            payload
                .recipes
                .into_iter()
                .map(|draft| self.illustrate(draft)),
        )
        .await;

        Ok(ExtractionResult {
            ingredients: payload.ingredients,
            recipes,
        })
    }

    async fn extract(&self, images: &[ImageResource]) -> Result<ExtractionPayload, GenerationError> {
        let encoded = encode_all(images).await?;
        let request = build_extraction_request(&encoded);

        let response = self.provider.generate(&request).await?;
        let text = response.text().ok_or(BackendError::MissingText)?;
        debug!("Extraction response: {}", text);

        Ok(parse_extraction(&text)?)
    }

    async fn illustrate(&self, draft: RecipeDraft) -> Recipe {
        let image = self.generate_recipe_image(&draft.title).await;
        Recipe {
            id: Uuid::new_v4().to_string(),
            draft,
            image,
        }
    }

    /// Photo of a recipe as a data URL, or the placeholder if generation fails
    pub async fn generate_recipe_image(&self, title: &str) -> String {
        let request = build_recipe_image_prompt(title);
        match generate_image_url(self.provider.as_ref(), &request).await {
            Ok(url) => url,
            Err(e) => {
                warn!("Failed to generate image for \"{}\": {}", title, e);
                self.placeholder_image_url(title)
            }
        }
    }

    /// Text-overlay placeholder keyed by the recipe title
    pub fn placeholder_image_url(&self, title: &str) -> String {
        let separator = if self.placeholder_base_url.contains('?') {
            '&'
        } else {
            '?'
        };
        format!(
            "{}{}text={}",
            self.placeholder_base_url,
            separator,
            utf8_percent_encode(title, TITLE_ESCAPES)
        )
    }
}

/// Parses and validates the extraction response text
pub fn parse_extraction(text: &str) -> Result<ExtractionPayload, ParseError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(ParseError::Json)?;
    recipe_schema().validate(&value)?;
    serde_json::from_value(value).map_err(ParseError::Deserialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{GenerateRequest, GenerateResponse};
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl LlmProvider for Unreachable {
        fn provider_name(&self) -> &str {
            "unreachable"
        }

        async fn generate(&self, _: &GenerateRequest) -> Result<GenerateResponse, BackendError> {
            Err(BackendError::MissingText)
        }
    }

    #[test]
    fn test_parse_extraction() {
        let payload = parse_extraction(
            r#"{
                "ingredients": ["onion", "pasta"],
                "recipes": [{
                    "title": "Pasta X",
                    "prepTime": 20,
                    "difficulty": "Easy",
                    "ingredients": ["onion", "pasta"],
                    "instructions": ["Cook"],
                    "dietaryTags": ["Quick Meals", "Vegan"]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.ingredients, vec!["onion", "pasta"]);
        assert_eq!(payload.recipes[0].title, "Pasta X");
    }

    #[test]
    fn test_parse_extraction_errors() {
        assert!(matches!(
            parse_extraction("not json"),
            Err(ParseError::Json(_))
        ));
        assert!(matches!(
            parse_extraction(r#"{"ingredients": []}"#),
            Err(ParseError::Schema { .. })
        ));
        assert!(matches!(
            parse_extraction(
                r#"{"ingredients": [], "recipes": [{
                    "title": "T", "prepTime": 5, "difficulty": "Impossible",
                    "ingredients": [], "instructions": [], "dietaryTags": []
                }]}"#
            ),
            Err(ParseError::Deserialize(_))
        ));
    }

    #[test]
    fn test_placeholder_is_url_encoded() {
        let service = RecipeService::with_provider(Arc::new(Unreachable));
        assert_eq!(
            service.placeholder_image_url("Mac & Cheese"),
            "https://placehold.co/600x400/E2E8F0/475569?text=Mac%20%26%20Cheese"
        );
        assert_eq!(
            service.placeholder_image_url("Mom's Stew (Easy!)"),
            "https://placehold.co/600x400/E2E8F0/475569?text=Mom's%20Stew%20(Easy!)"
        );
        assert_eq!(
            service.placeholder_image_url("Crème brûlée"),
            "https://placehold.co/600x400/E2E8F0/475569?text=Cr%C3%A8me%20br%C3%BBl%C3%A9e"
        );
    }

    #[test]
    fn test_placeholder_appends_to_existing_query() {
        let config = AppConfig {
            placeholder_base_url: "https://img.example/render?size=600x400".to_string(),
            ..AppConfig::default()
        };
        let service = RecipeService::new(Arc::new(Unreachable), &config);
        assert_eq!(
            service.placeholder_image_url("Pasta X"),
            "https://img.example/render?size=600x400&text=Pasta%20X"
        );
    }

    #[tokio::test]
    async fn test_recipe_image_falls_back() {
        let service = RecipeService::with_provider(Arc::new(Unreachable));
        assert_eq!(
            service.generate_recipe_image("Pasta X").await,
            "https://placehold.co/600x400/E2E8F0/475569?text=Pasta%20X"
        );
    }

    #[tokio::test]
    async fn test_empty_input_is_validation_error() {
        let service = RecipeService::with_provider(Arc::new(Unreachable));
        let result = service.generate_recipes_from_images(&[]).await;
        assert!(matches!(result, Err(FridgeWiseError::Validation(_))));
    }
}
