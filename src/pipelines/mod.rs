pub mod hero;
pub mod recipes;

pub use hero::HeroImageService;
pub use recipes::RecipeService;

use crate::error::BackendError;
use crate::providers::{GenerateRequest, LlmProvider};

/// Sends an image request and returns the first inline image as a data URL
async fn generate_image_url(
    provider: &dyn LlmProvider,
    request: &GenerateRequest,
) -> Result<String, BackendError> {
    provider.generate(request).await?.image_data_url()
}
