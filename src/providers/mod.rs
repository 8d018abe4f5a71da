mod google;

pub use google::GoogleProvider;

use async_trait::async_trait;

use crate::encoder::EncodedImage;
use crate::error::BackendError;
use crate::schema::Schema;

/// One piece of a request or response
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    InlineData(EncodedImage),
}

/// What the backend is asked to answer with
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// JSON text conforming to the given schema
    Json(Schema),
    /// Image and text parts
    ImageAndText,
}

/// A request to the generative backend
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub parts: Vec<Part>,
    pub format: ResponseFormat,
}

impl GenerateRequest {
    pub fn wants_image(&self) -> bool {
        matches!(self.format, ResponseFormat::ImageAndText)
    }
}

/// Content returned by the generative backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    pub parts: Vec<Part>,
}

impl GenerateResponse {
    /// All text parts joined together, if there are any
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.as_str()),
                Part::InlineData(_) => None,
            })
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    /// First inline image part
    pub fn first_image(&self) -> Option<&EncodedImage> {
        self.parts.iter().find_map(|part| match part {
            Part::InlineData(image) => Some(image),
            Part::Text(_) => None,
        })
    }

    /// First inline image as a `data:` URL
    pub fn image_data_url(&self) -> Result<String, BackendError> {
        self.first_image()
            .map(EncodedImage::to_data_url)
            .ok_or(BackendError::MissingImage)
    }
}

/// A multimodal generative AI backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Send one request and return the content of the reply
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError>;
}
