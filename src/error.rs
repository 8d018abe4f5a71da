use thiserror::Error;

/// Message shown to the user when recipe generation fails
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Our AI chef is a bit busy. Please try again with different images.";

/// Message shown to the user when analysis is requested without any photos
pub const NO_IMAGES_MESSAGE: &str = "Please upload at least one photo of your ingredients.";

/// Message shown to the user when the AI backend cannot be set up
pub const SETUP_FAILURE_MESSAGE: &str =
    "FridgeWise is not set up yet. Check the API key and configuration, then try again.";

/// Errors raised while turning an image into its transport form
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The image bytes could not be read
    #[error("Failed to read image '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The image contained no bytes
    #[error("Image '{0}' is empty")]
    Empty(String),

    /// The media type is not an image type
    #[error("Unsupported media type '{0}', expected image/*")]
    UnsupportedMediaType(String),
}

/// Errors raised by a call to the generative backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Transport-level failure
    #[error("Request to AI backend failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error payload
    #[error("AI backend error ({code}): {message}")]
    Api { code: i64, message: String },

    /// The backend answered with a non-success status and no error payload
    #[error("AI backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered with a body that is not JSON
    #[error("AI backend returned a malformed body: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The response carried no text part
    #[error("AI backend response contained no text")]
    MissingText,

    /// The response carried no inline image part
    #[error("AI backend response contained no image data")]
    MissingImage,
}

/// Errors raised while interpreting the extraction response
#[derive(Error, Debug)]
pub enum ParseError {
    /// Response text was not valid JSON
    #[error("Response is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// Response JSON did not match the declared schema
    #[error("Response does not match schema at '{path}': expected {expected}")]
    Schema { path: String, expected: String },

    /// Response matched the schema but could not be mapped onto recipe drafts
    #[error("Response could not be read as recipes: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Cause of a failed extraction
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors that can occur while generating recipes
#[derive(Error, Debug)]
pub enum FridgeWiseError {
    /// Caller-supplied preconditions were violated
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Extraction failed; the cause is attached
    #[error("Failed to generate recipes from the AI model: {0}")]
    Generation(#[from] GenerationError),

    /// No API key in configuration or environment
    #[error("API key not found in config or environment (set API_KEY or FRIDGEWISE__BACKEND__API_KEY)")]
    MissingApiKey,

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl FridgeWiseError {
    /// Text safe to show an end user. The underlying cause is only logged.
    pub fn user_message(&self) -> &'static str {
        match self {
            FridgeWiseError::Validation(_) => NO_IMAGES_MESSAGE,
            FridgeWiseError::Generation(_) => GENERIC_FAILURE_MESSAGE,
            FridgeWiseError::MissingApiKey
            | FridgeWiseError::Client(_)
            | FridgeWiseError::ConfigError(_) => SETUP_FAILURE_MESSAGE,
        }
    }
}

impl From<EncodeError> for FridgeWiseError {
    fn from(err: EncodeError) -> Self {
        FridgeWiseError::Generation(err.into())
    }
}

impl From<BackendError> for FridgeWiseError {
    fn from(err: BackendError) -> Self {
        FridgeWiseError::Generation(err.into())
    }
}

impl From<ParseError> for FridgeWiseError {
    fn from(err: ParseError) -> Self {
        FridgeWiseError::Generation(err.into())
    }
}
