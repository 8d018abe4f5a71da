use crate::config::BackendConfig;
use crate::encoder::EncodedImage;
use crate::error::{BackendError, FridgeWiseError};
use crate::providers::{GenerateRequest, GenerateResponse, LlmProvider, Part, ResponseFormat};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &BackendConfig) -> Result<Self, FridgeWiseError> {
        let api_key = config
            .resolve_api_key()
            .ok_or(FridgeWiseError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(FridgeWiseError::Client)?;

        Ok(GoogleProvider {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let defaults = BackendConfig::default();
        GoogleProvider {
            client: Client::new(),
            api_key,
            base_url,
            text_model: defaults.text_model,
            image_model: defaults.image_model,
        }
    }

    fn model_for(&self, request: &GenerateRequest) -> &str {
        if request.wants_image() {
            &self.image_model
        } else {
            &self.text_model
        }
    }
}

fn request_body(request: &GenerateRequest) -> Value {
    let parts: Vec<Value> = request
        .parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => json!({ "text": text }),
            Part::InlineData(image) => json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": image.data
                }
            }),
        })
        .collect();

    let mut body = json!({ "contents": [{ "parts": parts }] });

    match &request.format {
        ResponseFormat::Json(schema) => {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema.to_json()
            });
        }
        ResponseFormat::ImageAndText => {
            body["generationConfig"] = json!({
                "responseModalities": ["IMAGE", "TEXT"]
            });
        }
    }

    body
}

fn response_parts(body: &Value) -> Vec<Part> {
    body["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| {
                    if let Some(text) = part["text"].as_str() {
                        return Some(Part::Text(text.to_string()));
                    }
                    let inline = part.get("inlineData").or_else(|| part.get("inline_data"))?;
                    let data = inline["data"].as_str()?;
                    let mime_type = inline["mimeType"]
                        .as_str()
                        .or_else(|| inline["mime_type"].as_str())
                        .unwrap_or("image/png");
                    Some(Part::InlineData(EncodedImage {
                        data: data.to_string(),
                        mime_type: mime_type.to_string(),
                    }))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError> {
        // Google Gemini API endpoint
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            self.model_for(request)
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let response_body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(BackendError::Status {
                    status: status.as_u16(),
                    body: text,
                })
            }
            Err(e) => return Err(BackendError::Malformed(e)),
        };

        // Check for API error response
        if let Some(error) = response_body.get("error") {
            let code = error["code"].as_i64().unwrap_or(status.as_u16() as i64);
            let message = error["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(BackendError::Api { code, message });
        }

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parts = response_parts(&response_body);
        debug!(
            "Google Gemini returned {} part(s) from {}",
            parts.len(),
            self.model_for(request)
        );

        Ok(GenerateResponse { parts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::build_extraction_request;
    use crate::schema::recipe_schema;
    use mockito::{Matcher, Server};

    fn extraction_request() -> GenerateRequest {
        build_extraction_request(&[EncodedImage {
            data: "AAAA".to_string(),
            mime_type: "image/jpeg".to_string(),
        }])
    }

    #[tokio::test]
    async fn test_provider_name() {
        let config = BackendConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };

        let provider = GoogleProvider::new(&config).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }

    #[test]
    fn test_json_request_body() {
        let request = GenerateRequest {
            parts: vec![
                Part::InlineData(EncodedImage {
                    data: "AAAA".to_string(),
                    mime_type: "image/png".to_string(),
                }),
                Part::Text("Analyze".to_string()),
            ],
            format: ResponseFormat::Json(recipe_schema()),
        };

        let body = request_body(&request);
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["text"], "Analyze");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_image_request_body() {
        let request = GenerateRequest {
            parts: vec![Part::Text("A photo".to_string())],
            format: ResponseFormat::ImageAndText,
        };
        let body = request_body(&request);
        assert_eq!(
            body["generationConfig"]["responseModalities"],
            json!(["IMAGE", "TEXT"])
        );
        assert!(body["generationConfig"].get("responseSchema").is_none());
    }

    #[tokio::test]
    async fn test_generate_image_uses_image_model() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/v1beta/models/gemini-2.5-flash-image-preview:generateContent",
            )
            .match_query(Matcher::UrlEncoded("key".into(), "fake_api_key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "parts": [
                                {"text": "Here is your dish"},
                                {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                            ]
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let provider = GoogleProvider::with_base_url("fake_api_key".to_string(), server.url());
        let request = GenerateRequest {
            parts: vec![Part::Text("A photo".to_string())],
            format: ResponseFormat::ImageAndText,
        };

        let response = provider.generate(&request).await.unwrap();
        assert_eq!(
            response.image_data_url().unwrap(),
            "data:image/png;base64,iVBORw0KGgo="
        );
        assert_eq!(response.text().as_deref(), Some("Here is your dish"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"code": 400, "message": "API key not valid"}}"#)
            .create_async()
            .await;

        let provider = GoogleProvider::with_base_url("fake_api_key".to_string(), server.url());
        let result = provider.generate(&extraction_request()).await;

        match result {
            Err(BackendError::Api { code, message }) => {
                assert_eq!(code, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected API error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_non_json_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let provider = GoogleProvider::with_base_url("fake_api_key".to_string(), server.url());
        let result = provider.generate(&extraction_request()).await;
        assert!(matches!(
            result,
            Err(BackendError::Status { status: 503, .. })
        ));
    }
}
