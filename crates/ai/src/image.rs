//! Image-generation client (Ark/Seedream-style `images/generations`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AiError, AiResult};

/// Image generation regularly takes over a minute.
const IMAGE_TIMEOUT: Duration = Duration::from_secs(120);

/// Model used for album cover synthesis.
pub const COVER_MODEL: &str = "doubao-seedream-4-5-251128";

/// Seam over the image-generation endpoint.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Generate a single image from a prompt and a base64-data-URL source
    /// image, returning the hosted result URL.
    async fn generate(&self, prompt: &str, source_data_url: &str) -> AiResult<String>;
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

/// HTTP client for the `images/generations` endpoint.
#[derive(Clone)]
pub struct ImageClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ImageClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ImageModel for ImageClient {
    async fn generate(&self, prompt: &str, source_data_url: &str) -> AiResult<String> {
        if self.api_key.is_empty() {
            return Err(AiError::MissingApiKey("image model API key"));
        }

        // Single non-watermarked 2K image; the URL response format avoids
        // hauling image bytes back through this service.
        let body = json!({
            "model": COVER_MODEL,
            "prompt": prompt,
            "image": source_data_url,
            "response_format": "url",
            "size": "2k",
            "stream": false,
            "watermark": false,
            "sequential_image_generation": "disabled",
        });

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .timeout(IMAGE_TIMEOUT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AiError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerationResponse = serde_json::from_str(&text)
            .map_err(|_| AiError::MalformedResponse(format!("unexpected response shape: {text}")))?;

        match parsed.data.into_iter().next().and_then(|image| image.url) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(AiError::MalformedResponse(format!(
                "generation response carries no image URL: {text}"
            ))),
        }
    }
}
