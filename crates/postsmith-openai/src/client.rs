// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat completion and image generation APIs.
//!
//! Provides [`OpenAiClient`] which handles request construction, bearer
//! authentication, error envelope parsing, and hosted image download.

use std::time::Duration;

use postsmith_core::{MAX_IMAGE_BYTES, MediaPayload, PostsmithError};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{
    ApiErrorResponse, ChatRequest, ChatResponse, ImageGenerationRequest, ImageGenerationResponse,
};

/// MIME type assumed when a download response carries no `Content-Type`.
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// HTTP client for OpenAI API communication.
///
/// The API key is attached per request rather than as a default header, so
/// downloads from the hosted image URL never carry it.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key for bearer authentication
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, PostsmithError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("postsmith/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PostsmithError::Generation {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a chat completion request. Exactly one HTTP call, no retry.
    pub async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, PostsmithError> {
        self.post_json("/chat/completions", request).await
    }

    /// Sends an image generation request. Exactly one HTTP call, no retry.
    pub async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, PostsmithError> {
        self.post_json("/images/generations", request).await
    }

    /// Downloads a hosted image, reading its MIME type from `Content-Type`.
    ///
    /// Bodies over [`MAX_IMAGE_BYTES`] are rejected before they reach the
    /// upload step, whether or not the server announces a length.
    pub async fn download(&self, url: &str) -> Result<MediaPayload, PostsmithError> {
        let mut response = self.client.get(url).send().await.map_err(|e| PostsmithError::Generation {
            message: format!("image download failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PostsmithError::generation(format!(
                "image download returned {status}"
            )));
        }

        if let Some(length) = response.content_length()
            && length > MAX_IMAGE_BYTES as u64
        {
            return Err(image_too_large(length));
        }

        let mime_type = mime_from_header(response.headers().get(CONTENT_TYPE));

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| PostsmithError::Generation {
            message: format!("failed to read image body: {e}"),
            source: Some(Box::new(e)),
        })? {
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(image_too_large((bytes.len() + chunk.len()) as u64));
            }
            bytes.extend_from_slice(&chunk);
        }
        debug!(bytes = bytes.len(), mime_type = %mime_type, "image downloaded");

        Ok(MediaPayload { bytes, mime_type })
    }

    async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<R, PostsmithError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{endpoint}", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| PostsmithError::Generation {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, endpoint, "OpenAI response received");

        let text = response.text().await.map_err(|e| PostsmithError::Generation {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&text) {
                Ok(api_err) => format!(
                    "OpenAI API error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {text}"),
            };
            return Err(PostsmithError::generation(message));
        }

        serde_json::from_str(&text).map_err(|e| PostsmithError::Generation {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn image_too_large(length: u64) -> PostsmithError {
    PostsmithError::generation(format!(
        "image is {length} bytes, over the {MAX_IMAGE_BYTES} byte upload limit"
    ))
}

/// Media type from a `Content-Type` header, parameters stripped.
fn mime_from_header(value: Option<&HeaderValue>) -> String {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_string()
}
