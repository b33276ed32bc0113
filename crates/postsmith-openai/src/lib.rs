// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI adapter for postsmith.
//!
//! This crate implements [`CompletionAdapter`] over the chat completions API
//! and [`ImageAdapter`] over the image generations API, including download
//! of the hosted image bytes.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use postsmith_config::model::OpenAiConfig;
use postsmith_core::error::PostsmithError;
use postsmith_core::traits::{CompletionAdapter, ImageAdapter, PluginAdapter};
use postsmith_core::types::{
    AdapterType, CompletionRequest, GeneratedImage, HealthStatus, ImageRequest, MediaPayload,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest, ImageGenerationRequest};

/// OpenAI adapter implementing both [`CompletionAdapter`] and [`ImageAdapter`].
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    client: OpenAiClient,
    model: String,
    image_model: String,
    image_size: String,
}

impl OpenAiAdapter {
    /// Creates a new adapter from the `[openai]` config section.
    ///
    /// The API key must already be resolved into the config, either from
    /// `openai.api_key` or the `OPENAI_API_KEY` environment variable.
    pub fn new(config: &OpenAiConfig) -> Result<Self, PostsmithError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(
            model = config.model,
            image_model = config.image_model,
            "OpenAI adapter initialized"
        );

        Ok(Self {
            client,
            model: config.model.clone(),
            image_model: config.image_model.clone(),
            image_size: config.image_size.clone(),
        })
    }

    /// Returns the completion model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl PluginAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, PostsmithError> {
        // No probe request: every call to this API costs tokens.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionAdapter for OpenAiAdapter {
    async fn complete(&self, request: CompletionRequest) -> Result<String, PostsmithError> {
        let chat = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(request.system),
                ChatMessage::user(request.user),
            ],
        };

        let response = self.client.chat_completion(&chat).await?;
        debug!(id = ?response.id, choices = response.choices.len(), "completion received");

        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| PostsmithError::generation("completion returned no content"))
    }
}

#[async_trait]
impl ImageAdapter for OpenAiAdapter {
    async fn generate(&self, request: ImageRequest) -> Result<GeneratedImage, PostsmithError> {
        let body = ImageGenerationRequest {
            model: self.image_model.clone(),
            prompt: request.prompt,
            n: 1,
            size: self.image_size.clone(),
        };

        let response = self.client.generate_image(&body).await?;
        let url = response
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| PostsmithError::generation("image generation returned no URL"))?;

        debug!("image generated");
        Ok(GeneratedImage { url })
    }

    async fn download(&self, image: &GeneratedImage) -> Result<MediaPayload, PostsmithError> {
        self.client.download(&image.url).await
    }
}

/// Resolves the API key from config, rejecting missing or blank values.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, PostsmithError> {
    match config_key {
        Some(key) if !key.trim().is_empty() => Ok(key.clone()),
        _ => Err(PostsmithError::Config(
            "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
        )),
    }
}
