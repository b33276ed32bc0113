// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock image adapter with scripted generation and download outcomes.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use postsmith_core::traits::{ImageAdapter, PluginAdapter};
use postsmith_core::types::{
    AdapterType, GeneratedImage, HealthStatus, ImageRequest, MediaPayload,
};
use postsmith_core::PostsmithError;

/// URL returned by [`MockImage`] when no generation result is queued.
pub const MOCK_IMAGE_URL: &str = "https://images.example/mock.png";

/// A mock image API.
///
/// `generate` pops scripted results and falls back to [`MOCK_IMAGE_URL`].
/// `download` returns a small PNG-typed payload unless a failure is queued.
#[derive(Clone, Default)]
pub struct MockImage {
    generate_results: Arc<Mutex<VecDeque<Result<GeneratedImage, PostsmithError>>>>,
    download_failures: Arc<Mutex<VecDeque<PostsmithError>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    downloads: Arc<Mutex<Vec<String>>>,
}

impl MockImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose next `generate` call fails.
    pub fn failing(error: PostsmithError) -> Self {
        Self {
            generate_results: Arc::new(Mutex::new(VecDeque::from([Err(error)]))),
            ..Self::default()
        }
    }

    /// Queue a failure for the next `download` call.
    pub async fn fail_next_download(&self, error: PostsmithError) {
        self.download_failures.lock().await.push_back(error);
    }

    /// Prompts passed to `generate`, in order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// URLs passed to `download`, in order.
    pub async fn downloads(&self) -> Vec<String> {
        self.downloads.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockImage {
    fn name(&self) -> &str {
        "mock-image"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Image
    }

    async fn health_check(&self) -> Result<HealthStatus, PostsmithError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ImageAdapter for MockImage {
    async fn generate(&self, request: ImageRequest) -> Result<GeneratedImage, PostsmithError> {
        self.prompts.lock().await.push(request.prompt);
        self.generate_results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Ok(GeneratedImage {
                    url: MOCK_IMAGE_URL.to_string(),
                })
            })
    }

    async fn download(&self, image: &GeneratedImage) -> Result<MediaPayload, PostsmithError> {
        self.downloads.lock().await.push(image.url.clone());
        if let Some(error) = self.download_failures.lock().await.pop_front() {
            return Err(error);
        }
        Ok(MediaPayload {
            bytes: vec![0x89, b'P', b'N', b'G'],
            mime_type: "image/png".to_string(),
        })
    }
}
