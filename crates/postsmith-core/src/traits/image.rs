// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image adapter trait for image generation and retrieval of hosted results.

use async_trait::async_trait;

use crate::error::PostsmithError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GeneratedImage, ImageRequest, MediaPayload};

/// Adapter for an image generation API.
#[async_trait]
pub trait ImageAdapter: PluginAdapter {
    /// Generates a single square image and returns its hosted URL.
    async fn generate(&self, request: ImageRequest) -> Result<GeneratedImage, PostsmithError>;

    /// Downloads the bytes behind a hosted image URL.
    async fn download(&self, image: &GeneratedImage) -> Result<MediaPayload, PostsmithError>;
}
