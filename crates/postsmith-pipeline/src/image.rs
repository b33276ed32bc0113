// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image generation for a finished post text.

use std::sync::Arc;

use postsmith_core::PostsmithError;
use postsmith_core::traits::ImageAdapter;
use postsmith_core::types::{GeneratedImage, ImageRequest};
use tracing::{debug, error};

/// Image prompt derived from the post text.
pub fn image_prompt(post_text: &str) -> String {
    format!(
        "Create a visually stunning and viral image that perfectly complements this tweet: \"{post_text}\". Ensure the image is engaging and vibrant with modern design elements."
    )
}

/// Generates one image per post. Failures propagate.
#[derive(Clone)]
pub struct ImageGenerator {
    images: Arc<dyn ImageAdapter>,
}

impl ImageGenerator {
    pub fn new(images: Arc<dyn ImageAdapter>) -> Self {
        Self { images }
    }

    pub async fn generate(&self, post_text: &str) -> Result<GeneratedImage, PostsmithError> {
        let request = ImageRequest {
            prompt: image_prompt(post_text),
        };
        match self.images.generate(request).await {
            Ok(image) => {
                debug!(adapter = self.images.name(), "image generated");
                Ok(image)
            }
            Err(e) => {
                error!(error = %e, adapter = self.images.name(), "error generating image");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postsmith_test_utils::{MOCK_IMAGE_URL, MockImage};

    #[tokio::test]
    async fn prompt_quotes_post_text() {
        let mock = MockImage::new();
        let generator = ImageGenerator::new(Arc::new(mock.clone()));

        let image = generator.generate("We launched!").await.unwrap();
        assert_eq!(image.url, MOCK_IMAGE_URL);
        assert_eq!(
            mock.prompts().await,
            vec![
                "Create a visually stunning and viral image that perfectly complements this tweet: \"We launched!\". Ensure the image is engaging and vibrant with modern design elements."
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn failure_propagates() {
        let mock = MockImage::failing(PostsmithError::generation("content policy"));
        let generator = ImageGenerator::new(Arc::new(mock));
        let err = generator.generate("x").await.unwrap_err();
        assert_eq!(err.kind(), "generation");
    }
}
