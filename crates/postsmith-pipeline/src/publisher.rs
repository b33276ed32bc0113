// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publishing: rate gate, optional media upload, post creation, 429 retry.
//!
//! Only the text-only post step is retried, and only on upstream rate
//! limiting. Each retry sleeps for the platform's reset time plus one
//! second. The local gate is consulted once per publish, never per retry.

use std::sync::Arc;
use std::time::Duration;

use postsmith_config::model::PublishConfig;
use postsmith_core::traits::{ImageAdapter, SocialAdapter};
use postsmith_core::types::{GeneratedImage, MAX_POST_CHARS, MediaHandle, PublishResult, char_len};
use postsmith_core::PostsmithError;
use tracing::{debug, error, info, warn};

use crate::rate_gate::RateGate;
use crate::recording;

/// Creates posts on the social platform.
#[derive(Clone)]
pub struct Publisher {
    social: Arc<dyn SocialAdapter>,
    images: Arc<dyn ImageAdapter>,
    gate: Arc<RateGate>,
    config: PublishConfig,
    post_url_base: String,
}

impl Publisher {
    pub fn new(
        social: Arc<dyn SocialAdapter>,
        images: Arc<dyn ImageAdapter>,
        gate: Arc<RateGate>,
        config: PublishConfig,
        post_url_base: &str,
    ) -> Self {
        Self {
            social,
            images,
            gate,
            config,
            post_url_base: post_url_base.trim_end_matches('/').to_string(),
        }
    }

    /// Publish `text`, attaching the image behind `image` when present.
    ///
    /// Fails with `RateLimited`, `ContentTooLong`, or `PublishFailed`.
    pub async fn publish(
        &self,
        text: &str,
        image: Option<&GeneratedImage>,
    ) -> Result<PublishResult, PostsmithError> {
        if !self.gate.try_acquire() {
            let retry_after_secs = self.gate.seconds_remaining();
            warn!(retry_after_secs, "rate gate denied publish");
            recording::record_gate_denied();
            return Err(PostsmithError::RateLimited { retry_after_secs });
        }

        let length = char_len(text);
        if length > MAX_POST_CHARS {
            return Err(PostsmithError::ContentTooLong {
                length,
                max: MAX_POST_CHARS,
            });
        }

        match image {
            None => self.publish_text(text).await,
            Some(image) => self.publish_with_image(text, image).await,
        }
    }

    async fn publish_text(&self, text: &str) -> Result<PublishResult, PostsmithError> {
        let mut user_id = None;
        let mut retries = 0;
        loop {
            match self.post(text, None, &mut user_id).await {
                Ok(result) => {
                    info!(post_id = %result.id, retries, "post created");
                    return Ok(result);
                }
                Err(e) => {
                    log_upstream_failure(&e);
                    if e.is_rate_limited() && retries < self.config.max_retries {
                        let wait = self.retry_wait(&e);
                        retries += 1;
                        warn!(
                            attempt = retries,
                            max_retries = self.config.max_retries,
                            wait_secs = wait.as_secs(),
                            "upstream rate limit hit, waiting before retry"
                        );
                        recording::record_retry();
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    return Err(publish_failed(e));
                }
            }
        }
    }

    async fn publish_with_image(
        &self,
        text: &str,
        image: &GeneratedImage,
    ) -> Result<PublishResult, PostsmithError> {
        match self.upload_and_post(text, image).await {
            Ok(result) => {
                info!(post_id = %result.id, "post with media created");
                Ok(result)
            }
            Err(e) => {
                log_upstream_failure(&e);
                Err(publish_failed(e))
            }
        }
    }

    async fn upload_and_post(
        &self,
        text: &str,
        image: &GeneratedImage,
    ) -> Result<PublishResult, PostsmithError> {
        let payload = self.images.download(image).await?;
        debug!(bytes = payload.bytes.len(), mime_type = %payload.mime_type, "image fetched for upload");
        let handle = self.social.upload_media(payload).await?;
        tokio::time::sleep(Duration::from_secs(self.config.settle_delay_secs)).await;
        self.post(text, Some(&handle), &mut None).await
    }

    /// Post creation, looking the account id up only if `user_id` is empty.
    async fn post(
        &self,
        text: &str,
        media: Option<&MediaHandle>,
        user_id: &mut Option<String>,
    ) -> Result<PublishResult, PostsmithError> {
        let account = match user_id {
            Some(id) => id.clone(),
            None => {
                let id = self.social.me().await?.id;
                *user_id = Some(id.clone());
                id
            }
        };
        let post_id = self.social.create_post(text, media).await?;
        Ok(PublishResult {
            url: format!("{}/{}/status/{}", self.post_url_base, account, post_id.0),
            id: post_id.0,
        })
    }

    /// Platform reset time (default when unknown), capped, plus one second.
    fn retry_wait(&self, error: &PostsmithError) -> Duration {
        let reported = match error {
            PostsmithError::Upstream(upstream) => upstream.reset_after,
            _ => None,
        };
        let reset = reported
            .unwrap_or(Duration::from_secs(self.config.default_reset_secs))
            .min(Duration::from_secs(self.config.max_retry_wait_secs));
        reset + Duration::from_secs(1)
    }
}

fn publish_failed(error: PostsmithError) -> PostsmithError {
    let message = match &error {
        PostsmithError::Upstream(upstream) => upstream.message.clone(),
        other => other.to_string(),
    };
    PostsmithError::PublishFailed {
        message: format!("Failed to post tweet: {message}"),
    }
}

fn log_upstream_failure(error: &PostsmithError) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    match error {
        PostsmithError::Upstream(upstream) => error!(
            kind = error.kind(),
            message = %upstream.message,
            status = ?upstream.status,
            code = ?upstream.code,
            body = upstream.body.as_deref().unwrap_or(""),
            rate_limit_remaining = ?upstream.rate_limit_remaining,
            timestamp = %timestamp,
            "posting API call failed"
        ),
        other => error!(
            kind = other.kind(),
            message = %other,
            timestamp = %timestamp,
            "posting API call failed"
        ),
    }
}
