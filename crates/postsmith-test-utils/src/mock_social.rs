// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock social platform adapter that records posts and uploads.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use postsmith_core::traits::{PluginAdapter, SocialAdapter};
use postsmith_core::types::{
    AccountIdentity, AccountProfile, AdapterType, HealthStatus, MediaHandle, MediaPayload, PostId,
};
use postsmith_core::{PostsmithError, UpstreamError};

/// A post as received by [`MockSocial::create_post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub text: String,
    pub media: Option<MediaHandle>,
}

/// An upstream HTTP 429 as the platform client would report it.
pub fn rate_limited(reset_after: Option<Duration>) -> PostsmithError {
    UpstreamError {
        status: Some(429),
        message: "Too Many Requests".to_string(),
        body: Some(r#"{"title":"Too Many Requests","status":429}"#.to_string()),
        rate_limit_remaining: Some(0),
        reset_after,
        ..UpstreamError::default()
    }
    .into()
}

/// An upstream failure with the given status and message.
pub fn upstream_error(status: u16, message: &str) -> PostsmithError {
    UpstreamError {
        status: Some(status),
        message: message.to_string(),
        ..UpstreamError::default()
    }
    .into()
}

/// A mock social platform.
///
/// `create_post` pops scripted failures first; once the queue is empty it
/// succeeds with sequential ids starting at `1000`. Every call is recorded,
/// failed ones included.
#[derive(Clone)]
pub struct MockSocial {
    identity: AccountIdentity,
    profile: AccountProfile,
    post_failures: Arc<Mutex<VecDeque<PostsmithError>>>,
    me_failures: Arc<Mutex<VecDeque<PostsmithError>>>,
    upload_failures: Arc<Mutex<VecDeque<PostsmithError>>>,
    posts: Arc<Mutex<Vec<RecordedPost>>>,
    uploads: Arc<Mutex<Vec<MediaPayload>>>,
    me_calls: Arc<Mutex<usize>>,
    profile_calls: Arc<Mutex<usize>>,
}

impl Default for MockSocial {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSocial {
    /// Create a mock for account `42` / `@postsmith`.
    pub fn new() -> Self {
        Self {
            identity: AccountIdentity {
                id: "42".to_string(),
                username: "postsmith".to_string(),
                name: "Post Smith".to_string(),
            },
            profile: AccountProfile {
                username: "postsmith".to_string(),
                name: "Post Smith".to_string(),
                profile_image: Some("https://pbs.example/postsmith.jpg".to_string()),
                description: Some("Automated posts".to_string()),
                followers: Some(120),
                following: Some(7),
                tweets: Some(3400),
            },
            post_failures: Arc::default(),
            me_failures: Arc::default(),
            upload_failures: Arc::default(),
            posts: Arc::default(),
            uploads: Arc::default(),
            me_calls: Arc::default(),
            profile_calls: Arc::default(),
        }
    }

    /// Queue failures returned by the next `create_post` calls, in order.
    pub async fn fail_posts(&self, errors: impl IntoIterator<Item = PostsmithError>) {
        self.post_failures.lock().await.extend(errors);
    }

    /// Queue a failure for the next `me` or `profile` call.
    pub async fn fail_me(&self, error: PostsmithError) {
        self.me_failures.lock().await.push_back(error);
    }

    /// Queue a failure for the next `upload_media` call.
    pub async fn fail_upload(&self, error: PostsmithError) {
        self.upload_failures.lock().await.push_back(error);
    }

    /// Posts received so far, failed attempts included.
    pub async fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().await.clone()
    }

    /// Number of `create_post` calls received.
    pub async fn post_attempts(&self) -> usize {
        self.posts.lock().await.len()
    }

    /// Media payloads uploaded so far.
    pub async fn uploads(&self) -> Vec<MediaPayload> {
        self.uploads.lock().await.clone()
    }

    /// Number of `me` calls received.
    pub async fn me_calls(&self) -> usize {
        *self.me_calls.lock().await
    }

    /// Number of `profile` calls received.
    pub async fn profile_calls(&self) -> usize {
        *self.profile_calls.lock().await
    }

    /// Total calls that reached the platform.
    pub async fn total_calls(&self) -> usize {
        self.post_attempts().await
            + self.uploads.lock().await.len()
            + self.me_calls().await
            + self.profile_calls().await
    }
}

#[async_trait]
impl PluginAdapter for MockSocial {
    fn name(&self) -> &str {
        "mock-social"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Social
    }

    async fn health_check(&self) -> Result<HealthStatus, PostsmithError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SocialAdapter for MockSocial {
    async fn me(&self) -> Result<AccountIdentity, PostsmithError> {
        *self.me_calls.lock().await += 1;
        if let Some(error) = self.me_failures.lock().await.pop_front() {
            return Err(error);
        }
        Ok(self.identity.clone())
    }

    async fn profile(&self) -> Result<AccountProfile, PostsmithError> {
        *self.profile_calls.lock().await += 1;
        if let Some(error) = self.me_failures.lock().await.pop_front() {
            return Err(error);
        }
        Ok(self.profile.clone())
    }

    async fn upload_media(&self, media: MediaPayload) -> Result<MediaHandle, PostsmithError> {
        let mut uploads = self.uploads.lock().await;
        uploads.push(media);
        if let Some(error) = self.upload_failures.lock().await.pop_front() {
            return Err(error);
        }
        Ok(MediaHandle(format!("media-{}", uploads.len())))
    }

    async fn create_post(
        &self,
        text: &str,
        media: Option<&MediaHandle>,
    ) -> Result<PostId, PostsmithError> {
        let mut posts = self.posts.lock().await;
        posts.push(RecordedPost {
            text: text.to_string(),
            media: media.cloned(),
        });
        if let Some(error) = self.post_failures.lock().await.pop_front() {
            return Err(error);
        }
        Ok(PostId(format!("{}", 999 + posts.len())))
    }
}
