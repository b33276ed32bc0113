// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! X (Twitter) social adapter for postsmith.
//!
//! This crate implements [`SocialAdapter`] over the X API v2 (`/2/users/me`,
//! `/2/tweets`) and the v1.1 media upload endpoint, with every request
//! signed using OAuth 1.0a user context.

pub mod client;
pub mod oauth;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use postsmith_config::model::XConfig;
use postsmith_core::error::PostsmithError;
use postsmith_core::traits::{PluginAdapter, SocialAdapter};
use postsmith_core::types::{
    AccountIdentity, AccountProfile, AdapterType, HealthStatus, MediaHandle, MediaPayload, PostId,
};
use tracing::{debug, info};

use crate::client::XClient;
use crate::oauth::{OAuthCredentials, OAuthSigner};
use crate::types::UserData;

/// X platform adapter implementing [`SocialAdapter`].
#[derive(Debug, Clone)]
pub struct XAdapter {
    client: XClient,
}

impl XAdapter {
    /// Creates a new adapter from the `[x]` config section.
    ///
    /// All four OAuth keys are required; the error names every missing one.
    pub fn new(config: &XConfig) -> Result<Self, PostsmithError> {
        let credentials = resolve_credentials(config)?;
        let client = XClient::new(
            OAuthSigner::new(credentials),
            &config.api_base_url,
            &config.upload_base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(api = config.api_base_url, "X adapter initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for XAdapter {
    fn name(&self) -> &str {
        "x"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Social
    }

    async fn health_check(&self) -> Result<HealthStatus, PostsmithError> {
        // `users/me` counts against the platform's rate limit, so no probe.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SocialAdapter for XAdapter {
    async fn me(&self) -> Result<AccountIdentity, PostsmithError> {
        let user = self.client.get_me().await?;
        Ok(AccountIdentity {
            id: user.id,
            username: user.username,
            name: user.name,
        })
    }

    async fn profile(&self) -> Result<AccountProfile, PostsmithError> {
        let user = self.client.get_me().await?;
        Ok(project_profile(user))
    }

    async fn upload_media(&self, media: MediaPayload) -> Result<MediaHandle, PostsmithError> {
        let size = media.bytes.len();
        let id = self.client.upload_media(media.bytes, &media.mime_type).await?;
        debug!(media_id = %id, size, "media uploaded");
        Ok(MediaHandle(id))
    }

    async fn create_post(
        &self,
        text: &str,
        media: Option<&MediaHandle>,
    ) -> Result<PostId, PostsmithError> {
        let tweet = self
            .client
            .create_tweet(text, media.map(|m| m.0.as_str()))
            .await?;
        debug!(post_id = %tweet.id, "post created");
        Ok(PostId(tweet.id))
    }
}

/// Projects the user lookup onto the public profile fields.
fn project_profile(user: UserData) -> AccountProfile {
    let metrics = user.public_metrics;
    AccountProfile {
        username: user.username,
        name: user.name,
        profile_image: user.profile_image_url,
        description: user.description,
        followers: metrics.as_ref().map(|m| m.followers_count),
        following: metrics.as_ref().map(|m| m.following_count),
        tweets: metrics.as_ref().map(|m| m.tweet_count),
    }
}

fn resolve_credentials(config: &XConfig) -> Result<OAuthCredentials, PostsmithError> {
    let fields = [
        ("x.consumer_key", "X_CONSUMER_KEY", &config.consumer_key),
        ("x.consumer_secret", "X_CONSUMER_SECRET", &config.consumer_secret),
        ("x.access_token", "X_ACCESS_TOKEN", &config.access_token),
        (
            "x.access_token_secret",
            "X_ACCESS_TOKEN_SECRET",
            &config.access_token_secret,
        ),
    ];

    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, _, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(key, env, _)| format!("{key} ({env})"))
        .collect();
    if !missing.is_empty() {
        return Err(PostsmithError::Config(format!(
            "X API credentials missing: {}",
            missing.join(", ")
        )));
    }

    let value = |v: &Option<String>| v.clone().unwrap_or_default();
    Ok(OAuthCredentials {
        consumer_key: value(&config.consumer_key),
        consumer_secret: value(&config.consumer_secret),
        access_token: value(&config.access_token),
        access_token_secret: value(&config.access_token_secret),
    })
}
