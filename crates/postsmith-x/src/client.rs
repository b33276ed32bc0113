// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the X API.
//!
//! Provides [`XClient`] which signs every request with OAuth 1.0a and turns
//! non-2xx responses into [`UpstreamError`]s carrying the status, platform
//! code, raw body and rate-limit headers.

use std::time::Duration;

use postsmith_core::{PostsmithError, UpstreamError};
use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::oauth::OAuthSigner;
use crate::types::{
    ApiErrorBody, CreateTweetRequest, CreateTweetResponse, CreatedTweet, MediaUploadResponse,
    TweetMedia, USER_FIELDS, UserData, UserResponse,
};

const RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";
const RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

/// HTTP client for X API communication.
#[derive(Debug, Clone)]
pub struct XClient {
    client: reqwest::Client,
    signer: OAuthSigner,
    api_base_url: String,
    upload_base_url: String,
}

impl XClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `signer` - OAuth 1.0a signer holding the four user-context keys
    /// * `api_base_url` - v2 API root, e.g. `https://api.twitter.com`
    /// * `upload_base_url` - media upload root, e.g. `https://upload.twitter.com`
    /// * `timeout` - Per-request timeout
    pub fn new(
        signer: OAuthSigner,
        api_base_url: &str,
        upload_base_url: &str,
        timeout: Duration,
    ) -> Result<Self, PostsmithError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("postsmith/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PostsmithError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            signer,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            upload_base_url: upload_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET /2/users/me` with profile fields and public metrics.
    pub async fn get_me(&self) -> Result<UserData, PostsmithError> {
        let url = format!("{}/2/users/me", self.api_base_url);
        let request = self.signed(Method::GET, &url, &[("user.fields", USER_FIELDS)])?;
        let response: UserResponse = self.execute(request, "users/me").await?;
        Ok(response.data)
    }

    /// `POST /2/tweets`, optionally attaching one uploaded media id.
    pub async fn create_tweet(
        &self,
        text: &str,
        media_id: Option<&str>,
    ) -> Result<CreatedTweet, PostsmithError> {
        let url = format!("{}/2/tweets", self.api_base_url);
        let body = CreateTweetRequest {
            text: text.to_string(),
            media: media_id.map(|id| TweetMedia {
                media_ids: vec![id.to_string()],
            }),
        };
        let request = self.signed(Method::POST, &url, &[])?.json(&body);
        let response: CreateTweetResponse = self.execute(request, "tweets").await?;
        Ok(response.data)
    }

    /// `POST /1.1/media/upload.json` as multipart with the bytes in field `media`.
    pub async fn upload_media(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> Result<String, PostsmithError> {
        let url = format!("{}/1.1/media/upload.json", self.upload_base_url);
        let part = Part::bytes(bytes)
            .file_name("media")
            .mime_str(mime_type)
            .map_err(|e| UpstreamError::new(format!("invalid media type `{mime_type}`: {e}")))?;
        let form = Form::new().part("media", part);

        let request = self.signed(Method::POST, &url, &[])?.multipart(form);
        let response: MediaUploadResponse = self.execute(request, "media/upload").await?;
        Ok(response.media_id_string)
    }

    /// Starts a request carrying the OAuth `Authorization` header.
    ///
    /// `query` is both signed and appended to the URL.
    fn signed(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder, PostsmithError> {
        let auth = self.signer.authorization_header(method.as_str(), url, query)?;
        let mut builder = self.client.request(method, url).header(AUTHORIZATION, auth);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        Ok(builder)
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<R, PostsmithError> {
        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::new(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let rate_limit_remaining = header_u64(response.headers(), RATE_LIMIT_REMAINING)
            .and_then(|v| u32::try_from(v).ok());
        let reset_after = header_u64(response.headers(), RATE_LIMIT_RESET)
            .map(|reset| reset_after_from_epoch(reset, chrono::Utc::now().timestamp()));
        debug!(status = %status, endpoint, ?rate_limit_remaining, "X API response received");

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::new(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let parsed = serde_json::from_str::<ApiErrorBody>(&body).unwrap_or_default();
            let message = parsed
                .message()
                .unwrap_or_else(|| format!("API returned {status}"));
            return Err(UpstreamError {
                status: Some(status.as_u16()),
                code: parsed.code(),
                message,
                body: Some(body),
                rate_limit_remaining,
                reset_after,
            }
            .into());
        }

        serde_json::from_str(&body).map_err(|e| {
            UpstreamError {
                status: Some(status.as_u16()),
                message: format!("failed to parse X API response: {e}"),
                body: Some(body.clone()),
                rate_limit_remaining,
                ..UpstreamError::default()
            }
            .into()
        })
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Time until an epoch-seconds reset instant. Instants in the past yield zero.
fn reset_after_from_epoch(reset_epoch: u64, now_epoch: i64) -> Duration {
    let now = u64::try_from(now_epoch).unwrap_or(0);
    Duration::from_secs(reset_epoch.saturating_sub(now))
}
