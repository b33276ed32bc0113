// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a running `postsmith serve` instance.

use std::time::Duration;

use postsmith_config::PostsmithConfig;
use postsmith_config::model::AuthMode;
use postsmith_core::{AccountProfile, PostsmithError, PublishResult};
use serde::Deserialize;
use thiserror::Error;

/// Failures talking to the local server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach postsmith at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response; `message` is the server's error text.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<ClientError> for PostsmithError {
    fn from(e: ClientError) -> Self {
        PostsmithError::Internal(e.to_string())
    }
}

/// Success body of the publish routes.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishReply {
    pub message: String,
    #[serde(default)]
    pub tweet: Option<PublishResult>,
}

/// Either error shape the server returns.
#[derive(Debug, Deserialize)]
struct ErrorReply {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Talks to the gateway routes with the configured bearer token.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
    timeout: Duration,
}

impl GatewayClient {
    pub fn new(
        base_url: impl Into<String>,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PostsmithError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PostsmithError::Internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token,
            timeout,
        })
    }

    /// Client for the server described by `config`, or `server_url` when given.
    ///
    /// The server never cancels a publish, so the timeout must outlast its
    /// worst-case retry schedule or a timed-out post still goes out later.
    pub fn from_config(
        config: &PostsmithConfig,
        server_url: Option<&str>,
    ) -> Result<Self, PostsmithError> {
        let base_url = match server_url {
            Some(url) => url.to_string(),
            None => local_base_url(&config.server.host, config.server.port),
        };
        let bearer_token = match config.auth.mode {
            AuthMode::Bearer => config.auth.bearer_token.clone(),
            AuthMode::Disabled => None,
        };
        Self::new(
            base_url,
            bearer_token,
            Duration::from_secs(config.client_timeout_secs()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST to the text or image publish route.
    pub async fn publish(
        &self,
        instruction: &str,
        include_image: bool,
    ) -> Result<PublishReply, ClientError> {
        let path = if include_image {
            "/api/twitter/post-image"
        } else {
            "/api/twitter/post"
        };
        let request = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(&serde_json::json!({ "instruction": instruction }));
        self.send(request).await
    }

    /// GET the account profile.
    pub async fn profile(&self) -> Result<AccountProfile, ClientError> {
        let request = self.http.get(format!("{}/api/twitter/me", self.base_url));
        self.send(request).await
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        mut request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| ClientError::Unreachable {
            url: self.base_url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        response.json::<T>().await.map_err(|source| ClientError::Decode {
            url: self.base_url.clone(),
            source,
        })
    }
}

/// Loopback URL for a server bound to `host:port`.
fn local_base_url(host: &str, port: u16) -> String {
    let host = match host {
        "0.0.0.0" => "127.0.0.1",
        "::" => "[::1]",
        other => other,
    };
    format!("http://{host}:{port}")
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorReply>(body) {
        Ok(ErrorReply {
            error: Some(message),
            ..
        })
        | Ok(ErrorReply {
            message: Some(message),
            ..
        }) => message,
        _ if body.trim().is_empty() => "empty error response".to_string(),
        _ => body.trim().to_string(),
    }
}
