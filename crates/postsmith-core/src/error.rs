// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for postsmith.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across all postsmith adapters and the publish pipeline.
#[derive(Debug, Error)]
pub enum PostsmithError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid or missing caller input. Never reaches the publish step.
    #[error("{0}")]
    Validation(String),

    /// Text or image generation API failure.
    #[error("generation error: {message}")]
    Generation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The local rate gate denied the request.
    #[error("Rate limit exceeded. Please try again in {retry_after_secs} seconds.")]
    RateLimited { retry_after_secs: u64 },

    /// Post text exceeds the platform limit.
    #[error("Tweet exceeds maximum length of {max} characters (got {length})")]
    ContentTooLong { length: usize, max: usize },

    /// Raw failure reported by the social platform API.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Publishing failed after classification and retries.
    #[error("{message}")]
    PublishFailed { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PostsmithError {
    /// Shorthand for a generation error without an underlying source.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when the error reflects upstream rate limiting (HTTP 429 or code 429).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Upstream(e) if e.is_rate_limited())
    }

    /// Stable short name used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::Generation { .. } => "generation",
            Self::RateLimited { .. } => "rate_limited",
            Self::ContentTooLong { .. } => "content_too_long",
            Self::Upstream(_) => "upstream",
            Self::PublishFailed { .. } => "publish_failed",
            Self::Internal(_) => "internal",
        }
    }
}

/// Diagnostic context captured from a failed social platform call.
#[derive(Debug, Clone, Default, Error)]
#[error("{message}")]
pub struct UpstreamError {
    /// HTTP status code, if a response was received.
    pub status: Option<u16>,
    /// Platform-specific error code from the response body.
    pub code: Option<u16>,
    /// Human-readable error message.
    pub message: String,
    /// Raw response body.
    pub body: Option<String>,
    /// Value of the `x-rate-limit-remaining` header.
    pub rate_limit_remaining: Option<u32>,
    /// Time until the platform's rate limit window resets.
    pub reset_after: Option<Duration>,
}

impl UpstreamError {
    /// Creates an error carrying only a message (transport failures).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Returns true for HTTP 429 or a platform error code of 429.
    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(429) || self.code == Some(429)
    }
}
