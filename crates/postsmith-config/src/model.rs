// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for postsmith.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages. Credential
//! fields are redacted from `Debug` output.

use serde::{Deserialize, Serialize};

/// Top-level postsmith configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PostsmithConfig {
    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Request authentication for the publish and profile routes.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Completion and image generation API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Social platform (X) API settings.
    #[serde(default)]
    pub x: XConfig,

    /// Local fixed-window rate gate settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Publisher retry and settle settings.
    #[serde(default)]
    pub publish: PublishConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Prometheus metrics settings.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl PostsmithConfig {
    /// Longest time the server may spend on one publish request.
    ///
    /// Covers the completion, image generation and download calls, the media
    /// upload, settle delay, identity lookup, and every 429 retry of the post
    /// step at its capped wait.
    pub fn publish_budget_secs(&self) -> u64 {
        let publish = &self.publish;
        let openai_calls = 3 * self.openai.timeout_secs;
        let x_calls = (3 + u64::from(publish.max_retries)) * self.x.timeout_secs;
        let retry_waits =
            u64::from(publish.max_retries) * publish.max_retry_wait_secs.saturating_add(1);
        openai_calls
            .saturating_add(x_calls)
            .saturating_add(publish.settle_delay_secs)
            .saturating_add(retry_waits)
    }

    /// Timeout the CLI applies to requests against the server.
    pub fn client_timeout_secs(&self) -> u64 {
        self.server
            .request_timeout_secs
            .unwrap_or_else(|| self.publish_budget_secs())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind. `0` picks an ephemeral port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Client-side timeout used by the CLI when talking to the server.
    /// Unset means [`PostsmithConfig::publish_budget_secs`].
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Whether the bearer-token guard is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Requests are accepted without credentials.
    #[default]
    Disabled,
    /// Requests must carry `Authorization: Bearer <auth.bearer_token>`.
    Bearer,
}

/// Request authentication configuration.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Guard mode. Defaults to disabled.
    #[serde(default)]
    pub mode: AuthMode,

    /// Shared secret expected in the `Authorization` header. Falls back to
    /// the `TWITTER_POST_SECRET` environment variable.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("mode", &self.mode)
            .field("bearer_token", &redacted(&self.bearer_token))
            .finish()
    }
}

/// Completion and image API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` requires the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the API, without a trailing slash.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model used for post text generation.
    #[serde(default = "default_text_model")]
    pub model: String,

    /// Model used for image generation.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Requested image dimensions.
    #[serde(default = "default_image_size")]
    pub image_size: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_openai_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_text_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            timeout_secs: default_openai_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("image_model", &self.image_model)
            .field("image_size", &self.image_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_text_model() -> String {
    "o3-mini".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_openai_timeout_secs() -> u64 {
    120
}

/// Social platform (X) configuration.
///
/// The four OAuth 1.0a credentials fall back to `X_CONSUMER_KEY`,
/// `X_CONSUMER_SECRET`, `X_ACCESS_TOKEN`, and `X_ACCESS_TOKEN_SECRET`.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct XConfig {
    #[serde(default)]
    pub consumer_key: Option<String>,

    #[serde(default)]
    pub consumer_secret: Option<String>,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub access_token_secret: Option<String>,

    /// Base URL for the v2 API (identity lookup, post creation).
    #[serde(default = "default_x_api_base_url")]
    pub api_base_url: String,

    /// Base URL for the v1.1 media upload API.
    #[serde(default = "default_x_upload_base_url")]
    pub upload_base_url: String,

    /// Base URL used to build public post links.
    #[serde(default = "default_post_url_base")]
    pub post_url_base: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_x_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for XConfig {
    fn default() -> Self {
        Self {
            consumer_key: None,
            consumer_secret: None,
            access_token: None,
            access_token_secret: None,
            api_base_url: default_x_api_base_url(),
            upload_base_url: default_x_upload_base_url(),
            post_url_base: default_post_url_base(),
            timeout_secs: default_x_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for XConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XConfig")
            .field("consumer_key", &redacted(&self.consumer_key))
            .field("consumer_secret", &redacted(&self.consumer_secret))
            .field("access_token", &redacted(&self.access_token))
            .field("access_token_secret", &redacted(&self.access_token_secret))
            .field("api_base_url", &self.api_base_url)
            .field("upload_base_url", &self.upload_base_url)
            .field("post_url_base", &self.post_url_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_x_api_base_url() -> String {
    "https://api.twitter.com".to_string()
}

fn default_x_upload_base_url() -> String {
    "https://upload.twitter.com".to_string()
}

fn default_post_url_base() -> String {
    "https://twitter.com".to_string()
}

fn default_x_timeout_secs() -> u64 {
    30
}

/// Fixed-window rate gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Maximum publishes admitted per window.
    #[serde(default = "default_capacity")]
    pub capacity: u32,

    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_capacity() -> u32 {
    50
}

fn default_window_secs() -> u64 {
    900 // 15 minutes
}

/// Publisher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Maximum retries of the post step after an upstream 429.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between media upload and the post that references it.
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,

    /// Wait used when the platform does not report a reset time.
    #[serde(default = "default_reset_secs")]
    pub default_reset_secs: u64,

    /// Upper bound on a single retry wait.
    #[serde(default = "default_max_retry_wait_secs")]
    pub max_retry_wait_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            settle_delay_secs: default_settle_delay_secs(),
            default_reset_secs: default_reset_secs(),
            max_retry_wait_secs: default_max_retry_wait_secs(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_settle_delay_secs() -> u64 {
    5
}

fn default_reset_secs() -> u64 {
    60
}

fn default_max_retry_wait_secs() -> u64 {
    900
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Prometheus metrics configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default)]
    pub enabled: bool,
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "[redacted]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PostsmithConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.mode, AuthMode::Disabled);
        assert_eq!(config.openai.model, "o3-mini");
        assert_eq!(config.openai.image_size, "1024x1024");
        assert_eq!(config.rate_limit.capacity, 50);
        assert_eq!(config.rate_limit.window_secs, 900);
        assert_eq!(config.publish.max_retries, 3);
        assert_eq!(config.publish.settle_delay_secs, 5);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn publish_budget_covers_every_retry_wait() {
        let config = PostsmithConfig::default();
        // 3 retries at 900 s + 1 s each, before any call timeouts.
        assert!(config.publish_budget_secs() >= 3 * 901);
        assert_eq!(config.publish_budget_secs(), 360 + 180 + 5 + 2703);
    }

    #[test]
    fn client_timeout_defaults_to_publish_budget() {
        let mut config = PostsmithConfig::default();
        assert_eq!(config.client_timeout_secs(), config.publish_budget_secs());

        config.server.request_timeout_secs = Some(5000);
        assert_eq!(config.client_timeout_secs(), 5000);
    }

    #[test]
    fn auth_mode_parses_lowercase() {
        let config: PostsmithConfig = toml::from_str("[auth]\nmode = \"bearer\"\n").unwrap();
        assert_eq!(config.auth.mode, AuthMode::Bearer);
    }

    #[test]
    fn debug_redacts_credentials() {
        let mut config = PostsmithConfig::default();
        config.x.consumer_secret = Some("very-secret".into());
        config.openai.api_key = Some("sk-live-key".into());
        config.auth.bearer_token = Some("hunter2".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("sk-live-key"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[redacted]"));
    }
}
