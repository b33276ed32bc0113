// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as a usable bind host, a bearer token when bearer auth is enabled,
//! and a rate gate that admits at least one request.

use crate::diagnostic::ConfigError;
use crate::model::{AuthMode, PostsmithConfig};

/// Accepted values for `logging.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `publish.max_retries`.
const MAX_RETRIES_LIMIT: u32 = 10;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PostsmithConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.auth.mode == AuthMode::Bearer
        && config
            .auth
            .bearer_token
            .as_deref()
            .is_none_or(|t| t.trim().is_empty())
    {
        errors.push(ConfigError::Validation {
            message: "auth.bearer_token must be set when auth.mode = \"bearer\" \
                      (or export TWITTER_POST_SECRET)"
                .to_string(),
        });
    }

    if config.rate_limit.capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "rate_limit.capacity must be at least 1".to_string(),
        });
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "rate_limit.window_secs must be at least 1".to_string(),
        });
    }

    if config.publish.max_retries > MAX_RETRIES_LIMIT {
        errors.push(ConfigError::Validation {
            message: format!(
                "publish.max_retries must be at most {MAX_RETRIES_LIMIT}, got {}",
                config.publish.max_retries
            ),
        });
    }

    if let Some(timeout) = config.server.request_timeout_secs {
        let budget = config.publish_budget_secs();
        if timeout < budget {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.request_timeout_secs ({timeout}) is shorter than the publish \
                     retry budget ({budget} s); the CLI would give up while the post is \
                     still pending"
                ),
            });
        }
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for (key, value) in [
        ("openai.base_url", &config.openai.base_url),
        ("openai.model", &config.openai.model),
        ("openai.image_model", &config.openai.image_model),
        ("openai.image_size", &config.openai.image_size),
        ("x.api_base_url", &config.x.api_base_url),
        ("x.upload_base_url", &config.x.upload_base_url),
        ("x.post_url_base", &config.x.post_url_base),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
