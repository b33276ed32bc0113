// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./postsmith.toml` > `~/.config/postsmith/postsmith.toml`
//! > `/etc/postsmith/postsmith.toml`, then the conventional credential
//! variables, then `POSTSMITH_` overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PostsmithConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/postsmith/postsmith.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "postsmith.toml";

/// Config sections addressable through `POSTSMITH_<SECTION>_<KEY>`.
///
/// `rate_limit` is listed before the single-word sections so its underscore
/// is not mistaken for a section separator.
const SECTIONS: &[&str] = &[
    "rate_limit",
    "server",
    "auth",
    "openai",
    "x",
    "publish",
    "logging",
    "metrics",
];

/// Conventional environment variable names and the keys they populate.
pub(crate) const CREDENTIAL_VARS: &[(&str, &str)] = &[
    ("X_CONSUMER_KEY", "x.consumer_key"),
    ("X_CONSUMER_SECRET", "x.consumer_secret"),
    ("X_ACCESS_TOKEN", "x.access_token"),
    ("X_ACCESS_TOKEN_SECRET", "x.access_token_secret"),
    ("OPENAI_API_KEY", "openai.api_key"),
    ("TWITTER_POST_SECRET", "auth.bearer_token"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
pub fn load_config() -> Result<PostsmithConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PostsmithConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostsmithConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PostsmithConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostsmithConfig::default()))
        .merge(Toml::file(path))
        .merge(credential_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading (exposed for diagnostic use).
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/postsmith/postsmith.toml`
/// 3. `~/.config/postsmith/postsmith.toml`
/// 4. `./postsmith.toml`
/// 5. `X_CONSUMER_KEY`, `OPENAI_API_KEY`, ... credential variables
/// 6. `POSTSMITH_*` environment variables
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PostsmithConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(credential_provider())
        .merge(env_provider())
}

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("postsmith").join("postsmith.toml"))
}

/// Maps the conventional credential variable names onto config keys.
fn credential_provider() -> Env {
    let names: Vec<&str> = CREDENTIAL_VARS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        let lowered = key.as_str().to_ascii_lowercase();
        CREDENTIAL_VARS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&lowered))
            .map(|(_, target)| (*target).to_string())
            .unwrap_or(lowered)
            .into()
    })
}

/// Create the `POSTSMITH_` provider using explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys containing
/// underscores survive: `POSTSMITH_X_ACCESS_TOKEN_SECRET` maps to
/// `x.access_token_secret`, not `x.access.token.secret`.
fn env_provider() -> Env {
    Env::prefixed("POSTSMITH_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Maps a lowercased, prefix-stripped env key to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            && !rest.is_empty()
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
