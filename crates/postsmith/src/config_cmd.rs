// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `postsmith config` subcommands.

use std::path::PathBuf;

use postsmith_config::PostsmithConfig;
use postsmith_config::loader::{LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH, user_config_path};
use postsmith_core::PostsmithError;

const REDACTED: &str = "[redacted]";

/// Config files in merge order (later files override earlier ones).
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(user) = user_config_path() {
        paths.push(user);
    }
    paths.push(PathBuf::from(LOCAL_CONFIG_PATH));
    paths
}

fn redact(value: &mut Option<String>) {
    if value.is_some() {
        *value = Some(REDACTED.to_string());
    }
}

/// Copy of `config` with every secret replaced.
pub fn redacted(config: &PostsmithConfig) -> PostsmithConfig {
    let mut config = config.clone();
    redact(&mut config.auth.bearer_token);
    redact(&mut config.openai.api_key);
    redact(&mut config.x.consumer_key);
    redact(&mut config.x.consumer_secret);
    redact(&mut config.x.access_token);
    redact(&mut config.x.access_token_secret);
    config
}

/// Print the effective configuration as TOML with secrets redacted.
pub fn run_show(config: &PostsmithConfig) -> Result<(), PostsmithError> {
    let rendered = toml::to_string_pretty(&redacted(config))
        .map_err(|e| PostsmithError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Report that the configuration validated.
pub fn run_check(config: &PostsmithConfig) {
    println!(
        "postsmith: configuration OK (listening on {}:{}, auth {:?})",
        config.server.host, config.server.port, config.auth.mode
    );
}

/// List the config search paths and whether each exists.
pub fn run_paths() {
    for path in search_paths() {
        let marker = if path.exists() { "found" } else { "missing" };
        println!("  {marker:<8} {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_replaces_only_present_secrets() {
        let mut config = PostsmithConfig::default();
        config.openai.api_key = Some("sk-live".into());
        config.x.access_token_secret = Some("tok".into());

        let shown = redacted(&config);
        assert_eq!(shown.openai.api_key.as_deref(), Some(REDACTED));
        assert_eq!(shown.x.access_token_secret.as_deref(), Some(REDACTED));
        assert!(shown.x.consumer_key.is_none());

        let toml = toml::to_string_pretty(&shown).unwrap();
        assert!(!toml.contains("sk-live"));
    }

    #[test]
    fn search_paths_end_with_local_file() {
        let paths = search_paths();
        assert_eq!(paths.first().unwrap(), &PathBuf::from(SYSTEM_CONFIG_PATH));
        assert_eq!(paths.last().unwrap(), &PathBuf::from(LOCAL_CONFIG_PATH));
    }
}
