// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns Figment extraction failures into miette diagnostics.
//!
//! Unknown keys get a suggestion (known credential aliases first, then edit
//! distance) and, for the `[x]`, `[openai]` and `[auth]` sections, a reminder
//! of the environment variables that can supply the secret instead.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::loader::CREDENTIAL_VARS;

/// Minimum normalized Damerau-Levenshtein similarity for a suggestion.
const MIN_SIMILARITY: f64 = 0.6;

/// Names people carry over from the X developer portal and other tools,
/// scoped by section.
const KEY_ALIASES: &[(&str, &str, &str)] = &[
    ("x", "api_key", "consumer_key"),
    ("x", "api_secret", "consumer_secret"),
    ("x", "api_key_secret", "consumer_secret"),
    ("x", "access_secret", "access_token_secret"),
    ("openai", "key", "api_key"),
    ("openai", "token", "api_key"),
    ("auth", "token", "bearer_token"),
    ("auth", "secret", "bearer_token"),
    ("server", "timeout_secs", "request_timeout_secs"),
];

/// A configuration error ready for rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in [{section}]")]
    #[diagnostic(
        code(postsmith::config::unknown_key),
        help("{}", unknown_key_help(section, suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Table the key appeared in, `root` for top-level keys.
        section: String,
        suggestion: Option<String>,
        /// Comma-separated keys accepted in `section`.
        valid_keys: String,
        #[label("not a postsmith setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value could not be read as the expected type.
    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(postsmith::config::invalid_type), help("value came from {origin}"))]
    InvalidType {
        key: String,
        detail: String,
        /// File path or environment provider that supplied the value.
        origin: String,
        #[label("expected a different type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A semantic check in [`crate::validation`] failed.
    #[error("validation error: {message}")]
    #[diagnostic(code(postsmith::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(postsmith::config::other))]
    Other(String),
}

fn unknown_key_help(section: &str, suggestion: Option<&str>, valid_keys: &str) -> String {
    let mut help = match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    };
    if let Some(vars) = credential_env_vars(section) {
        help.push_str(&format!(
            "\n[{section}] secrets can also be supplied through {vars}"
        ));
    }
    help
}

/// Environment variables that populate secrets in `section`, if any.
pub fn credential_env_vars(section: &str) -> Option<String> {
    let prefix = format!("{section}.");
    let vars: Vec<&str> = CREDENTIAL_VARS
        .iter()
        .filter(|(_, target)| target.starts_with(&prefix))
        .map(|(name, _)| *name)
        .collect();
    (!vars.is_empty()).then(|| vars.join(", "))
}

/// Convert every error carried by a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` pairs each config file path with its contents so unknown
/// keys and bad values can be pointed at in the file.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let section = path.first().map(String::as_str);
                    let (span, src) = locate(&error, section, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        section: section.unwrap_or("root").to_string(),
                        suggestion: suggest_key(section, field, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::InvalidType(actual, expected) => {
                    let (section, field) = match path.split_last() {
                        Some((field, parents)) => {
                            (parents.first().map(String::as_str), field.as_str())
                        }
                        None => (None, ""),
                    };
                    let (span, src) = locate(&error, section, field, toml_sources);
                    ConfigError::InvalidType {
                        key: path.join("."),
                        detail: format!("found {actual}, expected {expected}"),
                        origin: origin(&error),
                        span,
                        src,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Human description of where the failing value was loaded from.
fn origin(error: &figment::error::Error) -> String {
    match error.metadata.as_ref() {
        Some(meta) => match &meta.source {
            Some(figment::Source::File(path)) => path.display().to_string(),
            _ => meta.name.to_string(),
        },
        None => "defaults".to_string(),
    }
}

/// Span of `field` in the TOML file the error came from.
fn locate(
    error: &figment::error::Error,
    section: Option<&str>,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some(figment::Source::File(file)) = error.metadata.as_ref().and_then(|m| m.source.as_ref())
    else {
        return (None, None);
    };
    let file = file.display().to_string();

    toml_sources
        .iter()
        .find(|(path, _)| *path == file)
        .and_then(|(path, content)| {
            find_key_offset(content, section, field).map(|offset| {
                (
                    Some(SourceSpan::new(offset.into(), field.len())),
                    Some(NamedSource::new(path, content.clone())),
                )
            })
        })
        .unwrap_or((None, None))
}

/// Byte offset of `field` as a key inside `[section]` (or before any table
/// header when `section` is `None`).
pub fn find_key_offset(content: &str, section: Option<&str>, field: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header.split(']').next().map(str::trim);
            continue;
        }
        if current != section {
            continue;
        }
        let Some(rest) = trimmed.strip_prefix(field) else {
            continue;
        };
        if rest.trim_start().starts_with('=') {
            return Some(start + (line.len() - trimmed.len()));
        }
    }

    None
}

/// Best replacement for an unrecognized key in `section`.
pub fn suggest_key(section: Option<&str>, unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let lowered = unknown.to_ascii_lowercase();

    let alias = KEY_ALIASES
        .iter()
        .find(|(s, from, to)| Some(*s) == section && *from == lowered && valid_keys.contains(to))
        .map(|(_, _, to)| (*to).to_string());
    if alias.is_some() {
        return alias;
    }

    valid_keys
        .iter()
        .map(|key| (*key, strsim::normalized_damerau_levenshtein(&lowered, key)))
        .filter(|(_, score)| *score >= MIN_SIMILARITY)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Print each error to stderr through miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}
