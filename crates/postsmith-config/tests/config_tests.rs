// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the postsmith configuration system.

use figment::Jail;
use postsmith_config::diagnostic::{ConfigError, suggest_key};
use postsmith_config::model::{AuthMode, PostsmithConfig};
use postsmith_config::{load_and_validate_str, load_config, load_config_from_str};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_postsmith_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[auth]
mode = "bearer"
bearer_token = "s3cret"

[openai]
api_key = "sk-test"
model = "gpt-4o-mini"

[x]
consumer_key = "ck"
consumer_secret = "cs"
access_token = "at"
access_token_secret = "ats"

[rate_limit]
capacity = 10
window_secs = 60

[publish]
max_retries = 2
settle_delay_secs = 1

[logging]
level = "debug"

[metrics]
enabled = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.auth.mode, AuthMode::Bearer);
    assert_eq!(config.auth.bearer_token.as_deref(), Some("s3cret"));
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert_eq!(config.openai.image_model, "dall-e-3");
    assert_eq!(config.x.access_token_secret.as_deref(), Some("ats"));
    assert_eq!(config.rate_limit.capacity, 10);
    assert_eq!(config.rate_limit.window_secs, 60);
    assert_eq!(config.publish.max_retries, 2);
    assert_eq!(config.publish.settle_delay_secs, 1);
    assert_eq!(config.publish.default_reset_secs, 60);
    assert_eq!(config.logging.level, "debug");
    assert!(config.metrics.enabled);
}

/// Missing sections fall back to defaults.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("[server]\nport = 4000\n").expect("should deserialize");
    assert_eq!(config.server.port, 4000);
    assert_eq!(config.rate_limit.capacity, 50);
    assert_eq!(config.rate_limit.window_secs, 900);
    assert_eq!(config.publish.max_retries, 3);
    assert_eq!(config.auth.mode, AuthMode::Disabled);
}

/// Unknown field in a section produces an error naming the key.
#[test]
fn unknown_field_in_server_produces_error() {
    let err = load_config_from_str("[server]\nprot = 1\n").expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("prot"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown top-level sections are rejected too.
#[test]
fn deny_unknown_fields_at_top_level() {
    let err = load_config_from_str("[twitter]\nkey = 1\n").expect_err("unknown section");
    assert!(format!("{err}").contains("twitter"));
}

/// Conventional credential variables populate the matching config keys.
#[test]
fn credential_env_vars_populate_secrets() {
    Jail::expect_with(|jail| {
        jail.set_env("X_CONSUMER_KEY", "ck-env");
        jail.set_env("X_CONSUMER_SECRET", "cs-env");
        jail.set_env("X_ACCESS_TOKEN", "at-env");
        jail.set_env("X_ACCESS_TOKEN_SECRET", "ats-env");
        jail.set_env("OPENAI_API_KEY", "sk-env");
        jail.set_env("TWITTER_POST_SECRET", "bearer-env");

        let config = load_config().map_err(|e| e.to_string())?;
        assert_eq!(config.x.consumer_key.as_deref(), Some("ck-env"));
        assert_eq!(config.x.consumer_secret.as_deref(), Some("cs-env"));
        assert_eq!(config.x.access_token.as_deref(), Some("at-env"));
        assert_eq!(config.x.access_token_secret.as_deref(), Some("ats-env"));
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.auth.bearer_token.as_deref(), Some("bearer-env"));
        Ok(())
    });
}

/// `POSTSMITH_` variables override the local file, including underscore keys.
#[test]
fn prefixed_env_overrides_local_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "postsmith.toml",
            "[server]\nport = 4000\n\n[publish]\nmax_retries = 1\n",
        )?;
        jail.set_env("POSTSMITH_SERVER_PORT", "5000");
        jail.set_env("POSTSMITH_PUBLISH_MAX_RETRIES", "2");
        jail.set_env("POSTSMITH_RATE_LIMIT_CAPACITY", "7");
        jail.set_env("POSTSMITH_X_ACCESS_TOKEN_SECRET", "from-prefix");

        let config = load_config().map_err(|e| e.to_string())?;
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.publish.max_retries, 2);
        assert_eq!(config.rate_limit.capacity, 7);
        assert_eq!(config.x.access_token_secret.as_deref(), Some("from-prefix"));
        Ok(())
    });
}

/// Prefixed variables win over the conventional credential names.
#[test]
fn prefixed_env_wins_over_credential_env() {
    Jail::expect_with(|jail| {
        jail.set_env("OPENAI_API_KEY", "conventional");
        jail.set_env("POSTSMITH_OPENAI_API_KEY", "prefixed");

        let config = load_config().map_err(|e| e.to_string())?;
        assert_eq!(config.openai.api_key.as_deref(), Some("prefixed"));
        Ok(())
    });
}

/// Serialized defaults provide sensible values for all required fields.
#[test]
fn serialized_defaults_are_sensible() {
    let config = PostsmithConfig::default();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.openai.model, "o3-mini");
    assert_eq!(config.openai.image_size, "1024x1024");
    assert_eq!(config.x.api_base_url, "https://api.twitter.com");
    assert_eq!(config.publish.settle_delay_secs, 5);
    assert!(config.x.consumer_key.is_none());
    assert!(!config.metrics.enabled);
}

#[test]
fn diagnostic_prot_suggests_port() {
    let valid = &["host", "port", "request_timeout_secs"];
    assert_eq!(suggest_key(Some("server"), "prot", valid), Some("port".to_string()));
}

/// Portal-style credential names in [x] point at the OAuth keys and the env vars.
#[test]
fn diagnostic_x_alias_names_credential_env_vars() {
    let errors = load_and_validate_str("[x]\napi_key = \"ck\"\n")
        .expect_err("api_key is not an [x] key");
    let error = errors
        .iter()
        .find(|e| matches!(e, ConfigError::UnknownKey { .. }))
        .expect("unknown key error");

    use miette::Diagnostic;
    let help = error.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("did you mean `consumer_key`"), "got: {help}");
    assert!(help.contains("X_CONSUMER_KEY"), "got: {help}");
}

/// Figment errors converted through the diagnostic bridge carry the bad key.
#[test]
fn diagnostic_error_includes_unknown_key() {
    let errors = load_and_validate_str("[rate_limit]\ncapacty = 3\n")
        .expect_err("unknown key should fail");
    let found = errors.iter().any(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => key == "capacty" && suggestion.as_deref() == Some("capacity"),
        _ => false,
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

/// Wrong value types surface as InvalidType diagnostics.
#[test]
fn diagnostic_invalid_type_message() {
    let errors =
        load_and_validate_str("[server]\nport = \"eighty\"\n").expect_err("type mismatch");
    let msg = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    assert!(
        msg.contains("invalid type") || msg.contains("port"),
        "error should mention type mismatch, got: {msg}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "prot".to_string(),
        section: "server".to_string(),
        suggestion: Some("port".to_string()),
        valid_keys: "host, port, request_timeout_secs".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some(), "should have diagnostic code");
    let help = error.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("did you mean `port`"), "got: {help}");

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("prot"), "rendered report should mention the key");
}

/// Bearer auth without a token fails validation with an actionable message.
#[test]
fn bearer_without_token_fails_validation() {
    let errors = load_and_validate_str("[auth]\nmode = \"bearer\"\n")
        .expect_err("bearer mode needs a token");
    let has_error = errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("bearer_token"))
    });
    assert!(has_error, "got: {errors:?}");
}

/// load_and_validate_str with valid TOML returns Ok config.
#[test]
fn load_and_validate_valid_toml() {
    let config = load_and_validate_str("[logging]\nlevel = \"warn\"\n").expect("should validate");
    assert_eq!(config.logging.level, "warn");
}
