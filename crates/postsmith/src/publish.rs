// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `postsmith publish` command implementation.

use std::io::IsTerminal;

use postsmith_config::PostsmithConfig;
use postsmith_core::PostsmithError;
use serde::Serialize;

use crate::client::{ClientError, GatewayClient, PublishReply};

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct PublishOutput {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl PublishOutput {
    fn from_result(result: &Result<PublishReply, ClientError>) -> Self {
        match result {
            Ok(reply) => Self {
                ok: true,
                message: reply.message.clone(),
                url: reply.tweet.as_ref().map(|t| t.url.clone()),
                status: None,
            },
            Err(ClientError::Api { status, message }) => Self {
                ok: false,
                message: message.clone(),
                url: None,
                status: Some(*status),
            },
            Err(other) => Self {
                ok: false,
                message: other.to_string(),
                url: None,
                status: None,
            },
        }
    }
}

fn print_human(output: &PublishOutput, use_color: bool) {
    use colored::Colorize;

    if output.ok {
        let mark = if use_color { "✓".green().to_string() } else { "[OK]".to_string() };
        println!("{mark} {}", output.message);
        if let Some(url) = &output.url {
            println!("  {url}");
        }
    } else {
        let mark = if use_color { "✗".red().to_string() } else { "[FAIL]".to_string() };
        eprintln!("{mark} {}", output.message);
    }
}

/// Run the `postsmith publish` command against a running server.
pub async fn run_publish(
    config: &PostsmithConfig,
    server_url: Option<&str>,
    instruction: &str,
    image: bool,
    json: bool,
) -> Result<(), PostsmithError> {
    if instruction.trim().is_empty() {
        return Err(PostsmithError::Validation(
            "instruction must not be empty".to_string(),
        ));
    }

    let client = GatewayClient::from_config(config, server_url)?;
    tracing::debug!(
        server = client.base_url(),
        timeout_secs = client.timeout().as_secs(),
        image,
        "publishing"
    );
    let result = client.publish(instruction, image).await;
    let output = PublishOutput::from_result(&result);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print_human(&output, std::io::stdout().is_terminal());
    }

    match result {
        Ok(_) => Ok(()),
        Err(e) => Err(PostsmithError::PublishFailed {
            message: e.to_string(),
        }),
    }
}
