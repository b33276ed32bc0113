// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! postsmith - generate posts with OpenAI and publish them to X.
//!
//! This is the binary entry point: the HTTP server plus CLI clients for it.

mod client;
mod config_cmd;
mod profile;
mod publish;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use postsmith_config::PostsmithConfig;

/// postsmith - generate posts with OpenAI and publish them to X.
#[derive(Parser, Debug)]
#[command(name = "postsmith", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Generate and publish a post through a running server.
    Publish {
        /// What the post should be about.
        instruction: String,
        /// Generate and attach an image.
        #[arg(long)]
        image: bool,
        /// Print machine-readable output.
        #[arg(long)]
        json: bool,
        /// Server base URL (defaults to the configured host and port).
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },
    /// Show the account profile card (cached for an hour).
    Profile {
        /// Ignore the cache and fetch now.
        #[arg(long)]
        refresh: bool,
        /// Mask the displayed fields.
        #[arg(long)]
        private: bool,
        /// Print machine-readable output.
        #[arg(long)]
        json: bool,
        /// Server base URL (defaults to the configured host and port).
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration with secrets redacted.
    Show,
    /// Validate the configuration and exit.
    Check,
    /// List the files configuration is loaded from.
    Paths,
}

fn load_config(path: Option<&PathBuf>) -> PostsmithConfig {
    let loaded = match path {
        Some(path) => postsmith_config::load_and_validate_path(path),
        None => postsmith_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            postsmith_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Config {
        action: ConfigAction::Paths,
    }) = &cli.command
    {
        config_cmd::run_paths();
        return;
    }

    let config = load_config(cli.config.as_ref());

    let result = match cli.command {
        Some(Commands::Serve) => {
            serve::init_tracing(&config.logging.level);
            serve::run_serve(config).await
        }
        Some(Commands::Publish {
            instruction,
            image,
            json,
            server,
        }) => {
            serve::init_tracing("warn");
            publish::run_publish(&config, server.as_deref(), &instruction, image, json).await
        }
        Some(Commands::Profile {
            refresh,
            private,
            json,
            server,
        }) => {
            serve::init_tracing("warn");
            profile::run_profile(&config, server.as_deref(), refresh, private, json).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => config_cmd::run_show(&config),
            ConfigAction::Check => {
                config_cmd::run_check(&config);
                Ok(())
            }
            ConfigAction::Paths => Ok(()),
        },
        None => {
            println!("postsmith: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
