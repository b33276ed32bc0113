// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `postsmith serve` command implementation.
//!
//! Builds the OpenAI and X adapters from configuration, wires them into the
//! publish workflow, and serves the gateway until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;
use postsmith_config::PostsmithConfig;
use postsmith_core::PostsmithError;
use postsmith_core::traits::{PluginAdapter, SocialAdapter};
use postsmith_gateway::{AuthGuard, GatewayState, HealthState, ServerConfig};
use postsmith_openai::OpenAiAdapter;
use postsmith_pipeline::{
    ImageGenerator, PublishWorkflow, Publisher, RateGate, TextGenerator, recording,
};
use postsmith_x::XAdapter;
use tracing::{debug, info, warn};

type RenderFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Runs the `postsmith serve` command.
pub async fn run_serve(config: PostsmithConfig) -> Result<(), PostsmithError> {
    info!(version = env!("CARGO_PKG_VERSION"), "starting postsmith serve");

    let prometheus_render = install_metrics(&config);

    // Both adapters fail here when credentials are missing.
    let openai = Arc::new(OpenAiAdapter::new(&config.openai)?);
    let x = Arc::new(XAdapter::new(&config.x)?);
    info!(
        model = openai.model(),
        image_model = %config.openai.image_model,
        "adapters initialized"
    );

    let gate = Arc::new(RateGate::from_config(&config.rate_limit));
    let publisher = Publisher::new(
        x.clone(),
        openai.clone(),
        gate,
        config.publish.clone(),
        &config.x.post_url_base,
    );
    let workflow = PublishWorkflow::new(
        TextGenerator::new(openai.clone()),
        ImageGenerator::new(openai.clone()),
        publisher,
    );

    let social: Arc<dyn SocialAdapter> = x.clone();
    let adapters: Vec<Arc<dyn PluginAdapter>> =
        vec![openai as Arc<dyn PluginAdapter>, x as Arc<dyn PluginAdapter>];
    let state = GatewayState {
        workflow,
        social,
        auth: AuthGuard::from_config(&config.auth),
        health: HealthState {
            start_time: Instant::now(),
            prometheus_render,
            adapters,
        },
    };

    postsmith_gateway::start_server(&ServerConfig::from(&config.server), state, shutdown_signal())
        .await?;

    info!("postsmith serve shutdown complete");
    Ok(())
}

/// Install the Prometheus recorder when enabled and return its render function.
fn install_metrics(config: &PostsmithConfig) -> Option<RenderFn> {
    if !config.metrics.enabled {
        debug!("prometheus metrics disabled by configuration");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            recording::register_metrics();
            info!("prometheus metrics recorder installed");
            Some(Arc::new(move || handle.render()))
        }
        Err(e) => {
            warn!(error = %e, "prometheus initialization failed, continuing without metrics");
            None
        }
    }
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("postsmith={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
