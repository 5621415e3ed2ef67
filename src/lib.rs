pub mod api;
pub mod config;
pub mod core_state;
pub mod models;
pub mod pipeline;
pub mod scoring;
pub mod synth;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::ServerError;
use crate::config::ServiceConfig;
use crate::core_state::CoreState;

/// Install the global `tracing` subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Load the pipeline, serve until Ctrl-C, then drain and stop.
///
/// A missing or broken artifact does not abort startup: the server comes up
/// in degraded mode and `/predict_risk` answers with `MODEL_UNAVAILABLE`.
pub async fn run(config: ServiceConfig) -> Result<(), ServerError> {
    tracing::info!("{} starting v{}", crate::config::APP_NAME, crate::config::APP_VERSION);

    let core = Arc::new(CoreState::load(config.model_path));
    if !core.model_loaded() {
        tracing::warn!("Serving in degraded mode: predictions are disabled");
    }

    let server = api::start_risk_server(core, config.bind).await?;
    tracing::info!(
        session_id = %server.session.session_id,
        addr = %server.session.server_addr,
        "Listening"
    );

    tokio::signal::ctrl_c().await.map_err(ServerError::Signal)?;
    tracing::info!("Ctrl-C received, shutting down");

    server.stop().await
}
