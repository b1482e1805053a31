mod app;
mod config;
mod error;
mod handlers;
mod models;
mod receiver;
mod schema;
mod sink;
mod state;

use std::sync::Arc;

use petlog_common::{bind_listener, init_tracing, shutdown_signal};

use crate::config::ServiceConfig;
use crate::sink::TracingSink;
use crate::state::AppState;

const SERVICE_NAME: &str = "health-webhook-service";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let _guards = init_tracing(SERVICE_NAME);

    let config = ServiceConfig::from_env();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        max_body_bytes = config.max_body_bytes,
        "starting PetLog health webhook"
    );

    let state = AppState::new(Arc::new(TracingSink));
    let app = app::build_router(state, &config);
    let listener = bind_listener(&config.host, config.port).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
