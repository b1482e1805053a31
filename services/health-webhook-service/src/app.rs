use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::handlers::{health_data, health_data_schema, healthz, readyz};
use crate::state::AppState;

pub const HEALTH_DATA_PATH: &str = "/api/v1/webhook/health-data";
pub const HEALTH_DATA_SCHEMA_PATH: &str = "/api/v1/webhook/health-data/schema";

pub fn build_router(state: AppState, config: &ServiceConfig) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route(HEALTH_DATA_PATH, post(health_data))
        .route(HEALTH_DATA_SCHEMA_PATH, get(health_data_schema))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
