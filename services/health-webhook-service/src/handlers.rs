use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::error::SubmitError;
use crate::models::Acknowledgment;
use crate::receiver::submit_health_data;
use crate::schema::HEALTH_SUBMISSION;
use crate::state::AppState;

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub async fn readyz() -> StatusCode {
    StatusCode::OK
}

pub async fn health_data(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Acknowledgment>, SubmitError> {
    submit_health_data(state.sink.as_ref(), &body).map(Json)
}

pub async fn health_data_schema() -> Json<Value> {
    Json(HEALTH_SUBMISSION.to_json_schema())
}
