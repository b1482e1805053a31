use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::schema::Violation;

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The body did not match the submission schema. Never a server fault.
    #[error("{} validation error(s)", .0.len())]
    Validation(Vec<Violation>),

    #[error("{0}")]
    Internal(String),
}

impl SubmitError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmitError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SubmitError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            SubmitError::Validation(violations) => {
                (status, Json(ErrorResponse { detail: violations })).into_response()
            }
            SubmitError::Internal(message) => {
                (status, Json(ErrorResponse { detail: message })).into_response()
            }
        }
    }
}
