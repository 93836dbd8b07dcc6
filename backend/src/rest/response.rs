//! Envelope helpers and the mapping from [`LedgerError`] to HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{ApiErrorBody, ApiResponse};

use crate::domain::LedgerError;

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            LedgerError::Validation(message) => (StatusCode::BAD_REQUEST, ApiErrorBody::new(message)),
            LedgerError::NotFound(message) => (StatusCode::NOT_FOUND, ApiErrorBody::new(message)),
            LedgerError::Persistence {
                message,
                details: Some(details),
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody::with_details(message, details),
            ),
            LedgerError::Persistence { message, details: None } => {
                (StatusCode::INTERNAL_SERVER_ERROR, ApiErrorBody::new(message))
            }
        };
        (status, Json(body)).into_response()
    }
}

/// 400 for a request axum could not even extract (bad JSON, wrong types, unknown fields)
pub fn invalid_request(reason: String) -> Response {
    LedgerError::Validation(format!("Invalid request: {}", reason)).into_response()
}

pub fn ok<T: Serialize>(body: ApiResponse<T>) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

pub fn created<T: Serialize>(body: ApiResponse<T>) -> Response {
    (StatusCode::CREATED, Json(body)).into_response()
}
