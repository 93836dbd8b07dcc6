//! # REST API Interface Layer
//!
//! Translates HTTP to service calls and back. Every response is a JSON
//! envelope with a `success` flag; failures carry an `error` message and
//! map to 400, 404 or 500 according to [`crate::domain::LedgerError`].
//! Extraction failures are answered with the same 400 envelope instead of
//! axum's plain-text rejections.

pub mod directory_apis;
pub mod expense_apis;
pub mod mappers;
pub mod response;

use axum::Json;
use shared::HealthResponse;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
