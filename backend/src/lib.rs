//! # Ledger Backend
//!
//! Shared-expense ledger for households: REST endpoints to record expenses,
//! split them equally among members, and mark individual shares as paid.
//!
//! ## Architecture
//!
//! ```text
//! REST layer (axum handlers, DTO mapping)
//!     ↓
//! Domain layer (validation, equal split, error taxonomy)
//!     ↓
//! Storage layer (traits + SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod rest;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::domain::{DirectoryService, ExpenseService};
use crate::storage::{DbConnection, SqliteDirectoryRepository, SqliteExpenseRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub expense_service: ExpenseService,
    pub directory_service: DirectoryService,
}

/// Wire the services onto an open database
pub fn initialize_backend(db: DbConnection) -> AppState {
    info!("Setting up domain services");
    let expense_service = ExpenseService::new(Arc::new(SqliteExpenseRepository::new(db.clone())));
    let directory_service = DirectoryService::new(Arc::new(SqliteDirectoryRepository::new(db)));

    AppState {
        expense_service,
        directory_service,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/expenses", rest::expense_apis::router())
        .nest("/households", rest::directory_apis::household_router())
        .nest("/users", rest::directory_apis::user_router());

    Ok(Router::new()
        .route("/health", get(rest::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
