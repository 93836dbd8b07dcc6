//! # REST API for Households and Users
//!
//! Minimal registration and lookup so that expenses have something to
//! point at.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use super::mappers::DirectoryMapper;
use super::response::{created, invalid_request, ok};
use crate::AppState;
use shared::{ApiResponse, CreateHouseholdRequest, CreateUserRequest};

pub fn household_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_household))
        .route("/:id", get(get_household))
}

pub fn user_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/:id", get(get_user))
}

pub async fn create_household(
    State(state): State<AppState>,
    payload: Result<Json<CreateHouseholdRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    info!("POST /api/households - request: {:?}", request);

    match state.directory_service.create_household(request).await {
        Ok(household) => created(ApiResponse::with_message(
            "Household created successfully",
            DirectoryMapper::household_to_dto(household),
        )),
        Err(e) => e.into_response(),
    }
}

pub async fn get_household(State(state): State<AppState>, path: Result<Path<String>, PathRejection>) -> Response {
    let Path(id) = match path {
        Ok(path) => path,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    info!("GET /api/households/{}", id);

    match state.directory_service.get_household(&id).await {
        Ok(household) => ok(ApiResponse::data(DirectoryMapper::household_to_dto(household))),
        Err(e) => e.into_response(),
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    info!("POST /api/users - request: {:?}", request);

    match state.directory_service.create_user(request).await {
        Ok(user) => created(ApiResponse::with_message(
            "User created successfully",
            DirectoryMapper::user_to_dto(user),
        )),
        Err(e) => e.into_response(),
    }
}

pub async fn get_user(State(state): State<AppState>, path: Result<Path<String>, PathRejection>) -> Response {
    let Path(id) = match path {
        Ok(path) => path,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    info!("GET /api/users/{}", id);

    match state.directory_service.get_user(&id).await {
        Ok(user) => ok(ApiResponse::data(DirectoryMapper::user_to_dto(user))),
        Err(e) => e.into_response(),
    }
}
