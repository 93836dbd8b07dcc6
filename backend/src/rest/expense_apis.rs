//! # REST API for Expenses
//!
//! CRUD over household expenses plus marking a split as paid. Mounted at
//! `/api/expenses`.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use tracing::info;

use super::mappers::ExpenseMapper;
use super::response::{created, invalid_request, ok};
use crate::AppState;
use shared::{ApiResponse, CreateExpenseRequest, ExpenseListQuery, UpdateExpenseRequest};

/// Create a router for expense related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/:id", get(get_expense).put(update_expense).delete(delete_expense))
        .route("/:id/splits/:split_id/paid", patch(mark_split_paid))
}

/// List a household's expenses, newest first
pub async fn list_expenses(
    State(state): State<AppState>,
    query: Result<Query<ExpenseListQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    info!("GET /api/expenses - query: {:?}", query);

    match state.expense_service.list_expenses(query.household_id.as_deref()).await {
        Ok(expenses) => ok(ApiResponse::list(ExpenseMapper::to_dto_list(expenses))),
        Err(e) => e.into_response(),
    }
}

/// Get a single expense with its creator and splits
pub async fn get_expense(State(state): State<AppState>, path: Result<Path<String>, PathRejection>) -> Response {
    let Path(id) = match path {
        Ok(path) => path,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    info!("GET /api/expenses/{}", id);

    match state.expense_service.get_expense(&id).await {
        Ok(expense) => ok(ApiResponse::data(ExpenseMapper::to_dto(expense))),
        Err(e) => e.into_response(),
    }
}

/// Record a new expense split equally among `memberIds`
pub async fn create_expense(
    State(state): State<AppState>,
    payload: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    info!("POST /api/expenses - request: {:?}", request);

    match state.expense_service.create_expense(request).await {
        Ok(expense) => created(ApiResponse::with_message(
            "Expense created successfully",
            ExpenseMapper::to_dto(expense),
        )),
        Err(e) => e.into_response(),
    }
}

/// Update amount, description or category of an expense.
///
/// A missing or blank body counts as `{}` and leaves the record unchanged.
pub async fn update_expense(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let Path(id) = match path {
        Ok(path) => path,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    let request = match update_request_from_body(&body) {
        Ok(request) => request,
        Err(e) => return invalid_request(e.to_string()),
    };
    info!("PUT /api/expenses/{} - request: {:?}", id, request);

    match state.expense_service.update_expense(&id, request).await {
        Ok(expense) => ok(ApiResponse::with_message(
            "Expense updated successfully",
            ExpenseMapper::to_dto(expense),
        )),
        Err(e) => e.into_response(),
    }
}

fn update_request_from_body(body: &[u8]) -> serde_json::Result<UpdateExpenseRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UpdateExpenseRequest::default());
    }
    serde_json::from_slice(body)
}

/// Delete an expense and all of its splits
pub async fn delete_expense(State(state): State<AppState>, path: Result<Path<String>, PathRejection>) -> Response {
    let Path(id) = match path {
        Ok(path) => path,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    info!("DELETE /api/expenses/{}", id);

    match state.expense_service.delete_expense(&id).await {
        Ok(()) => ok(ApiResponse::<()>::message("Expense deleted successfully")),
        Err(e) => e.into_response(),
    }
}

/// Mark one split of an expense as paid
pub async fn mark_split_paid(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Response {
    let Path((id, split_id)) = match path {
        Ok(path) => path,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    info!("PATCH /api/expenses/{}/splits/{}/paid", id, split_id);

    match state.expense_service.mark_split_paid(&id, &split_id).await {
        Ok(split) => ok(ApiResponse::with_message(
            "Split marked as paid",
            ExpenseMapper::split_to_dto(split),
        )),
        Err(e) => e.into_response(),
    }
}
