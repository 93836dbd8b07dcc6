//! End-to-end tests for the expense REST API.
//!
//! Each test builds the full router over a fresh in-memory database and
//! drives it with `oneshot` requests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use ledger_backend::storage::DbConnection;
use ledger_backend::{create_router, initialize_backend};

async fn create_test_app() -> axum::Router {
    let db = DbConnection::in_memory().await.expect("Failed to create test database");
    create_router(initialize_backend(db), "http://localhost:8080").expect("Failed to build router")
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(json!({}));

    (status, body)
}

struct Household {
    id: String,
    /// Alice, Bob, Carol in that order
    members: Vec<String>,
}

async fn seed_household(app: &axum::Router, tag: &str) -> Household {
    let (status, body) = send(app, "POST", "/api/households", Some(json!({ "name": format!("Flat {}", tag) }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let mut members = Vec::new();
    for name in ["Alice", "Bob", "Carol"] {
        let email = format!("{}.{}@example.com", name.to_lowercase(), tag);
        let (status, body) = send(app, "POST", "/api/users", Some(json!({ "name": name, "email": email }))).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        members.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    Household { id, members }
}

async fn create_expense(app: &axum::Router, household: &Household, amount: f64, description: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/expenses",
        Some(json!({
            "householdId": household.id,
            "creatorId": household.members[0],
            "amount": amount,
            "description": description,
            "memberIds": household.members,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"].clone()
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_create_dinner_expense() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/expenses",
        Some(json!({
            "householdId": household.id,
            "creatorId": household.members[0],
            "amount": 30,
            "description": "Dinner",
            "memberIds": household.members,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Expense created successfully"));

    let expense = &body["data"];
    assert_eq!(expense["category"], json!("OTHER"));
    assert_eq!(expense["splitType"], json!("EQUAL"));
    assert_eq!(expense["creator"]["name"], json!("Alice"));
    assert_eq!(expense["creator"]["email"], json!("alice.a@example.com"));

    let splits = expense["splits"].as_array().unwrap();
    assert_eq!(splits.len(), 3);
    for split in splits {
        assert_eq!(split["amountOwed"], json!(10.0));
        let is_creator = split["userId"] == json!(household.members[0]);
        assert_eq!(split["isPaid"], json!(is_creator));
        assert!(split["user"]["name"].is_string());
    }
}

#[tokio::test]
async fn test_create_with_category() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/expenses",
        Some(json!({
            "householdId": household.id,
            "creatorId": household.members[1],
            "amount": 10,
            "description": "Bus tickets",
            "category": "TRANSPORT",
            "memberIds": [household.members[0], household.members[2]],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["category"], json!("TRANSPORT"));
    let splits = body["data"]["splits"].as_array().unwrap();
    assert!(splits.iter().all(|s| s["isPaid"] == json!(false)));
    assert!(splits.iter().all(|s| s["amountOwed"] == json!(5.0)));
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;
    let valid = json!({
        "householdId": household.id,
        "creatorId": household.members[0],
        "amount": 12.5,
        "description": "Pizza",
        "memberIds": household.members,
    });

    let mut invalid_bodies = Vec::new();
    for field in ["householdId", "creatorId", "amount", "description", "memberIds"] {
        let mut body = valid.clone();
        body.as_object_mut().unwrap().remove(field);
        invalid_bodies.push(body);
    }
    let mut empty_members = valid.clone();
    empty_members["memberIds"] = json!([]);
    invalid_bodies.push(empty_members);
    let mut negative = valid.clone();
    negative["amount"] = json!(-4);
    invalid_bodies.push(negative);
    let mut unknown_category = valid.clone();
    unknown_category["category"] = json!("YACHTS");
    invalid_bodies.push(unknown_category);
    let mut extra_field = valid.clone();
    extra_field["splitType"] = json!("PERCENTAGE");
    invalid_bodies.push(extra_field);

    for body in invalid_bodies {
        let (status, response) = send(&app, "POST", "/api/expenses", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {} gave {}", body, response);
        assert_eq!(response["success"], json!(false));
        assert!(response["error"].is_string());
    }
}

#[tokio::test]
async fn test_create_with_malformed_json_is_bad_request() {
    let app = create_test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/expenses")
        .header("content-type", "application/json")
        .body(Body::from("{\"amount\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_for_unknown_creator_is_server_error_with_details() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/expenses",
        Some(json!({
            "householdId": household.id,
            "creatorId": "nobody",
            "amount": 5,
            "description": "Ghost",
            "memberIds": ["nobody"],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Failed to create expense"));
    assert!(body["details"].as_str().unwrap().contains("FOREIGN KEY"));

    let (_, listed) = send(&app, "GET", &format!("/api/expenses?householdId={}", household.id), None).await;
    assert_eq!(listed["count"], json!(0));
}

#[tokio::test]
async fn test_list_requires_household_id() {
    let app = create_test_app().await;

    let (status, body) = send(&app, "GET", "/api/expenses", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    let (status, _) = send(&app, "GET", "/api/expenses?householdId=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_by_household_newest_first() {
    let app = create_test_app().await;
    let ours = seed_household(&app, "a").await;
    let theirs = seed_household(&app, "b").await;

    let first = create_expense(&app, &ours, 10.0, "First").await;
    let second = create_expense(&app, &ours, 20.0, "Second").await;
    create_expense(&app, &theirs, 99.0, "Not ours").await;

    let (status, body) = send(&app, "GET", &format!("/api/expenses?householdId={}", ours.id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["count"], json!(2));
    let data = body["data"].as_array().unwrap();
    assert!(data.iter().all(|e| e["householdId"] == json!(ours.id)));
    assert_eq!(data[0]["id"], second["id"]);
    assert_eq!(data[1]["id"], first["id"]);
    assert!(data[0]["date"].as_str().unwrap() >= data[1]["date"].as_str().unwrap());
    assert_eq!(data[0]["splits"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_expense() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;
    let created = create_expense(&app, &household, 18.0, "Wine").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/expenses/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn test_missing_expense_is_not_found() {
    let app = create_test_app().await;

    let (status, body) = send(&app, "GET", "/api/expenses/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Expense not found" }));

    let (status, _) = send(&app, "PUT", "/api/expenses/missing", Some(json!({ "amount": 4 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/expenses/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_expense() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;
    let created = create_expense(&app, &household, 30.0, "Dinner").await;
    let uri = format!("/api/expenses/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "amount": 36, "category": "DINING" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Expense updated successfully"));
    assert_eq!(body["data"]["amount"], json!(36.0));
    assert_eq!(body["data"]["category"], json!("DINING"));
    assert_eq!(body["data"]["description"], json!("Dinner"));
    assert_eq!(body["data"]["splits"], created["splits"]);
}

#[tokio::test]
async fn test_update_with_no_fields_returns_unchanged_record() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;
    let created = create_expense(&app, &household, 30.0, "Dinner").await;
    let uri = format!("/api/expenses/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn test_update_without_body_returns_unchanged_record() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;
    let created = create_expense(&app, &household, 30.0, "Dinner").await;
    let uri = format!("/api/expenses/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, None).await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn test_update_with_malformed_json_is_bad_request() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;
    let created = create_expense(&app, &household, 30.0, "Dinner").await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/expenses/{}", created["id"].as_str().unwrap()))
        .header("content-type", "application/json")
        .body(Body::from("{\"amount\":"))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_undecodable_path_ids_get_the_error_envelope() {
    let app = create_test_app().await;

    for (method, uri) in [
        ("GET", "/api/expenses/%FF"),
        ("PUT", "/api/expenses/%FF"),
        ("DELETE", "/api/expenses/%FF"),
        ("PATCH", "/api/expenses/e1/splits/%FF/paid"),
        ("GET", "/api/households/%FF"),
        ("GET", "/api/users/%FF"),
    ] {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(body["success"], json!(false), "{} {}", method, uri);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request"), "{}", body);
    }
}

#[tokio::test]
async fn test_update_rejects_zero_amount_and_blank_description() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;
    let created = create_expense(&app, &household, 30.0, "Dinner").await;
    let uri = format!("/api/expenses/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, "PUT", &uri, Some(json!({ "amount": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", &uri, Some(json!({ "description": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn test_delete_removes_expense_and_splits() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;
    let created = create_expense(&app, &household, 30.0, "Dinner").await;
    let id = created["id"].as_str().unwrap();
    let split_id = created["splits"][1]["id"].as_str().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/expenses/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Expense deleted successfully" }));

    let (status, _) = send(&app, "GET", &format!("/api/expenses/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/expenses/{}/splits/{}/paid", id, split_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = send(&app, "GET", &format!("/api/expenses?householdId={}", household.id), None).await;
    assert_eq!(listed["count"], json!(0));
}

#[tokio::test]
async fn test_mark_split_paid_is_idempotent() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;
    let created = create_expense(&app, &household, 30.0, "Dinner").await;
    let id = created["id"].as_str().unwrap();
    let unpaid = created["splits"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["isPaid"] == json!(false))
        .unwrap();
    let uri = format!("/api/expenses/{}/splits/{}/paid", id, unpaid["id"].as_str().unwrap());

    for _ in 0..2 {
        let (status, body) = send(&app, "PATCH", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["isPaid"], json!(true));
        assert_eq!(body["data"]["userId"], unpaid["userId"]);
    }

    let (_, body) = send(&app, "GET", &format!("/api/expenses/{}", id), None).await;
    let paid_count = body["data"]["splits"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["isPaid"] == json!(true))
        .count();
    assert_eq!(paid_count, 2);
}

#[tokio::test]
async fn test_mark_unknown_split_is_not_found() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;
    let created = create_expense(&app, &household, 30.0, "Dinner").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, "PATCH", &format!("/api/expenses/{}/splits/missing/paid", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Expense split not found"));
}

#[tokio::test]
async fn test_directory_lookups() {
    let app = create_test_app().await;
    let household = seed_household(&app, "a").await;

    let (status, body) = send(&app, "GET", &format!("/api/households/{}", household.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Flat a"));

    let (status, body) = send(&app, "GET", &format!("/api/users/{}", household.members[1]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Bob"));

    let (status, _) = send(&app, "GET", "/api/users/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "name": "Alice again", "email": "alice.a@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already registered"));
}
