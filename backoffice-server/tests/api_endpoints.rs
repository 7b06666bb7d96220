//! HTTP API integration tests
//!
//! Calls the router directly through the oneshot extension, no network
//! listener involved.

mod common;

use axum::body::Body;
use backoffice_server::api::{self, OneshotRouter};
use backoffice_server::ServerState;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};

async fn send(state: &ServerState, request: Request<Body>) -> (StatusCode, Value) {
    let mut router = api::build_router();
    let response = router.oneshot(state, request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn request_body() -> Value {
    json!({
        "user_id": "user:guest-9",
        "order_type": "DINE_IN",
        "items": [{
            "product_id": "product:soup",
            "name": "Hot and Sour Soup",
            "quantity": 1,
            "unit_price": 6.5,
            "customizations": [],
            "addons": [],
            "line_total": 0.0
        }]
    })
}

#[tokio::test]
async fn test_health() {
    let state = common::test_state().await;
    let (status, body) = send(&state, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["restaurant_id"], common::RESTAURANT);
}

#[tokio::test]
async fn test_detailed_health_probes_database() {
    let state = common::test_state().await;
    let (status, body) = send(&state, get("/health/detailed")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_request_lifecycle_over_http() {
    let state = common::test_state().await;

    let (status, body) = send(&state, post("/api/order-requests", request_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "PENDING");

    let (status, body) = send(
        &state,
        post(&format!("/api/order-requests/{id}/confirm"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CONFIRMED");

    // Stale second confirm surfaces as not-found
    let (status, body) = send(
        &state,
        post(&format!("/api/order-requests/{id}/confirm"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4101);

    let (status, body) = send(
        &state,
        post(&format!("/api/order-requests/{id}/convert"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order_number = body["data"]["order_number"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "WAITING");

    let (status, body) = send(
        &state,
        get(&format!("/api/orders/by-number/{order_number}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_number"], order_number.as_str());
}

#[tokio::test]
async fn test_waiting_validation_over_http() {
    let state = common::test_state().await;

    let (_, body) = send(&state, post("/api/order-requests", request_body())).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Missing reason
    let (status, body) = send(
        &state,
        post(
            &format!("/api/order-requests/{id}/waiting"),
            json!({"waiting_time": 10}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4201);

    // Bad waiting time
    let reason_id = common::seed_reason(
        &state,
        backoffice_server::db::models::ReasonType::Waiting,
        "Full house",
    )
    .await;
    let (status, body) = send(
        &state,
        post(
            &format!("/api/order-requests/{id}/waiting"),
            json!({"reason_id": reason_id, "waiting_time": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4202);
}

#[tokio::test]
async fn test_next_statuses_endpoint() {
    let state = common::test_state().await;

    let (_, body) = send(&state, post("/api/order-requests", request_body())).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &state,
        get(&format!("/api/order-requests/{id}/next-statuses")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["PENDING", "CONFIRMED"]));
}

#[tokio::test]
async fn test_reason_catalog_crud() {
    let state = common::test_state().await;

    let (status, body) = send(
        &state,
        post(
            "/api/reasons",
            json!({"reason_type": "REJECTED", "text": "Item unavailable"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["is_active"], true);

    // Duplicate text for the same type conflicts
    let (status, body) = send(
        &state,
        post(
            "/api/reasons",
            json!({"reason_type": "REJECTED", "text": "Item unavailable"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7002);

    // Type filter
    let (_, body) = send(&state, get("/api/reasons?reason_type=REJECTED")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = send(&state, get("/api/reasons?reason_type=WAITING")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // Soft-deactivate keeps the record readable
    let (status, _) = send(
        &state,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/reasons/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&state, get(&format!("/api/reasons/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);
}

#[tokio::test]
async fn test_pagination_survives_huge_page_number() {
    let state = common::test_state().await;

    let (status, body) = send(
        &state,
        get("/api/orders?page=4294967295&per_page=100"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);

    let (status, body) = send(
        &state,
        get("/api/order-requests?page=4294967295&per_page=100"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_order_not_found() {
    let state = common::test_state().await;

    let (status, body) = send(&state, get("/api/orders/order:does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}
