//! Router-level tests: the JSON API driven end to end with `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use sandhai::api::{self, AppState};
use sandhai::clock::SimClock;
use sandhai::store::MarketStore;

/// Wednesday 2026-01-07: deterministic offers (no weekend, Summer season).
fn app() -> Router {
    let now = Utc.with_ymd_and_hms(2026, 1, 7, 10, 0, 0).unwrap();
    let clock = SimClock::at(now);
    let store = Arc::new(MarketStore::seeded(now));
    api::router(AppState::with_store(store, clock).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_service_name() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["service"], "sandhai");
}

#[tokio::test]
async fn login_is_a_mock_lookup_with_localized_greeting() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post("/api/v1/auth/login", json!({"email": "saravana@example.com", "password": "ignored"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["uid"], "ven1");
    assert_eq!(body["message"], "Welcome back, Saravana Snacks!");

    let response = app
        .clone()
        .oneshot(post("/api/v1/auth/login?locale=ta", json!({"email": "saravana@example.com"})))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["message"], "மீண்டும் வரவேற்கிறோம், Saravana Snacks!");

    let response = app
        .oneshot(post("/api/v1/auth/login", json!({"email": "nobody@example.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_rejects_duplicate_email() {
    let app = app();
    let details = json!({
        "name": "Mani Mess",
        "email": "saravana@example.com",
        "phone": "9840033001",
        "role": "vendor",
        "location": "Adyar, Chennai"
    });
    let response = app.oneshot(post("/api/v1/auth/signup", details)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn user_directory_lists_vendors_and_suppliers() {
    let response = app().oneshot(get("/api/v1/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 9);
    assert!(users.iter().any(|u| u["role"] == "vendor"));
    assert!(users.iter().any(|u| u["role"] == "supplier"));
}

#[tokio::test]
async fn products_filter_by_category_and_supplier() {
    let app = app();

    let response = app.clone().oneshot(get("/api/v1/products?category=Dairy")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 4);

    let response = app.oneshot(get("/api/v1/products?supplier_id=sup7")).await.unwrap();
    let body = body_json(response).await;
    assert!(body.as_array().unwrap().iter().all(|p| p["supplier_id"] == "sup7"));
}

#[tokio::test]
async fn offers_group_by_kind_with_priority_dedup() {
    let app = app();
    let response = app.oneshot(get("/api/v1/offers")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["season"], "Summer");

    let sections = body["sections"].as_array().unwrap();
    // A Wednesday in January: seasonal picks plus surplus-stock deals.
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["kind"], "seasonal");
    assert_eq!(sections[0]["title"], "Summer Picks");
    assert_eq!(sections[1]["kind"], "stock");

    // No product may appear under two kinds.
    let mut seen = std::collections::HashSet::new();
    for section in sections {
        for listing in section["listings"].as_array().unwrap() {
            assert!(seen.insert(listing["product"]["id"].as_str().unwrap().to_string()));
        }
    }
}

#[tokio::test]
async fn checkout_then_approval_then_time_travelled_delivery() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post("/api/v1/cart/ven1/items", json!({"product_id": "prod4", "quantity": 4})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Carrots added to your cart.");

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/checkout",
            json!({"vendor_id": "ven1", "delivery_location": "T. Nagar, Chennai", "payment_method": "COD"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let order_id = body["orders"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(body["orders"][0]["status"], "Pending");
    assert_eq!(body["orders"][0]["total_price"]["amount"], "180");

    // Checkout cleared the cart and reserved nothing yet.
    let cart = body_json(app.clone().oneshot(get("/api/v1/cart/ven1")).await.unwrap()).await;
    assert!(cart["lines"].as_array().unwrap().is_empty());
    let product = body_json(app.clone().oneshot(get("/api/v1/products/prod4")).await.unwrap()).await;
    assert_eq!(product["stock_kg"], "90");

    // Approval decrements stock; shipping starts the delivery window.
    let response = app
        .clone()
        .oneshot(post(&format!("/api/v1/orders/{order_id}/status"), json!({"status": "Packed"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let product = body_json(app.clone().oneshot(get("/api/v1/products/prod4")).await.unwrap()).await;
    assert_eq!(product["stock_kg"], "86");
    app.clone()
        .oneshot(post(&format!("/api/v1/orders/{order_id}/status"), json!({"status": "Shipped"})))
        .await
        .unwrap();

    // Three days of time travel cross the ETA; the listing settles it.
    let response = app
        .clone()
        .oneshot(post("/api/v1/time/advance", json!({"days": 3})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let orders = body_json(app.clone().oneshot(get("/api/v1/orders?vendor_id=ven1")).await.unwrap()).await;
    assert_eq!(orders[0]["status"], "Delivered");

    let stats = body_json(app.oneshot(get("/api/v1/dashboard/ven1")).await.unwrap()).await;
    assert_eq!(stats["completed"], 1);
}

#[tokio::test]
async fn failed_checkout_prunes_unavailable_lines() {
    let app = app();

    // 40 kg of Green Chillies against 30 kg of stock.
    app.clone()
        .oneshot(post("/api/v1/cart/ven2/items", json!({"product_id": "prod8", "quantity": 40})))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/checkout",
            json!({"vendor_id": "ven2", "delivery_location": "Mylapore", "payment_method": "Online"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Some items in your cart are no longer available and were removed.");

    let cart = body_json(app.oneshot(get("/api/v1/cart/ven2")).await.unwrap()).await;
    assert!(cart["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_transition_is_rejected_with_conflict() {
    let app = app();

    app.clone()
        .oneshot(post("/api/v1/cart/ven1/items", json!({"product_id": "prod1", "quantity": 2})))
        .await
        .unwrap();
    let body = body_json(
        app.clone()
            .oneshot(post(
                "/api/v1/checkout",
                json!({"vendor_id": "ven1", "delivery_location": "T. Nagar", "payment_method": "COD"}),
            ))
            .await
            .unwrap(),
    )
    .await;
    let order_id = body["orders"][0]["id"].as_str().unwrap().to_string();

    // Pending → Delivered is not in the table.
    let response = app
        .oneshot(post(&format!("/api/v1/orders/{order_id}/status"), json!({"status": "Delivered"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
