//! Router-level tests against the in-process store.
//!
//! Each test builds the full router with `kasir_api::app` and drives it with
//! `tower::ServiceExt::oneshot`; no network or database is involved.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use kasir_api::services::{InMemoryStore, ManualClock};
use kasir_api::state::AppState;

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
}

impl TestApp {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).unwrap(),
        ));
        let state = AppState::new(
            Arc::new(InMemoryStore::new()),
            clock.clone(),
            chrono_tz::Tz::UTC,
        );
        Self {
            router: kasir_api::app(state),
            clock,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn create_product(&self, name: &str, price: i64, stock: i32) -> i64 {
        let (status, body) = self
            .post(
                "/api/products",
                json!({ "name": name, "price": price, "stock": stock }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    async fn stock(&self, id: i64) -> i64 {
        let (status, body) = self.get(&format!("/api/products/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        body["stock"].as_i64().unwrap()
    }
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));

    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_creates_transaction() {
    let app = TestApp::new();
    let kopi = app.create_product("Kopi", 1000, 10).await;

    let (status, body) = app
        .post(
            "/api/checkout",
            json!({ "items": [{ "product_id": kopi, "quantity": 3 }] }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["total"], 3000);
    assert_eq!(body["items"][0]["product_name"], "Kopi");
    assert_eq!(body["items"][0]["unit_price"], 1000);
    assert_eq!(body["items"][0]["subtotal"], 3000);
    assert_eq!(app.stock(kopi).await, 7);

    let id = body["id"].as_i64().unwrap();
    let (status, stored) = app.get(&format!("/api/transactions/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, body);
}

#[tokio::test]
async fn test_checkout_accepts_bare_array() {
    let app = TestApp::new();
    let teh = app.create_product("Teh", 500, 2).await;

    let (status, body) = app
        .post("/api/checkout", json!([{ "product_id": teh, "quantity": 2 }]))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(app.stock(teh).await, 0);
}

#[tokio::test]
async fn test_checkout_rejects_invalid_carts() {
    let app = TestApp::new();
    let kopi = app.create_product("Kopi", 1000, 10).await;

    let cases = [
        json!({ "items": [] }),
        json!({ "items": [{ "product_id": kopi, "quantity": 0 }] }),
        json!({ "items": [{ "product_id": kopi, "quantity": -2 }] }),
        json!({ "items": [
            { "product_id": kopi, "quantity": 1 },
            { "product_id": kopi, "quantity": 1 }
        ] }),
        json!({ "items": [{ "product_id": kopi }] }),
        json!({ "cart": "nope" }),
    ];

    for body in cases {
        let (status, response) = app.post("/api/checkout", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body} -> {response}");
        assert!(response["error"].is_string(), "{response}");
    }
    assert_eq!(app.stock(kopi).await, 10);
}

#[tokio::test]
async fn test_checkout_unknown_product_is_not_found() {
    let app = TestApp::new();
    let kopi = app.create_product("Kopi", 1000, 10).await;

    let (status, body) = app
        .post(
            "/api/checkout",
            json!({ "items": [
                { "product_id": kopi, "quantity": 1 },
                { "product_id": 999, "quantity": 1 }
            ] }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["product_id"], 999);
    assert_eq!(app.stock(kopi).await, 10);
}

#[tokio::test]
async fn test_checkout_insufficient_stock_is_conflict() {
    let app = TestApp::new();
    let kopi = app.create_product("Kopi", 1000, 2).await;

    let (status, body) = app
        .post(
            "/api/checkout",
            json!({ "items": [{ "product_id": kopi, "quantity": 3 }] }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["product_id"], kopi);
    assert_eq!(body["requested"], 3);
    assert_eq!(body["available"], 2);
    assert_eq!(app.stock(kopi).await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_checkouts_sell_exactly_the_stock() {
    let app = TestApp::new();
    let kopi = app.create_product("Kopi", 1000, 5).await;

    let attempts = (0..10).map(|_| {
        app.post(
            "/api/checkout",
            json!({ "items": [{ "product_id": kopi, "quantity": 1 }] }),
        )
    });
    let results = futures::future::join_all(attempts).await;

    let created = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    let conflicts = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CONFLICT)
        .count();

    assert_eq!((created, conflicts), (5, 5));
    assert_eq!(app.stock(kopi).await, 0);
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn test_report_over_explicit_range() {
    let app = TestApp::new();
    let kopi = app.create_product("Kopi", 1000, 10).await;
    let teh = app.create_product("Teh", 500, 10).await;

    app.post(
        "/api/checkout",
        json!({ "items": [
            { "product_id": kopi, "quantity": 2 },
            { "product_id": teh, "quantity": 1 }
        ] }),
    )
    .await;
    app.post(
        "/api/checkout",
        json!({ "items": [{ "product_id": teh, "quantity": 4 }] }),
    )
    .await;

    let (status, body) = app
        .get("/api/report?start=2026-04-01&end=2026-04-01")
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total_revenue"], 4500);
    assert_eq!(body["transaction_count"], 2);
    assert_eq!(body["top_product"]["product_id"], teh);
    assert_eq!(body["top_product"]["quantity_sold"], 5);
    assert_eq!(body["products"][0]["product_id"], teh);
    assert_eq!(body["products"][0]["revenue"], 2500);
    assert_eq!(body["timezone"], "UTC");
}

#[tokio::test]
async fn test_report_excludes_sales_outside_range() {
    let app = TestApp::new();
    let kopi = app.create_product("Kopi", 1000, 10).await;

    app.post(
        "/api/checkout",
        json!({ "items": [{ "product_id": kopi, "quantity": 1 }] }),
    )
    .await;
    app.clock.set(Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap());
    app.post(
        "/api/checkout",
        json!({ "items": [{ "product_id": kopi, "quantity": 2 }] }),
    )
    .await;

    let (_, day_one) = app
        .get("/api/report?start=2026-04-01&end=2026-04-01")
        .await;
    assert_eq!(day_one["total_revenue"], 1000);

    let (_, today) = app.get("/api/report/today").await;
    assert_eq!(today["total_revenue"], 2000);
    assert_eq!(today["transaction_count"], 1);

    let (_, both) = app
        .get("/api/report?start=2026-04-01T00:00:00Z&end=2026-04-03T00:00:00Z&breakdown=false")
        .await;
    assert_eq!(both["total_revenue"], 3000);
    assert!(both.get("products").is_none());
}

#[tokio::test]
async fn test_report_with_no_sales_is_zero() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/report/today").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_revenue"], 0);
    assert_eq!(body["transaction_count"], 0);
    assert_eq!(body["top_product"], Value::Null);
}

#[tokio::test]
async fn test_report_rejects_bad_ranges() {
    let app = TestApp::new();

    for uri in [
        "/api/report?start=2026-04-02&end=2026-04-01",
        "/api/report?start_date=2026-04-02T00:00:00Z&end_date=2026-04-01",
        "/api/report?start=2026-04-02T00:00:00Z&end=2026-04-01T23:00:00Z",
        "/api/report?start=2026-04-01",
        "/api/report?start=yesterday&end=today",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} -> {body}");
        assert!(body["error"].is_string());
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_product_crud() {
    let app = TestApp::new();

    let (status, category) = app
        .post("/api/categories", json!({ "name": "Minuman" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_i64().unwrap();

    let (status, product) = app
        .post(
            "/api/products",
            json!({ "name": " Es Jeruk ", "price": 8000, "stock": 4, "category_id": category_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["name"], "Es Jeruk");
    let id = product["id"].as_i64().unwrap();

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/api/products/{id}"),
            Some(json!({ "name": "Es Jeruk", "price": 9000, "stock": 12 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 9000);
    assert_eq!(updated["category_id"], Value::Null);

    let (status, listed) = app.get("/api/products?name=jeruk").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/products/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_product_validation() {
    let app = TestApp::new();

    let cases = [
        json!({ "name": "", "price": 100, "stock": 1 }),
        json!({ "name": "Roti", "price": -1, "stock": 1 }),
        json!({ "name": "Roti", "price": 100, "stock": -1 }),
        json!({ "name": "Roti", "price": 100, "stock": 1, "category_id": 42 }),
    ];

    for body in cases {
        let (status, response) = app.post("/api/products", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body} -> {response}");
    }

    let (status, _) = app.get("/api/products/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleted_product_keeps_sales_history() {
    let app = TestApp::new();
    let kopi = app.create_product("Kopi", 1000, 10).await;

    let (_, sale) = app
        .post(
            "/api/checkout",
            json!({ "items": [{ "product_id": kopi, "quantity": 1 }] }),
        )
        .await;
    app.send(Method::DELETE, &format!("/api/products/{kopi}"), None)
        .await;

    let (status, stored) = app
        .get(&format!("/api/transactions/{}", sale["id"]))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["items"][0]["product_name"], "Kopi");

    let (_, report) = app.get("/api/report/today").await;
    assert_eq!(report["total_revenue"], 1000);
}

#[tokio::test]
async fn test_legacy_route_aliases() {
    let app = TestApp::new();
    let (status, created) = app
        .post(
            "/api/produk",
            json!({ "name": "Teh", "price": 500, "stock": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = app.get("/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["id"], created["id"]);

    let (status, category) = app
        .post("/api/kategori", json!({ "name": "Minuman" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .get(&format!("/api/categories/{}", category["id"]))
        .await;
    assert_eq!(status, StatusCode::OK);

    app.post(
        "/api/checkout",
        json!([{ "product_id": created["id"], "quantity": 2 }]),
    )
    .await;
    let (status, report) = app.get("/api/report/hari-ini").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_revenue"], 1000);
    assert_eq!(report["transaction_count"], 1);
}
