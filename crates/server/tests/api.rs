//! End-to-end API tests.
//!
//! Drives the full router through `tower::ServiceExt::oneshot` with the
//! in-memory catalog and the local object store, so no network or database
//! is required.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use vintly_core::ProfileId;
use vintly_server::catalog::{Catalog, MemoryCatalog};
use vintly_server::config::ServerConfig;
use vintly_server::enhance::Enhancer;
use vintly_server::objects::{LocalObjects, ObjectStore};
use vintly_server::seed;
use vintly_server::state::AppState;

// A 1x1 transparent PNG.
const TINY_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

const BASE_URL: &str = "http://localhost:3000";

/// Demo-mode application state over a temporary uploads directory.
fn demo_state(uploads: &tempfile::TempDir) -> AppState {
    let config = ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: BASE_URL.to_owned(),
        database_url: None,
        storage: None,
        replicate_token: None,
        uploads_dir: uploads.path().to_path_buf(),
    };
    AppState::new(
        config,
        Catalog::Memory(MemoryCatalog::new()),
        ObjectStore::Local(LocalObjects::new(uploads.path(), BASE_URL)),
        Enhancer::Demo,
    )
}

async fn send_json(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn valid_draft() -> Value {
    json!({
        "title": "Silk Scarf",
        "description": "Vintage carré, barely worn",
        "price": "120",
        "category": "accessories",
        "size": "One Size",
        "condition": "good",
        "brand": "Hermès",
        "color": "Orange",
        "shippingWeight": "small",
        "photos": [TINY_PNG],
    })
}

#[tokio::test]
async fn test_create_product_end_to_end() {
    let uploads = tempfile::tempdir().unwrap();
    let state = demo_state(&uploads);
    seed_profile(&state).await;
    let app = vintly_server::app(state);

    let (status, body) = send_json(app, "POST", "/api/products", Some(valid_draft())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let product = &body["product"];
    assert_eq!(product["title"], "Silk Scarf");
    assert_eq!(product["price"], "120");
    assert_eq!(product["status"], "available");
    assert_eq!(product["category"], "accessories");
    assert_eq!(product["size"], "ONE_SIZE");
    assert_eq!(product["condition"], "good");

    let images = product["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    let url = images[0]["url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:3000/uploads/"));
    assert_eq!(images[0]["order_index"], 0);
}

#[tokio::test]
async fn test_create_product_missing_title_is_rejected() {
    let uploads = tempfile::tempdir().unwrap();
    let state = demo_state(&uploads);
    seed_profile(&state).await;
    let catalog = state.catalog().clone();
    let app = vintly_server::app(state);

    let mut draft = valid_draft();
    draft.as_object_mut().unwrap().remove("title");
    let (status, body) = send_json(app, "POST", "/api/products", Some(draft)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");

    // No product row was created.
    let products = catalog
        .list(&vintly_server::catalog::ProductFilters::default())
        .await
        .unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_create_product_without_any_profile_fails_descriptively() {
    let uploads = tempfile::tempdir().unwrap();
    let app = vintly_server::app(demo_state(&uploads));

    let (status, body) = send_json(app, "POST", "/api/products", Some(valid_draft())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("No seller profile found")
    );
}

#[tokio::test]
async fn test_list_price_bounds() {
    let uploads = tempfile::tempdir().unwrap();
    let state = demo_state(&uploads);
    seed::seed(state.catalog()).await.unwrap();
    let app = vintly_server::app(state);

    let (status, body) = send_json(
        app,
        "GET",
        "/api/products?minPrice=1000&maxPrice=3000",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let products = body["products"].as_array().unwrap();
    let prices: Vec<&str> = products
        .iter()
        .map(|p| p["price"].as_str().unwrap())
        .collect();
    assert!(prices.contains(&"1290"));
    assert!(!prices.contains(&"595"));
    assert!(!prices.contains(&"4850"));
}

#[tokio::test]
async fn test_list_category_filter_and_all_sentinel() {
    let uploads = tempfile::tempdir().unwrap();
    let state = demo_state(&uploads);
    seed::seed(state.catalog()).await.unwrap();
    let app = vintly_server::app(state);

    let (_, filtered) = send_json(app.clone(), "GET", "/api/products?category=shoes", None).await;
    let shoes = filtered["products"].as_array().unwrap();
    assert_eq!(shoes.len(), 1);
    assert_eq!(shoes[0]["category"], "shoes");

    let (_, everything) = send_json(app, "GET", "/api/products?category=all", None).await;
    assert!(everything["products"].as_array().unwrap().len() > 1);
}

#[tokio::test]
async fn test_detail_returns_product_and_bumps_views() {
    let uploads = tempfile::tempdir().unwrap();
    let state = demo_state(&uploads);
    seed::seed(state.catalog()).await.unwrap();
    let catalog = state.catalog().clone();
    let app = vintly_server::app(state);

    let products = catalog
        .list(&vintly_server::catalog::ProductFilters::default())
        .await
        .unwrap();
    let id = products[0].id;

    let (status, body) = send_json(app, "GET", &format!("/api/products/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id));

    // The view counter is bumped off the response path.
    for _ in 0..100 {
        if catalog.get(id).await.unwrap().unwrap().views_count == 1 {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("view counter was never incremented");
}

#[tokio::test]
async fn test_detail_unknown_id_is_not_found() {
    let uploads = tempfile::tempdir().unwrap();
    let app = vintly_server::app(demo_state(&uploads));

    let (status, body) = send_json(
        app,
        "GET",
        "/api/products/7f3a5b9c-0000-4000-8000-000000000000",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn test_delete_is_scoped_to_owner() {
    let uploads = tempfile::tempdir().unwrap();
    let state = demo_state(&uploads);
    seed::seed(state.catalog()).await.unwrap();
    let catalog = state.catalog().clone();
    let app = vintly_server::app(state);

    let products = catalog
        .list(&vintly_server::catalog::ProductFilters::default())
        .await
        .unwrap();
    let id = products[0].id;
    let stranger = ProfileId::generate();

    // A different seller deletes nothing, and that is not an error.
    let (status, body) = send_json(
        app.clone(),
        "DELETE",
        &format!("/api/products/{id}?sellerId={stranger}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(catalog.get(id).await.unwrap().is_some());

    // The owner's delete removes the row.
    let owner = seed::DEMO_SELLER_UUID;
    let (status, _) = send_json(
        app,
        "DELETE",
        &format!("/api/products/{id}?sellerId={owner}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(catalog.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_enhance_photo_demo_mode() {
    let uploads = tempfile::tempdir().unwrap();
    let app = vintly_server::app(demo_state(&uploads));

    let (status, body) = send_json(
        app,
        "POST",
        "/api/enhance-photo",
        Some(json!({ "image": TINY_PNG })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["enhancedImage"], Value::Null);
    assert_eq!(body["demoMode"], json!(true));
    assert_eq!(body["transformations"]["brightness"], json!(1.1));
    assert_eq!(body["transformations"]["shadow"], json!(true));
    assert!(body["message"].as_str().unwrap().starts_with("Demo mode"));
}

#[tokio::test]
async fn test_enhance_photo_requires_image() {
    let uploads = tempfile::tempdir().unwrap();
    let app = vintly_server::app(demo_state(&uploads));

    let (status, body) = send_json(app, "POST", "/api/enhance-photo", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No image provided");
}

#[tokio::test]
async fn test_health_endpoints() {
    let uploads = tempfile::tempdir().unwrap();
    let app = vintly_server::app(demo_state(&uploads));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn seed_profile(state: &AppState) {
    state
        .catalog()
        .ensure_profile(ProfileId::new(seed::DEMO_SELLER_UUID), seed::DEMO_SELLER_USERNAME)
        .await
        .unwrap();
}
