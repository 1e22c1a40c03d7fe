mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower::ServiceExt;
use wallet_persona::server::{router, AppState};

use common::{engine, snapshot, FakeChain, MemoryStore, TEST_ADDRESS};

fn app_state(chain: Arc<FakeChain>, store: Arc<MemoryStore>) -> Arc<AppState> {
    Arc::new(AppState {
        engine: engine(chain.clone(), store.clone()),
        store,
        chain,
        narrative_configured: false,
        version: "0.1.0".to_string(),
    })
}

fn analyze_request(address: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "wallet_address": address }).to_string(),
        ))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn analyze_returns_report_for_active_wallet() {
    let chain = Arc::new(FakeChain::new(Some(snapshot("0", 600, 8, 5))));
    let store = Arc::new(MemoryStore::default());
    let app = router(app_state(chain, store));

    let response = app.oneshot(analyze_request(TEST_ADDRESS)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["persona"], "DeFi Degenerate");
    assert_eq!(body["risk_score"], 80);
    assert_eq!(body["metrics"]["totalValue"], "0.0000 ETH");
    assert_eq!(body["metrics"]["transactions"], 600);
    assert_eq!(body["metrics"]["protocols"], 8);
    assert!(body["timeline"].as_array().unwrap().len() == 3);
    assert!(body["badges"].as_array().unwrap().len() == 2);
}

#[tokio::test]
async fn malformed_address_is_a_400() {
    let chain = Arc::new(FakeChain::new(None));
    let store = Arc::new(MemoryStore::default());
    let app = router(app_state(chain, store));

    let response = app.oneshot(analyze_request("not-a-wallet")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid wallet address format");
}

#[tokio::test]
async fn footprintless_wallet_is_a_404() {
    let chain = Arc::new(FakeChain::new(None));
    let store = Arc::new(MemoryStore::default());
    let app = router(app_state(chain, store));

    let response = app.oneshot(analyze_request(TEST_ADDRESS)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No on-chain footprint found for this wallet");
}

#[tokio::test]
async fn critical_upstream_failure_is_a_500_with_generic_message() {
    let chain = Arc::new(FakeChain::new(None));
    chain.fail_fetch.store(true, Ordering::SeqCst);
    let store = Arc::new(MemoryStore::default());
    let app = router(app_state(chain, store));

    let response = app.oneshot(analyze_request(TEST_ADDRESS)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // No internal detail leaks to the caller.
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to analyze wallet. Please try again.");
}

#[tokio::test]
async fn wrong_method_is_a_405() {
    let chain = Arc::new(FakeChain::new(None));
    let store = Arc::new(MemoryStore::default());
    let app = router(app_state(chain, store));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/analyze")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_reports_connected_storage() {
    let chain = Arc::new(FakeChain::new(None));
    let store = Arc::new(MemoryStore::default());
    let app = router(app_state(chain, store));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["apis"]["etherscan"], "not_configured");
    assert_eq!(body["apis"]["gemini"], "not_configured");
    assert_eq!(body["version"], "0.1.0");
}

#[tokio::test]
async fn health_is_503_when_storage_is_down() {
    let chain = Arc::new(FakeChain::new(None));
    let store = Arc::new(MemoryStore::default());
    store.fail_ping.store(true, Ordering::SeqCst);
    let app = router(app_state(chain, store));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], "error");
}

#[tokio::test]
async fn preflight_is_answered_permissively() {
    let chain = Arc::new(FakeChain::new(None));
    let store = Arc::new(MemoryStore::default());
    let app = router(app_state(chain, store));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/analyze")
                .header(header::ORIGIN, "https://example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
}
