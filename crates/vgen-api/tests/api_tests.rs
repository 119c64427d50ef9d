//! API integration tests.
//!
//! The provider is replaced by a wiremock server; requests go through the
//! full router with `oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vgen_api::{create_router, ApiConfig, AppState};
use vgen_provider::{ProviderClient, ProviderConfig};

/// Router wired to `server`, with or without a credential.
fn router_for(server: &MockServer, api_key: Option<&str>) -> Router {
    let mut provider_config = ProviderConfig::default().with_base_url(server.uri());
    if let Some(key) = api_key {
        provider_config = provider_config.with_api_key(key);
    }
    let provider = ProviderClient::new(provider_config).unwrap();
    create_router(AppState::new(ApiConfig::default(), provider), None)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_create_video_returns_201() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/videos"))
        .and(header("Authorization", "key-123"))
        .and(body_partial_json(json!({
            "title": "Generated Video",
            "input": [{"scriptText": "Hello"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "v1",
            "status": "pending",
            "createdAt": 1700000000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = router_for(&server, Some("key-123"))
        .oneshot(post_json("/api/videos", json!({"script": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["id"], "v1");
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn test_create_video_requires_script() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let response = router_for(&server, Some("key-123"))
        .oneshot(post_json("/api/videos", json!({"title": "No script"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Script is required");
}

#[tokio::test]
async fn test_create_video_rejects_malformed_json() {
    let server = MockServer::start().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/videos")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = router_for(&server, Some("key-123"))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_create_video_forwards_provider_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(402).set_body_string("Insufficient credits"))
        .mount(&server)
        .await;

    let response = router_for(&server, Some("key-123"))
        .oneshot(post_json("/api/videos", json!({"script": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Failed to create video", "details": "Insufficient credits"})
    );
}

#[tokio::test]
async fn test_missing_credential_is_500_without_provider_call() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = router_for(&server, None);

    let requests = [
        post_json("/api/videos", json!({"script": "Hello"})),
        get("/api/videos"),
        get("/api/videos/v1"),
    ];

    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Synthesia API key not configured"})
        );
    }
}

#[tokio::test]
async fn test_list_videos() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "videos": [
                {"id": "v2", "status": "in_progress"},
                {"id": "v1", "status": "complete", "download": "https://cdn.example.com/v1.mp4"}
            ]
        })))
        .mount(&server)
        .await;

    let response = router_for(&server, Some("key-123"))
        .oneshot(get("/api/videos"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["videos"].as_array().unwrap().len(), 2);
    assert_eq!(body["videos"][1]["download"], "https://cdn.example.com/v1.mp4");
}

#[tokio::test]
async fn test_get_video_complete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "v1",
            "status": "complete",
            "download": "https://cdn.example.com/v1.mp4",
            "duration": "0:00:03.5"
        })))
        .mount(&server)
        .await;

    let response = router_for(&server, Some("key-123"))
        .oneshot(get("/api/videos/v1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "complete");
    // Unmodelled provider fields pass through
    assert_eq!(body["duration"], "0:00:03.5");
}

#[tokio::test]
async fn test_provider_body_is_forwarded_unchanged() {
    let server = MockServer::start().await;
    let v1 = json!({
        "id": "v1",
        "status": "pending",
        "createdAt": "2024-01-01 10:00:00"
    });
    let v2 = json!({
        "id": "v2",
        "status": "complete",
        "createdAt": "2024-01-01T10:00:00Z",
        "updatedAt": 1700000000.9
    });
    Mock::given(method("GET"))
        .and(path("/videos/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(v1.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(v2.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"videos": [{"title": "no id"}]})),
        )
        .mount(&server)
        .await;

    let app = router_for(&server, Some("key-123"));

    let response = app.clone().oneshot(get("/api/videos/v1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, v1);

    let response = app.clone().oneshot(get("/api/videos/v2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, v2);

    let response = app.oneshot(get("/api/videos")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"videos": [{"title": "no id"}]}));
}

#[tokio::test]
async fn test_get_video_not_found_is_proxied_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/v404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Video not found"))
        .mount(&server)
        .await;

    let response = router_for(&server, Some("key-123"))
        .oneshot(get("/api/videos/v404"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Failed to fetch video", "details": "Video not found"})
    );
}

#[tokio::test]
async fn test_provider_garbage_is_generic_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let response = router_for(&server, Some("secret-key"))
        .oneshot(get("/api/videos"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body, json!({"error": "Internal server error"}));
    assert!(!body.to_string().contains("secret-key"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;

    let response = router_for(&server, None)
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reflects_credential() {
    let server = MockServer::start().await;

    let response = router_for(&server, None).oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = router_for(&server, Some("key"))
        .oneshot(get("/ready"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_disabled_is_404() {
    let server = MockServer::start().await;

    let response = router_for(&server, None)
        .oneshot(get("/metrics"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let server = MockServer::start().await;

    let response = router_for(&server, None)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert!(headers.contains_key("X-Content-Type-Options"));
    assert!(headers.contains_key("X-Frame-Options"));
    assert_eq!(headers.get("X-Request-ID").unwrap(), "req-42");
}

#[tokio::test]
async fn test_cors_preflight() {
    let server = MockServer::start().await;

    let response = router_for(&server, None)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/videos")
                .header("Origin", "http://localhost:3000")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::OK || response.status() == StatusCode::NO_CONTENT
    );
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
