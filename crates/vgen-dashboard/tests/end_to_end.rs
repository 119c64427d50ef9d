//! Dashboard against a real vgen-api server, with the provider mocked.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vgen_api::{create_router, ApiConfig, AppState};
use vgen_dashboard::{
    Dashboard, DashboardConfig, DashboardError, PollErrorPolicy, ProxyClient, VideoSource,
};
use vgen_models::{CreateVideoRequest, VideoId, VideoStatus};
use vgen_provider::{ProviderClient, ProviderConfig};

/// Start the proxy on an ephemeral port, backed by `provider`.
async fn spawn_proxy(provider: &MockServer) -> String {
    let provider_config = ProviderConfig::default()
        .with_base_url(provider.uri())
        .with_api_key("key-123");
    let provider = ProviderClient::new(provider_config).unwrap();
    let app = create_router(AppState::new(ApiConfig::default(), provider), None);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn config(api_url: String) -> DashboardConfig {
    DashboardConfig {
        api_url,
        poll_interval: Duration::from_millis(50),
        poll_error_policy: PollErrorPolicy::Abandon,
        request_timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_create_polls_until_complete() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/videos"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": "v1", "status": "pending"})),
        )
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "v1", "status": "in_progress"})),
        )
        .up_to_n_times(1)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "v1",
            "status": "complete",
            "download": "https://cdn.example.com/v1.mp4"
        })))
        .mount(&provider)
        .await;

    let config = config(spawn_proxy(&provider).await);
    let client = ProxyClient::new(&config.api_url, config.request_timeout).unwrap();
    let dashboard = Dashboard::new(Arc::new(client), &config);

    let created = dashboard
        .create_video(CreateVideoRequest::new("Hello"))
        .await
        .unwrap();
    assert_eq!(created.id.as_str(), "v1");
    assert_eq!(created.status, Some(VideoStatus::Pending));

    tokio::time::timeout(
        Duration::from_secs(5),
        dashboard.wait_until_settled(Some(&created.id)),
    )
    .await
    .expect("video never settled");

    let view = dashboard.state().snapshot().await;
    assert!(view.pending().is_empty());
    assert_eq!(view.videos()[0].id.as_str(), "v1");
    assert_eq!(
        view.videos()[0].download_url(),
        Some("https://cdn.example.com/v1.mp4")
    );

    dashboard.shutdown().await;
}

#[tokio::test]
async fn test_missing_video_is_proxied_404() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/v404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Video not found"))
        .mount(&provider)
        .await;

    let config = config(spawn_proxy(&provider).await);
    let client = ProxyClient::new(&config.api_url, config.request_timeout).unwrap();

    let err = client.get_video(&VideoId::from("v404")).await.unwrap_err();
    match err {
        DashboardError::Rejected { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Failed to fetch video");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_load_failure_shows_error() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&provider)
        .await;

    let config = config(spawn_proxy(&provider).await);
    let client = ProxyClient::new(&config.api_url, config.request_timeout).unwrap();
    let dashboard = Dashboard::new(Arc::new(client), &config);

    dashboard.load_videos().await;

    let view = dashboard.state().snapshot().await;
    assert!(!view.is_loading());
    assert_eq!(view.error(), Some("Failed to fetch videos (HTTP 401)"));
}
