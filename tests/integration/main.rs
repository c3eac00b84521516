//! Integration tests for the web server.
//!
//! The server is started on an ephemeral port with mock backends and driven
//! over real TCP. Tests against a live Redis are in `live_redis.rs` and ignored by
//! default.
//! Run with: cargo test --test integration -- --ignored

mod live_redis;

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{redirect::Policy, StatusCode};
use tokio::net::TcpListener;

use simple_webserver::api::{create_router, AppState};
use simple_webserver::kube::{MockPodCreator, PodCreator};
use simple_webserver::storage::{MockStorage, MockStorageConfig, Storage};

/// Serve a router backed by `storage` and `pods` on an ephemeral port.
pub async fn spawn_server(storage: Arc<dyn Storage>, pods: Arc<dyn PodCreator>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = create_router(AppState::new(storage, pods));

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_root_redirects_over_tcp() {
    let addr = spawn_server(
        Arc::new(MockStorage::default()),
        Arc::new(MockPodCreator::default()),
    )
    .await;

    let response = client()
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/ping");
}

#[tokio::test]
async fn test_payload_echo_over_tcp() {
    let addr = spawn_server(
        Arc::new(MockStorage::default()),
        Arc::new(MockPodCreator::default()),
    )
    .await;

    let response = client()
        .post(format!("http://{}/payload", addr))
        .header("X-Test", "a")
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = response.text().await.unwrap();
    assert!(text.starts_with("Method: POST\nHeaders:\n"), "{}", text);
    assert!(text.contains("X-Test: a\n"), "{}", text);
    assert!(text.contains("Content-Length: 5\n"), "{}", text);
    assert!(text.ends_with("Payload: hello"), "{}", text);
}

#[tokio::test]
async fn test_slow_backend_only_stalls_its_own_requests() {
    let storage = Arc::new(MockStorage::with_config(MockStorageConfig {
        latency_ms: 50,
        numbered: true,
        ..MockStorageConfig::default()
    }));
    let addr = spawn_server(storage.clone(), Arc::new(MockPodCreator::default())).await;
    let client = client();

    let pings = (0..8).map(|_| {
        let client = client.clone();
        tokio::spawn(async move {
            let response = client
                .get(format!("http://{}/ping", addr))
                .send()
                .await
                .unwrap();
            (response.status(), response.text().await.unwrap())
        })
    });
    let pings: Vec<_> = pings.collect();

    // /version does not touch the backend and answers while pings are in flight.
    let version = client
        .get(format!("http://{}/version", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(version.status(), StatusCode::OK);

    let mut bodies = Vec::new();
    for ping in pings {
        let (status, body) = ping.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        bodies.push(body);
    }
    bodies.sort();
    bodies.dedup();

    assert_eq!(bodies.len(), 8);
    assert_eq!(storage.calls(), 8);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let addr = spawn_server(
        Arc::new(MockStorage::default()),
        Arc::new(MockPodCreator::default()),
    )
    .await;

    let response = client()
        .get(format!("http://{}/nope", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
