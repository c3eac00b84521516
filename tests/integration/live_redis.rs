//! Tests against a live Redis server.
//!
//! These tests require SIMPLE_WEBSERVER_REDIS to point at a reachable server.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;

use simple_webserver::kube::MockPodCreator;
use simple_webserver::storage::{RedisStorage, Storage};

use super::spawn_server;

/// Build storage from the environment, if configured.
fn live_storage() -> Option<RedisStorage> {
    dotenvy::dotenv().ok();
    let address = std::env::var("SIMPLE_WEBSERVER_REDIS").ok()?;
    RedisStorage::new(&address, Duration::from_secs(2)).ok()
}

#[tokio::test]
#[ignore = "requires SIMPLE_WEBSERVER_REDIS"]
async fn test_redis_ping() {
    let storage = match live_storage() {
        Some(s) => s,
        None => {
            println!("Skipping: SIMPLE_WEBSERVER_REDIS not set or invalid");
            return;
        }
    };

    let reply = storage.ping().await;
    assert!(reply.is_ok(), "Probe failed: {:?}", reply.err());
    assert_eq!(reply.unwrap(), "PONG");
    assert!(storage.is_connected().await);
}

#[tokio::test]
#[ignore = "requires SIMPLE_WEBSERVER_REDIS"]
async fn test_ping_route_against_redis() {
    let storage = match live_storage() {
        Some(s) => s,
        None => {
            println!("Skipping: SIMPLE_WEBSERVER_REDIS not set or invalid");
            return;
        }
    };

    let addr = spawn_server(Arc::new(storage), Arc::new(MockPodCreator::default())).await;
    let response = reqwest::get(format!("http://{}/ping", addr)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "PONG\n");
}
