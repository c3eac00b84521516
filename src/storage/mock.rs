//! Mock storage backend for unit testing.
//!
//! This module provides a backend that can be used in tests
//! without a running Redis server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StorageError;

use super::Storage;

/// Configuration for mock storage behavior.
#[derive(Debug, Clone)]
pub struct MockStorageConfig {
    /// Reply returned by a successful probe.
    pub reply: String,
    /// Error message to fail every probe with.
    pub failure: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
    /// Append the call sequence number to the reply (`PONG-3`).
    pub numbered: bool,
}

impl Default for MockStorageConfig {
    fn default() -> Self {
        Self {
            reply: "PONG".to_string(),
            failure: None,
            latency_ms: 0,
            numbered: false,
        }
    }
}

/// Mock storage for testing.
#[derive(Debug, Default)]
pub struct MockStorage {
    config: MockStorageConfig,
    calls: AtomicU64,
}

impl MockStorage {
    /// Backend that always answers `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_config(MockStorageConfig {
            reply: reply.into(),
            ..MockStorageConfig::default()
        })
    }

    /// Backend that always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockStorageConfig {
            failure: Some(message.into()),
            ..MockStorageConfig::default()
        })
    }

    /// Create a mock with custom configuration.
    pub fn with_config(config: MockStorageConfig) -> Self {
        Self {
            config,
            calls: AtomicU64::new(0),
        }
    }

    /// Number of probes issued so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn ping(&self) -> Result<String, StorageError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(message) = &self.config.failure {
            return Err(StorageError::Unavailable(message.clone()));
        }

        if self.config.numbered {
            Ok(format!("{}-{}", self.config.reply, call))
        } else {
            Ok(self.config.reply.clone())
        }
    }
}
