//! Storage backends used by the health probe.
//!
//! This module handles:
//! - The [`Storage`] capability the `/ping` route calls through
//! - A Redis adapter speaking the real wire protocol
//! - A mock backend for testing

pub mod mock;
pub mod redis;

use async_trait::async_trait;

use crate::error::StorageError;

pub use self::mock::{MockStorage, MockStorageConfig};
pub use self::redis::RedisStorage;

/// A remote key-value backend that can be probed for liveness.
///
/// Implementations are shared across concurrent requests and must make
/// repeated, parallel calls to [`Storage::ping`] safe.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Issue a liveness check and return the backend's short reply.
    async fn ping(&self) -> Result<String, StorageError>;
}
