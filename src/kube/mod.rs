//! Pod creation against an orchestration platform.
//!
//! The `/kubecreate` route treats pod creation as an opaque operation that
//! yields a line of text. [`KubeClient`] talks to the Kubernetes API server;
//! [`MockPodCreator`] stands in for it in tests.

pub mod client;
pub mod mock;

use async_trait::async_trait;

use crate::error::PodError;

pub use client::KubeClient;
pub use mock::MockPodCreator;

/// Something that can create a pod and describe the result.
#[async_trait]
pub trait PodCreator: Send + Sync {
    /// Create one pod, returning a short human-readable result.
    async fn create_pod(&self) -> Result<String, PodError>;
}
