//! Mock pod creator for testing.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::error::PodError;

use super::PodCreator;

/// Pod creator that returns a canned result.
#[derive(Debug)]
pub struct MockPodCreator {
    outcome: Result<String, (u16, String)>,
    calls: AtomicU64,
}

impl MockPodCreator {
    /// Creator that always succeeds with `result`.
    pub fn succeeding(result: impl Into<String>) -> Self {
        Self {
            outcome: Ok(result.into()),
            calls: AtomicU64::new(0),
        }
    }

    /// Creator whose API server always rejects the request with `body`.
    pub fn rejecting(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: Err((status, body.into())),
            calls: AtomicU64::new(0),
        }
    }

    /// Number of creation attempts so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockPodCreator {
    fn default() -> Self {
        Self::succeeding("created default/mock-pod")
    }
}

#[async_trait]
impl PodCreator for MockPodCreator {
    async fn create_pod(&self) -> Result<String, PodError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.outcome {
            Ok(result) => Ok(result.clone()),
            Err((status, body)) => Err(PodError::Rejected {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
