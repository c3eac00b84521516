//! HTTP API handlers.

use std::fmt;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

use crate::kube::PodCreator;
use crate::storage::Storage;

use super::routes::Route;

/// Name reported by `/version`.
pub const NAME: &str = "simple-webserver";

/// Version reported by `/version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application state shared with handlers.
///
/// Built once at startup; handlers only ever read from it.
#[derive(Clone)]
pub struct AppState {
    /// Backend probed by `/ping`.
    pub storage: Arc<dyn Storage>,
    /// Pod creator invoked by `/kubecreate`.
    pub pods: Arc<dyn PodCreator>,
    /// Largest request body buffered by `/payload` and `/kubecreate`.
    pub max_payload_bytes: usize,
}

impl AppState {
    /// Default body cap, matching the configuration default.
    pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

    /// Create new app state.
    pub fn new(storage: Arc<dyn Storage>, pods: Arc<dyn PodCreator>) -> Self {
        Self {
            storage,
            pods,
            max_payload_bytes: Self::DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    /// Override the request body cap.
    pub fn with_max_payload_bytes(mut self, max_payload_bytes: usize) -> Self {
        self.max_payload_bytes = max_payload_bytes;
        self
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("max_payload_bytes", &self.max_payload_bytes)
            .finish_non_exhaustive()
    }
}

/// Body served by `/version`.
pub fn version_string() -> String {
    format!("{} v{}\n", NAME, VERSION)
}

/// Root handler - redirects to the probe route with 303 See Other.
pub async fn root() -> Redirect {
    Redirect::to(Route::Ping.path())
}

/// Probe handler - returns the backend's reply, or 500 with its error.
pub async fn ping(State(state): State<AppState>) -> Response {
    match state.storage.ping().await {
        Ok(reply) => (StatusCode::OK, format!("{}\n", reply)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Version handler - returns name and version.
pub async fn version() -> impl IntoResponse {
    (StatusCode::OK, version_string())
}

/// Payload handler - debug route that dumps method, headers and body.
pub async fn payload(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let body = match read_body(body, state.max_payload_bytes).await {
        Ok(body) => body,
        Err(status) => return status.into_response(),
    };

    let snapshot = RequestSnapshot {
        method,
        headers,
        body,
    };
    let rendered = snapshot.render();
    debug!(
        method = %snapshot.method,
        headers = snapshot.headers.len(),
        body_bytes = snapshot.body.len(),
        "{}",
        String::from_utf8_lossy(&rendered)
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        rendered,
    )
        .into_response()
}

/// Pod creation handler - drains the body, then creates one pod.
pub async fn kube_create(State(state): State<AppState>, body: Body) -> Response {
    if let Err(status) = read_body(body, state.max_payload_bytes).await {
        return status.into_response();
    }

    match state.pods.create_pod().await {
        Ok(result) => (StatusCode::OK, format!("Pods: {}", result)).into_response(),
        Err(e) => {
            warn!(error = %e, "Pod creation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Buffer the whole body, mapping any stream error or overflow to 500.
async fn read_body(body: Body, limit: usize) -> Result<Bytes, StatusCode> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        debug!(error = %e, limit, "Failed to read request body");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Method, headers and body of one request, as echoed by `/payload`.
#[derive(Debug)]
pub struct RequestSnapshot {
    /// Request method.
    pub method: Method,
    /// Request headers.
    pub headers: HeaderMap,
    /// Raw body bytes.
    pub body: Bytes,
}

impl RequestSnapshot {
    /// Render as `Method:` line, optional `Headers:` block, then `Payload:`.
    ///
    /// Every value of a repeated header gets its own line, in arrival order.
    /// Body bytes are copied through without UTF-8 validation.
    pub fn render(&self) -> Vec<u8> {
        let mut out = format!("Method: {}\n", self.method).into_bytes();

        if !self.headers.is_empty() {
            out.extend_from_slice(b"Headers:\n");
            for name in self.headers.keys() {
                let name_text = canonical_header_name(name.as_str());
                for value in self.headers.get_all(name) {
                    out.extend_from_slice(name_text.as_bytes());
                    out.extend_from_slice(b": ");
                    out.extend_from_slice(value.as_bytes());
                    out.push(b'\n');
                }
            }
        }

        out.extend_from_slice(b"Payload: ");
        out.extend_from_slice(&self.body);
        out
    }
}

/// Canonical MIME form of a header name: `x-forwarded-for` -> `X-Forwarded-For`.
pub fn canonical_header_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}
