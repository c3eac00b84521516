//! Application configuration loaded from environment variables.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ServerError;

/// Prefix shared by every environment variable the server reads.
pub const ENV_PREFIX: &str = "SIMPLE_WEBSERVER_";

/// Application configuration loaded from `SIMPLE_WEBSERVER_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server ===
    /// Address + port to listen on. `:8082` binds every interface.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Largest request body the echo and pod routes will buffer.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,

    // === Redis ===
    /// Address + port where a Redis server is listening, or a `redis://` URL.
    #[serde(default = "default_redis")]
    pub redis: String,

    /// Upper bound on a single probe round trip.
    #[serde(default = "default_redis_timeout_ms")]
    pub redis_timeout_ms: u64,

    // === Kubernetes ===
    /// Base URL of the Kubernetes API server.
    #[serde(default = "default_kube_api_url")]
    pub kube_api_url: String,

    /// Namespace pods are created in.
    #[serde(default = "default_kube_namespace")]
    pub kube_namespace: String,

    /// Container image for created pods.
    #[serde(default = "default_kube_pod_image")]
    pub kube_pod_image: String,

    /// Bearer token file (service-account token when running in-cluster).
    #[serde(default = "default_kube_token_path")]
    pub kube_token_path: String,

    /// CA bundle used to verify the API server certificate.
    #[serde(default = "default_kube_ca_path")]
    pub kube_ca_path: String,

    // === Observability ===
    /// Address for the Prometheus exporter. Disabled when unset.
    #[serde(default)]
    pub metrics_listen: Option<String>,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_listen() -> String {
    ":8082".to_string()
}

fn default_max_payload_bytes() -> usize {
    1024 * 1024
}

fn default_redis() -> String {
    ":6379".to_string()
}

fn default_redis_timeout_ms() -> u64 {
    2000
}

fn default_kube_api_url() -> String {
    "https://kubernetes.default.svc".to_string()
}

fn default_kube_namespace() -> String {
    "default".to_string()
}

fn default_kube_pod_image() -> String {
    "nginx:alpine".to_string()
}

fn default_kube_token_path() -> String {
    "/var/run/secrets/kubernetes.io/serviceaccount/token".to_string()
}

fn default_kube_ca_path() -> String {
    "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_payload_bytes: default_max_payload_bytes(),
            redis: default_redis(),
            redis_timeout_ms: default_redis_timeout_ms(),
            kube_api_url: default_kube_api_url(),
            kube_namespace: default_kube_namespace(),
            kube_pod_image: default_kube_pod_image(),
            kube_token_path: default_kube_token_path(),
            kube_ca_path: default_kube_ca_path(),
            metrics_listen: None,
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed(ENV_PREFIX).from_env()
    }

    /// Load configuration from explicit `(name, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(vars)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), ServerError> {
        self.listen_addr()?;

        if self.redis.trim().is_empty() {
            return Err(ServerError::InvalidConfig(
                "SIMPLE_WEBSERVER_REDIS is required".to_string(),
            ));
        }

        if self.redis_timeout_ms == 0 {
            return Err(ServerError::InvalidConfig(
                "SIMPLE_WEBSERVER_REDIS_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        if self.max_payload_bytes == 0 {
            return Err(ServerError::InvalidConfig(
                "SIMPLE_WEBSERVER_MAX_PAYLOAD_BYTES must be greater than 0".to_string(),
            ));
        }

        if let Some(addr) = &self.metrics_listen {
            host_port(addr, "SIMPLE_WEBSERVER_METRICS_LISTEN")?;
        }

        Ok(())
    }

    /// Listen address as `host:port`, ready for `TcpListener::bind`.
    ///
    /// Host names are kept as-is and resolved when binding.
    pub fn listen_addr(&self) -> Result<String, ServerError> {
        host_port(&self.listen, "SIMPLE_WEBSERVER_LISTEN")
    }

    /// Resolved Prometheus exporter address, if enabled.
    pub fn metrics_addr(&self) -> Result<Option<SocketAddr>, ServerError> {
        let Some(addr) = self.metrics_listen.as_deref() else {
            return Ok(None);
        };
        let var = "SIMPLE_WEBSERVER_METRICS_LISTEN";
        let addr = host_port(addr, var)?;

        let resolved = addr
            .to_socket_addrs()
            .map_err(|e| ServerError::InvalidConfig(format!("{} {:?}: {}", var, addr, e)))?
            .next()
            .ok_or_else(|| {
                ServerError::InvalidConfig(format!("{} {:?} resolved to no address", var, addr))
            })?;
        Ok(Some(resolved))
    }

    /// Probe timeout as a [`Duration`].
    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }
}

/// Check a `host:port` value, expanding the `:port` shorthand to all interfaces.
fn host_port(value: &str, var: &str) -> Result<String, ServerError> {
    let value = value.trim();
    let invalid = |reason: &str| {
        ServerError::InvalidConfig(format!("{} must be host:port, got {:?}: {}", var, value, reason))
    };

    let full = if value.starts_with(':') {
        format!("0.0.0.0{}", value)
    } else {
        value.to_string()
    };

    let (host, port) = full.rsplit_once(':').ok_or_else(|| invalid("missing port"))?;
    if host.is_empty() {
        return Err(invalid("missing host"));
    }
    port.parse::<u16>()
        .map_err(|e| invalid(&format!("bad port: {}", e)))?;

    Ok(full)
}
