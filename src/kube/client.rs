//! Kubernetes API client for pod creation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::Config;
use crate::error::PodError;
use crate::metrics;

use super::PodCreator;

/// Name prefix for created pods; the API server appends a random suffix.
pub const POD_NAME_PREFIX: &str = "simple-webserver-";

/// Label attached to every pod this server creates.
pub const CREATED_BY_LABEL: &str = "app.kubernetes.io/created-by";

/// Kubernetes API client that creates pods in one namespace.
#[derive(Debug, Clone)]
pub struct KubeClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Pod collection endpoint for the configured namespace.
    pods_url: Url,
    /// Container image for new pods.
    image: String,
    /// Bearer token file, re-read on every request so rotated tokens apply.
    token_path: PathBuf,
}

/// Subset of the pod object returned by the API server.
#[derive(Debug, Deserialize)]
struct PodResponse {
    metadata: PodMetadata,
}

#[derive(Debug, Deserialize)]
struct PodMetadata {
    name: Option<String>,
    namespace: Option<String>,
}

impl KubeClient {
    /// Create a client from config.
    ///
    /// The CA bundle is trusted when the file exists; otherwise the system
    /// roots are used (e.g. behind `kubectl proxy`).
    pub fn new(config: &Config) -> Result<Self, PodError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5));

        let ca_path = Path::new(&config.kube_ca_path);
        if ca_path.exists() {
            let pem = std::fs::read(ca_path).map_err(|e| PodError::Credentials {
                path: config.kube_ca_path.clone(),
                reason: e.to_string(),
            })?;
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
        }

        Ok(Self {
            http: builder.build()?,
            pods_url: pods_url(&config.kube_api_url, &config.kube_namespace)?,
            image: config.kube_pod_image.clone(),
            token_path: PathBuf::from(&config.kube_token_path),
        })
    }

    /// Endpoint pods are POSTed to.
    pub fn pods_url(&self) -> &Url {
        &self.pods_url
    }

    /// Pod manifest sent to the API server.
    pub fn manifest(&self) -> Value {
        pod_manifest(&self.image)
    }

    async fn bearer_token(&self) -> Result<Option<String>, PodError> {
        match tokio::fs::read_to_string(&self.token_path).await {
            Ok(token) => Ok(Some(token.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PodError::Credentials {
                path: self.token_path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl PodCreator for KubeClient {
    #[instrument(skip(self), fields(url = %self.pods_url))]
    async fn create_pod(&self) -> Result<String, PodError> {
        let mut request = self.http.post(self.pods_url.clone()).json(&self.manifest());
        match self.bearer_token().await? {
            Some(token) => request = request.bearer_auth(token),
            None => debug!("No service-account token found, sending unauthenticated request"),
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                debug!(error = %e, "Failed to read rejection body");
                format!("<unreadable response body: {}>", e)
            });
            return Err(PodError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let pod: PodResponse = response
            .json()
            .await
            .map_err(|e| PodError::MalformedResponse(e.to_string()))?;
        let name = pod
            .metadata
            .name
            .ok_or_else(|| PodError::MalformedResponse("pod has no name".to_string()))?;
        let namespace = pod.metadata.namespace.unwrap_or_default();

        metrics::inc_pods_created();
        info!(pod = %name, namespace = %namespace, "Pod created");

        Ok(format!("created {}/{}", namespace, name))
    }
}

/// Build the pod collection URL for `namespace` under `api_url`.
pub fn pods_url(api_url: &str, namespace: &str) -> Result<Url, PodError> {
    let mut base = Url::parse(api_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(&format!("api/v1/namespaces/{}/pods", namespace))?)
}

/// Minimal single-container pod that runs once.
pub fn pod_manifest(image: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "generateName": POD_NAME_PREFIX,
            "labels": { CREATED_BY_LABEL: "simple-webserver" }
        },
        "spec": {
            "restartPolicy": "Never",
            "containers": [{ "name": "main", "image": image }]
        }
    })
}
