//! HTTP API route definitions.

use axum::{
    middleware,
    routing::{any, MethodRouter},
    Router,
};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

use super::handlers::{kube_create, payload, ping, root, version, AppState};
use super::middleware::log_requests;

/// Every route the server answers, matched on the exact path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Route {
    /// `/` - redirect to the probe.
    Root,
    /// `/ping` - storage probe.
    Ping,
    /// `/version` - name and version.
    Version,
    /// `/payload` - request echo.
    Payload,
    /// `/kubecreate` - pod creation trigger.
    KubeCreate,
}

impl Route {
    /// Path the route is mounted on.
    pub const fn path(self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Ping => "/ping",
            Route::Version => "/version",
            Route::Payload => "/payload",
            Route::KubeCreate => "/kubecreate",
        }
    }

    /// Route registered for exactly `path`, if any.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::iter().find(|route| route.path() == path)
    }

    /// Handler for this route; every method is accepted.
    fn handler(self) -> MethodRouter<AppState> {
        match self {
            Route::Root => any(root),
            Route::Ping => any(ping),
            Route::Version => any(version),
            Route::Payload => any(payload),
            Route::KubeCreate => any(kube_create),
        }
    }
}

/// Create the API router.
///
/// Paths outside [`Route`] fall through to axum's default 404.
pub fn create_router(state: AppState) -> Router {
    Route::iter()
        .fold(Router::new(), |router, route| {
            router.route(route.path(), route.handler())
        })
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}
