//! HTTP API module: routing table, handlers and request logging.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::{AppState, RequestSnapshot, NAME, VERSION};
pub use routes::{create_router, Route};
