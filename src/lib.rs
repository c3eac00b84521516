//! Minimal diagnostic HTTP server.
//!
//! Serves a handful of debug routes and a health probe against a pluggable
//! storage backend:
//!
//! ```text
//! /            303 -> /ping
//! /ping        backend PING reply, or 500 + error
//! /version     "<name> v<version>"
//! /payload     echo of method, headers and body
//! /kubecreate  create a pod through the Kubernetes API
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`storage`]: Storage capability and the Redis adapter
//! - [`kube`]: Pod creation through the Kubernetes API
//! - [`api`]: Route table, handlers and logging middleware
//! - [`metrics`]: Request and backend metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod kube;
pub mod metrics;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServerError};
