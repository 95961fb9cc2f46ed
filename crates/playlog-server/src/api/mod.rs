//! HTTP API handlers for playlog-server

pub mod error;
pub mod health;
pub mod service;

pub use error::ApiError;
pub use health::health_routes;
pub use service::{list_records, service_call};
