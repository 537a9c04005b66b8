//! HTTP middleware for Mercator Core
//!
//! - `AuthUser` JWT extractor
//! - `ObservabilityLayer` for request IDs and HTTP metrics
//! - `normalize_error_response` for JSON extractor rejections

pub mod auth;
pub mod error_response;
pub mod metrics;

pub use auth::{AuthError, AuthUser};
pub use error_response::normalize_error_response;
pub use metrics::ObservabilityLayer;
