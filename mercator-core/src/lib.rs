//! Mercator Core - domain mapping service
//!
//! Custom domain aliases for the sites of a multi-tenant network, and promotion
//! of an alias to a site's primary domain, exposed as a REST API.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod policy;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
