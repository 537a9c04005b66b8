//! Configuration management for Mercator Core

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
    /// Site used when neither the request nor the token names one
    pub default_site_id: i64,
    /// Emails treated as network super-admins regardless of the database
    pub super_admin_emails: Vec<String>,
    /// Restrict mapping lookups by id to the scoped site
    pub strict_site_scope: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_token_ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "pretty" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
    pub service_name: String,
}

impl JwtConfig {
    /// Load the token settings alone; minting a token needs no database.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            secret: env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "https://mercator.local".to_string()),
            audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mercator".to_string()),
            access_token_ttl_secs: env::var("JWT_ACCESS_TOKEN_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600),
        })
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            service_name: "mercator-core".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
            },
            jwt: JwtConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                metrics_enabled: env::var("METRICS_ENABLED")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "mercator-core".to_string()),
            },
            default_site_id: env::var("DEFAULT_SITE_ID")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("Invalid DEFAULT_SITE_ID")?,
            super_admin_emails: parse_email_list(
                &env::var("SUPER_ADMIN_EMAILS").unwrap_or_default(),
            ),
            strict_site_scope: env::var("MAPPING_STRICT_SITE_SCOPE")
                .map(|s| s.to_lowercase() != "false")
                .unwrap_or(true),
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Whether the email is configured as a network super-admin
    pub fn is_super_admin_email(&self, email: &str) -> bool {
        self.super_admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
