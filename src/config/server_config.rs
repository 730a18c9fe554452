//! HTTP server configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

/// HTTP server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub host: String,
    pub port: u16,
    /// Prefix for chart links handed back to clients.
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub preload_models: bool,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            public_base_url: "http://localhost:8000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            preload_models: true,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .context(format!("Failed to parse PORT '{}'", raw))?,
            Err(_) => defaults.port,
        };

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            public_base_url,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| defaults.max_upload_bytes.to_string())
                .parse::<usize>()
                .context("Failed to parse MAX_UPLOAD_BYTES")?,
            preload_models: env::var("PRELOAD_MODELS")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
        })
    }
}
