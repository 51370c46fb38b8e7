//! Network configuration: REST server and HTTP client

use serde::Deserialize;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────────────────────────────────────

/// REST server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Origins allowed by CORS (browser front-ends served from elsewhere)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

/// Server settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileServerConfig {
    pub cors_origins: Option<Vec<String>>,
}

impl ServerConfig {
    pub fn from_file(file: Option<FileServerConfig>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            cors_origins: file
                .cors_origins
                .unwrap_or_else(|| Self::default().cors_origins),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Per-request timeout in seconds (0 = no timeout)
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}

/// Client settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileClientConfig {
    pub request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn from_file(file: Option<FileClientConfig>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            request_timeout_secs: file
                .request_timeout_secs
                .unwrap_or(Self::default().request_timeout_secs),
        }
    }

    /// Timeout to apply, if any
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
