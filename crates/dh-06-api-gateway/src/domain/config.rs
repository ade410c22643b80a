//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// CORS configuration
    pub cors: CorsConfig,
}

impl GatewayConfig {
    /// Loopback on an ephemeral port with short timeouts.
    pub fn for_testing() -> Self {
        Self {
            http: HttpConfig {
                host: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 0,
            },
            timeouts: TimeoutConfig {
                request: Duration::from_secs(2),
                storage: Duration::from_secs(1),
            },
            cors: CorsConfig::default(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeouts.request.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }
        if self.timeouts.storage.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "storage timeout cannot be 0".into(),
            ));
        }
        // A storage deadline past the request timeout would never fire.
        if self.timeouts.storage > self.timeouts.request {
            return Err(ConfigError::InvalidTimeout(format!(
                "storage timeout ({:?}) exceeds request timeout ({:?})",
                self.timeouts.storage, self.timeouts.request
            )));
        }
        if self.cors.enabled && self.cors.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidCors(
                "enabled with no allowed origins".into(),
            ));
        }
        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request budget enforced by the timeout middleware.
    #[serde(with = "humantime_serde")]
    pub request: Duration,
    /// Deadline handed to every core operation.
    #[serde(with = "humantime_serde")]
    pub storage: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(10),
            storage: Duration::from_secs(8),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins (`*` for any)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers (`*` for any)
    pub allowed_headers: Vec<String>,
    /// Headers exposed to the browser
    pub expose_headers: Vec<String>,
    /// Preflight cache lifetime in seconds
    pub max_age: u64,
    /// Allow credentials
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec!["authorization".to_string(), "content-type".to_string()],
            expose_headers: vec!["x-request-id".to_string()],
            max_age: 3600,
            allow_credentials: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("invalid CORS configuration: {0}")]
    InvalidCors(String),
}
