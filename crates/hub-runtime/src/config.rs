//! # Hub Configuration
//!
//! One TOML document configures every subsystem. Every section and field is
//! optional; anything left out takes its default.
//!
//! ```toml
//! [gateway.http]
//! port = 8080
//!
//! [gateway.timeouts]
//! request = "10s"
//! storage = "8s"
//!
//! [workflow]
//! points_per_completion = 10
//!
//! [[seed.users]]
//! email = "donor@example.org"
//! display_name = "Dana"
//! role = "donor"
//! token = "dev-donor-token"
//! ```
//!
//! Environment overrides, applied after the file:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `HUB_HTTP_HOST` | `gateway.http.host` |
//! | `HUB_HTTP_PORT` | `gateway.http.port` |
//! | `HUB_REQUEST_TIMEOUT` | `gateway.timeouts.request` (humantime, e.g. `5s`) |
//! | `HUB_POINTS_PER_COMPLETION` | `workflow.points_per_completion` |

use dh_01_entity_store::{StoreConfig, StoreConfigError};
use dh_03_donation_lifecycle::{LifecycleConfig, LifecycleConfigError};
use dh_04_matching_query::{MatchingConfig, MatchingConfigError};
use dh_05_volunteer_workflow::{WorkflowConfig, WorkflowConfigError};
use dh_06_api_gateway::{ConfigError as GatewayConfigError, GatewayConfig};
use hub_telemetry::TelemetryConfig;
use humantime_serde::re::humantime;
use serde::{Deserialize, Serialize};
use shared_types::{normalize_email, Role};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the TOML file.
pub const CONFIG_PATH_ENV: &str = "HUB_CONFIG";

/// Complete process configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub gateway: GatewayConfig,
    pub store: StoreConfig,
    pub lifecycle: LifecycleConfig,
    pub matching: MatchingConfig,
    pub workflow: WorkflowConfig,
    pub telemetry: TelemetryConfig,
    pub seed: SeedConfig,
}

/// Identities created at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
    /// Bearer token bound to this user. Users without one cannot sign in.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("gateway: {0}")]
    Gateway(#[from] GatewayConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreConfigError),

    #[error("lifecycle: {0}")]
    Lifecycle(#[from] LifecycleConfigError),

    #[error("matching: {0}")]
    Matching(#[from] MatchingConfigError),

    #[error("workflow: {0}")]
    Workflow(#[from] WorkflowConfigError),

    #[error("telemetry: {0}")]
    Telemetry(String),

    #[error("seed: {0}")]
    Seed(String),
}

impl HubConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, RuntimeConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Defaults when `path` is `None`, otherwise the parsed file.
    pub fn load(path: Option<&Path>) -> Result<Self, RuntimeConfigError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let text =
                    std::fs::read_to_string(path).map_err(|source| RuntimeConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Self::from_toml_str(&text)
            }
        }
    }

    /// File from `HUB_CONFIG` if set, then process environment overrides.
    pub fn from_env() -> Result<Self, RuntimeConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let mut config = Self::load(path.as_deref())?;
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.telemetry = config.telemetry.with_env_overrides();
        Ok(config)
    }

    /// Apply `HUB_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), RuntimeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("HUB_HTTP_HOST") {
            self.gateway.http.host = parse_env("HUB_HTTP_HOST", &value, |v| v.parse().ok())?;
        }
        if let Some(value) = lookup("HUB_HTTP_PORT") {
            self.gateway.http.port = parse_env("HUB_HTTP_PORT", &value, |v| v.parse().ok())?;
        }
        if let Some(value) = lookup("HUB_REQUEST_TIMEOUT") {
            let request = parse_env("HUB_REQUEST_TIMEOUT", &value, |v| {
                humantime::parse_duration(v).ok()
            })?;
            self.gateway.timeouts.request = request;
            // Keep the storage deadline inside the shortened request budget.
            if self.gateway.timeouts.storage > request {
                self.gateway.timeouts.storage = request;
            }
        }
        if let Some(value) = lookup("HUB_POINTS_PER_COMPLETION") {
            self.workflow.points_per_completion =
                parse_env("HUB_POINTS_PER_COMPLETION", &value, |v| v.parse().ok())?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        self.gateway.validate()?;
        self.store.validate()?;
        self.lifecycle.validate()?;
        self.matching.validate()?;
        self.workflow.validate()?;
        self.telemetry
            .validate()
            .map_err(|e| RuntimeConfigError::Telemetry(e.to_string()))?;
        self.seed.validate()
    }
}

impl SeedConfig {
    /// Emails and tokens must each be unique.
    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        let mut emails = HashSet::new();
        let mut tokens = HashSet::new();
        for user in &self.users {
            let email = normalize_email(&user.email);
            if email.is_empty() {
                return Err(RuntimeConfigError::Seed("user with empty email".into()));
            }
            if !emails.insert(email.clone()) {
                return Err(RuntimeConfigError::Seed(format!("duplicate email {email}")));
            }
            if let Some(token) = &user.token {
                if token.trim().is_empty() {
                    return Err(RuntimeConfigError::Seed(format!("blank token for {email}")));
                }
                if !tokens.insert(token.as_str()) {
                    return Err(RuntimeConfigError::Seed(format!(
                        "token for {email} is already assigned"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_env<T>(
    var: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, RuntimeConfigError> {
    parse(value.trim()).ok_or_else(|| RuntimeConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}
