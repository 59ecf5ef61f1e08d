use std::{env, fs};

use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::source::http::AuthStyle;
use crate::source::Credentials;
use crate::utils::constants::DEFAULT_STATUS_INTERVAL_SECS;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub endpoint: EndpointConfig,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// ================================
/// Token endpoint
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    pub url: String,
    #[serde(default)]
    pub auth_style: AuthStyle,
    pub timeout_ms: Option<u64>,
}

/// ================================
/// Credentials
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    pub client_id: GenericValue,
    pub client_secret: GenericValue,
}

impl CredentialsConfig {
    pub fn resolve(&self) -> Result<Credentials> {
        Ok(Credentials::new(
            self.client_id.resolve()?,
            self.client_secret.resolve()?,
        ))
    }
}

/// Credential value sources. Secrets usually arrive via `from_env` or a
/// mounted file rather than inline.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum GenericValue {
    Literal { value: String },
    FromEnv { from_env: String },
    FromFile { path: String },
}

impl GenericValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            GenericValue::Literal { value } => Ok(value.to_owned()),
            GenericValue::FromEnv { from_env } => {
                env::var(from_env).map_err(|err| anyhow!("env var '{from_env}': {err}"))
            }
            GenericValue::FromFile { path } => fs::read_to_string(path)
                .map(|raw| raw.trim().to_string())
                .map_err(|err| anyhow!("file '{path}': {err}")),
        }
    }
}

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    #[serde(default = "default_status_interval")]
    pub status_interval_seconds: u64,
    pub logging: Option<LoggingConfig>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            status_interval_seconds: default_status_interval(),
            logging: None,
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_status_interval() -> u64 {
    DEFAULT_STATUS_INTERVAL_SECS
}
