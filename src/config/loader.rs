use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::settings::ServiceConfig;

/// Load and validate config from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    let config: ServiceConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config '{}'", path.display()))?;

    if config.endpoint.url.is_empty() {
        bail!("endpoint.url must not be empty");
    }
    if let Some(timeout_ms) = config.endpoint.timeout_ms {
        if timeout_ms == 0 {
            bail!("endpoint.timeout_ms must be positive");
        }
    }
    if config.settings.status_interval_seconds == 0 {
        bail!("settings.status_interval_seconds must be positive");
    }

    Ok(config)
}
