// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf, str::FromStr};

use tokio::fs;

use sqldeck_core::{APP_NAME, Config as CoreConfig};
use sqldeck_dbsql::AuthMethod;

const SQLDECK_CONFIG_ENV: &str = "SQLDECK_CONFIG";
const SQLDECK_DEV_ENV: &str = "SQLDECK_DEV";

const SQLDECK_DEV_VALID_TRUE: &[&str] = &["1", "true", "yes"];
const SQLDECK_DEV_VALID_FALSE: &[&str] = &["0", "false", "no"];

const DATABRICKS_HOST_ENV: &str = "DATABRICKS_HOST";
const DATABRICKS_TOKEN_ENV: &str = "DATABRICKS_TOKEN";
const DATABRICKS_WAREHOUSE_ENV: &str = "DATABRICKS_WAREHOUSE_ID";

#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<(CoreConfig, Config), Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(SQLDECK_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        if let Some(true) = is_dev_mode() {
            return Err(format!(
                "Development environment detected ({SQLDECK_DEV_ENV} is set): config must be explicitly specified via --config or {SQLDECK_CONFIG_ENV} environment variable",
            ).into());
        }
        let config = get_config_dir()?.join(format!("{APP_NAME}/config.toml"));
        if !config.exists() {
            return Err(format!("No config found at: {}", config.display()).into());
        }
        config
    };

    let raw: ConfigRaw = fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse()?;

    let mut core = raw.core;
    apply_env_overrides(&mut core);
    core.normalize()?;
    Ok((core, Config {}))
}

/// Configuration for the sqldeck command-line interface.
#[derive(Debug, Clone, Copy)]
pub struct Config;

#[derive(Debug)]
struct ConfigRaw {
    core: CoreConfig,
}

impl FromStr for ConfigRaw {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let core = toml::from_str(s)?;
        Ok(Self { core })
    }
}

/// Databricks CLI and CI runners export connection details through the
/// standard `DATABRICKS_*` variables. They win over the config file.
fn apply_env_overrides(config: &mut CoreConfig) {
    let host = std::env::var(DATABRICKS_HOST_ENV).unwrap_or_default();
    if !host.is_empty() {
        config.workspace.host = host;
    }

    let token = std::env::var(DATABRICKS_TOKEN_ENV).unwrap_or_default();
    if !token.is_empty() {
        config.workspace.auth = AuthMethod::Bearer { token };
    }

    let warehouse_id = std::env::var(DATABRICKS_WAREHOUSE_ENV).unwrap_or_default();
    if !warehouse_id.is_empty() {
        config.warehouse_id = Some(warehouse_id);
    }
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific home directory not found".into())
}

fn is_dev_mode() -> Option<bool> {
    if let Ok(val) = std::env::var(SQLDECK_DEV_ENV) {
        let lower = val.to_lowercase();
        if SQLDECK_DEV_VALID_TRUE.contains(&lower.as_str()) {
            Some(true)
        } else if SQLDECK_DEV_VALID_FALSE.contains(&lower.as_str()) {
            Some(false)
        } else {
            tracing::warn!(
                "Unrecognized value for {}: '{}'. Expected one of: {}. Treating as unset.",
                SQLDECK_DEV_ENV,
                val,
                format!(
                    "true: {}, false: {}",
                    SQLDECK_DEV_VALID_TRUE.join(", "),
                    SQLDECK_DEV_VALID_FALSE.join(", ")
                )
            );
            None
        }
    } else {
        None
    }
}
