// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::{Path, PathBuf};

use sqldeck_dbsql::WorkspaceConfig;

/// The name of the sqldeck application.
pub const APP_NAME: &str = "sqldeck";

/// Configuration for the sqldeck application.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Path to the dashboards source tree.
    pub source_path: PathBuf,

    /// Workspace folder holding the deployed dashboards and `state.json`.
    pub workspace_root: String,

    /// Prefix prepended to every dashboard name.
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,

    /// SQL warehouse to run the queries on. Falls back to the first
    /// warehouse of the workspace when unset.
    #[serde(default)]
    pub warehouse_id: Option<String>,

    /// Databricks workspace connection.
    pub workspace: WorkspaceConfig,
}

fn default_name_prefix() -> String {
    "[SQLDECK]".to_string()
}

impl Config {
    /// Normalize the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be expanded or a field is invalid.
    pub fn normalize(&mut self) -> Result<(), Box<dyn Error>> {
        // Normalize source path
        self.source_path = expand_path(&self.source_path)?;

        if self.workspace.host.trim().is_empty() {
            return Err("workspace.host must be set".into());
        }

        if !self.workspace_root.starts_with('/') {
            return Err(format!(
                "workspace_root must be an absolute workspace path: {}",
                self.workspace_root
            )
            .into());
        }
        // A trailing slash would double up in derived paths
        while self.workspace_root.len() > 1 && self.workspace_root.ends_with('/') {
            self.workspace_root.pop();
        }

        Ok(())
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle config directories
    let config_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_CONFIG_HOME/", "${XDG_CONFIG_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in config_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_config_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::home_dir().ok_or("User-specific home directory not found".into())
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or("User-specific home directory not found".into())
}
