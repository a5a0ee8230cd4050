// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Temporary source trees for integration tests, cleaned up on drop.

use std::path::PathBuf;

use tokio::fs;

/// Temporary dashboards source tree used for testing.
///
/// Automatically cleans up all created directories when dropped.
#[derive(Debug)]
pub struct TempDirs {
    /// Root of the dashboards source tree.
    pub source_path: PathBuf,
}

impl TempDirs {
    /// Creates a fresh, empty source tree.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let base = tempfile::tempdir()?.keep();
        let source_path = base.join("dashboards");
        fs::create_dir_all(&source_path).await?;
        Ok(Self { source_path })
    }

    /// Gets the base temporary directory.
    #[must_use]
    pub fn base(&self) -> PathBuf {
        self.source_path
            .parent()
            .expect("temp directories should have a parent")
            .to_path_buf()
    }

    /// Writes a SQL file under `<step>/<dashboard>/`, creating the folders.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file writing fails.
    pub async fn create_sql_file(
        &self,
        step: &str,
        dashboard: &str,
        file: &str,
        content: &str,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dir = self.source_path.join(step).join(dashboard);
        fs::create_dir_all(&dir).await?;
        let path = dir.join(file);
        fs::write(&path, content).await?;
        Ok(path)
    }

    /// Removes a SQL file from the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub async fn remove_sql_file(
        &self,
        step: &str,
        dashboard: &str,
        file: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.source_path.join(step).join(dashboard).join(file);
        fs::remove_file(&path).await?;
        Ok(())
    }

    /// Removes a whole `<step>/<dashboard>/` folder from the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be removed.
    pub async fn remove_dashboard_dir(
        &self,
        step: &str,
        dashboard: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.source_path.join(step).join(dashboard);
        fs::remove_dir_all(&path).await?;
        Ok(())
    }
}

/// Sets up a temporary source tree for integration tests.
///
/// This is a convenience wrapper around [`TempDirs::new`].
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub async fn setup_temp_dirs() -> Result<TempDirs, Box<dyn std::error::Error>> {
    TempDirs::new().await
}

impl Drop for TempDirs {
    fn drop(&mut self) {
        let base = self.base();
        if let Err(e) = std::fs::remove_dir_all(&base) {
            tracing::warn!(path = %base.display(), err = %e, "failed to clean up temp directory");
        }
    }
}
