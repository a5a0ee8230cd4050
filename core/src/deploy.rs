// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Deployment engine turning a source tree into live dashboards.
//!
//! Every run converges the workspace towards the source tree: queries and
//! visualizations are updated in place when their ids are known, widgets
//! are wiped and recreated for a clean grid, and objects whose files are
//! gone are deleted remotely. The id mapping survives runs in `state.json`
//! under the workspace root.

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use sqldeck_dbsql::{
    AccessControl, DashboardCreate, ImportFormat, ObjectTypePlural, PermissionLevel, QueryCreate,
    QueryUpdate, RunAsRole, VisualizationCreate, VisualizationUpdate, WidgetCreate,
};

use crate::api::WorkspaceApi;
use crate::config::Config;
use crate::queries::{self, DashboardFolder, QueryFile, QueryTransform};
use crate::state::{self, InstallState, STATE_FILE, StateKind};
use crate::viz::{VizSpec, WidgetSpec};

/// Outcome of a deployment run.
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    /// Deployed dashboard ids by dashboard reference.
    pub dashboards: BTreeMap<String, String>,
}

/// One problem found while validating a source tree.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// File the problem was found in.
    pub path: PathBuf,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error in {}: {}", self.path.display(), self.message)
    }
}

/// Checks every SQL file of the source tree without touching the workspace.
///
/// Unlike [`Deployer::deploy`], which stops at the first problem, this
/// collects one issue per offending file.
///
/// # Errors
///
/// Returns an error if the source tree itself cannot be read.
pub async fn validate(config: &Config) -> Result<Vec<ValidationIssue>, Box<dyn Error>> {
    let mut issues = Vec::new();
    for folder in queries::scan(&config.source_path).await? {
        for path in queries::sql_files(&folder).await? {
            match queries::load_query(&folder, &path, None).await {
                Ok(query) => {
                    if let Err(e) = VizSpec::from_map(&query.viz) {
                        issues.push(ValidationIssue {
                            path: path.clone(),
                            message: e.to_string(),
                        });
                    }
                    if let Err(e) = WidgetSpec::from_map(&query.widget) {
                        issues.push(ValidationIssue {
                            path: path.clone(),
                            message: e.to_string(),
                        });
                    }
                }
                Err(e) => issues.push(ValidationIssue {
                    path: path.clone(),
                    message: e.to_string(),
                }),
            }
        }
    }
    Ok(issues)
}

/// Deployment engine for one source tree and one workspace.
pub struct Deployer<A> {
    api: A,
    config: Config,
    transform: Option<Box<QueryTransform>>,
    state: InstallState,
    next_row: u32,
}

impl<A: WorkspaceApi> Deployer<A> {
    /// Creates a deployer over a workspace API.
    #[must_use]
    pub fn new(api: A, config: Config) -> Self {
        Self {
            api,
            config,
            transform: None,
            state: InstallState::new(),
            next_row: 0,
        }
    }

    /// Sets a transform that rewrites query text before deployment.
    #[must_use]
    pub fn with_transform(mut self, transform: Box<QueryTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// The id mapping as of the last `deploy` or `fetch_state` call.
    #[must_use]
    pub fn state(&self) -> &InstallState {
        &self.state
    }

    /// Browser URL of a deployed dashboard, if its id is known.
    #[must_use]
    pub fn dashboard_url(&self, dashboard_ref: &str) -> Option<String> {
        let id = self.state.get(&state::dashboard_key(dashboard_ref))?;
        let host = self.config.workspace.host.trim_end_matches('/');
        Some(format!("{host}/sql/dashboards/{id}"))
    }

    /// Deploys the whole source tree and garbage-collects orphans.
    ///
    /// # Errors
    ///
    /// Returns an error if the source tree cannot be read or a workspace
    /// call fails. Orphan deletion failures are logged, not returned.
    #[tracing::instrument(skip_all)]
    pub async fn deploy(&mut self) -> Result<DeployReport, Box<dyn Error>> {
        let folders = queries::scan(&self.config.source_path).await?;
        let parent = self.load_state().await?;
        let data_source_id = self.data_source_id().await?;

        let mut report = DeployReport::default();
        let mut desired = BTreeSet::new();
        self.next_row = 0;

        for folder in &folders {
            let queries = queries::load_queries(folder, self.transform.as_deref()).await?;
            let name = folder.display_name(&self.config.name_prefix);
            tracing::info!(dashboard = %name, queries = queries.len(), "deploying dashboard");

            self.install_dashboard(folder, &name, &parent).await?;
            for query in &queries {
                self.install_query(query, &name, &data_source_id, &parent)
                    .await?;
                self.install_viz(query).await?;
                self.install_widget(folder, query).await?;
            }

            desired.insert(state::dashboard_key(&folder.dashboard_ref));
            for query in &queries {
                desired.insert(query.query_key());
                desired.insert(query.viz_key());
                desired.insert(query.widget_key());
            }

            let id = self.recorded(&state::dashboard_key(&folder.dashboard_ref))?;
            report.dashboards.insert(folder.dashboard_ref.clone(), id);
        }

        self.cleanup_orphans(&desired).await;
        self.store_state().await?;
        Ok(report)
    }

    /// Downloads the state file without deploying anything.
    ///
    /// A missing state file leaves the mapping empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails or the file is corrupt.
    pub async fn fetch_state(&mut self) -> Result<(), Box<dyn Error>> {
        let path = self.state_path();
        match self.api.export(&path).await {
            Ok(bytes) => {
                self.state = InstallState::from_json(&bytes)
                    .map_err(|e| format!("Failed to parse {path}: {e}"))?;
                Ok(())
            }
            Err(e) if e.is_missing() => {
                self.state = InstallState::new();
                Ok(())
            }
            Err(e) => Err(format!("Failed to download {path}: {e}").into()),
        }
    }

    /// Downloads and reconciles the state file, creating the workspace root
    /// if needed. Returns the `parent` folder reference new objects go in.
    async fn load_state(&mut self) -> Result<String, Box<dyn Error>> {
        let path = self.state_path();
        match self.api.export(&path).await {
            Ok(bytes) => {
                self.state = match InstallState::from_json(&bytes) {
                    Ok(state) => state,
                    Err(e) => {
                        tracing::warn!(%path, error = %e, "state file is corrupt, starting over");
                        InstallState::new()
                    }
                };
                self.prune_missing_queries().await?;
            }
            Err(e) if e.is_missing() => {
                self.api
                    .mkdirs(&self.config.workspace_root)
                    .await
                    .map_err(|e| format!("Failed to create {}: {e}", self.config.workspace_root))?;
                self.state = InstallState::new();
            }
            Err(e) => return Err(format!("Failed to download {path}: {e}").into()),
        }

        let info = self
            .api
            .get_status(&self.config.workspace_root)
            .await
            .map_err(|e| format!("Failed to stat {}: {e}", self.config.workspace_root))?;
        Ok(format!("folders/{}", info.object_id))
    }

    /// Drops state entries of queries that were deleted behind our back, so
    /// they are recreated instead of updated into a 404.
    async fn prune_missing_queries(&mut self) -> Result<(), Box<dyn Error>> {
        let recorded: Vec<(String, String)> = self
            .state
            .iter()
            .filter(|(key, _)| {
                key.rsplit_once(':').and_then(|(_, kind)| StateKind::parse(kind))
                    == Some(StateKind::QueryId)
            })
            .map(|(key, id)| (key.to_string(), id.to_string()))
            .collect();

        for (key, id) in recorded {
            match self.api.get_query(&id).await {
                Ok(_) => {}
                Err(e) if e.is_missing() => {
                    tracing::debug!(%key, %id, "dropping state entry for deleted query");
                    self.state.remove(&key);
                }
                Err(e) => return Err(format!("Failed to check query {id}: {e}").into()),
            }
        }
        Ok(())
    }

    /// Resolves the data source backing the configured warehouse, falling
    /// back to the first warehouse of the workspace.
    async fn data_source_id(&self) -> Result<String, Box<dyn Error>> {
        let warehouse_id = match &self.config.warehouse_id {
            Some(id) => id.clone(),
            None => {
                let warehouses = self.api.list_warehouses().await?;
                let Some(first) = warehouses.into_iter().next() else {
                    return Err(
                        "need either a configured warehouse_id or an existing SQL warehouse".into(),
                    );
                };
                tracing::debug!(warehouse = %first.id, "no warehouse configured, using the first one");
                first.id
            }
        };

        let data_sources = self.api.list_data_sources().await?;
        data_sources
            .into_iter()
            .find(|ds| ds.warehouse_id.as_deref() == Some(warehouse_id.as_str()))
            .map(|ds| ds.id)
            .ok_or_else(|| format!("no data source maps to SQL warehouse {warehouse_id}").into())
    }

    async fn install_dashboard(
        &mut self,
        folder: &DashboardFolder,
        name: &str,
        parent: &str,
    ) -> Result<(), Box<dyn Error>> {
        let key = state::dashboard_key(&folder.dashboard_ref);
        if let Some(id) = self.state.get(&key).map(ToString::to_string) {
            match self.api.get_dashboard(&id).await {
                Ok(dashboard) => {
                    // Widgets are recreated every run, so clear the grid
                    for widget in dashboard.widgets {
                        self.api.delete_widget(&widget.id).await.map_err(|e| {
                            format!("Failed to delete widget {}: {e}", widget.id)
                        })?;
                    }
                    return Ok(());
                }
                Err(e) if e.is_missing() => {
                    tracing::warn!(dashboard = %name, %id, "recorded dashboard is gone, recreating");
                    self.state.remove(&key);
                }
                Err(e) => return Err(format!("Failed to fetch dashboard {id}: {e}").into()),
            }
        }

        let dashboard = self
            .api
            .create_dashboard(&DashboardCreate {
                name: name.to_string(),
                parent: Some(parent.to_string()),
                run_as_role: Some(RunAsRole::Viewer),
            })
            .await
            .map_err(|e| format!("Failed to create dashboard {name}: {e}"))?;
        self.api
            .set_permissions(
                ObjectTypePlural::Dashboards,
                &dashboard.id,
                &[AccessControl::group("users", PermissionLevel::CanView)],
            )
            .await
            .map_err(|e| format!("Failed to share dashboard {name}: {e}"))?;
        self.state.insert(key, dashboard.id);
        Ok(())
    }

    async fn install_query(
        &mut self,
        query: &QueryFile,
        dashboard_name: &str,
        data_source_id: &str,
        parent: &str,
    ) -> Result<(), Box<dyn Error>> {
        let name = format!("{dashboard_name} - {}", query.name);
        let key = query.query_key();

        if let Some(id) = self.state.get(&key).map(ToString::to_string) {
            self.api
                .update_query(
                    &id,
                    &QueryUpdate {
                        data_source_id: data_source_id.to_string(),
                        name,
                        query: query.text.clone(),
                    },
                )
                .await
                .map_err(|e| format!("Failed to update query {id}: {e}"))?;
            return Ok(());
        }

        let created = self
            .api
            .create_query(&QueryCreate {
                data_source_id: data_source_id.to_string(),
                name,
                query: query.text.clone(),
                parent: Some(parent.to_string()),
                run_as_role: Some(RunAsRole::Viewer),
            })
            .await
            .map_err(|e| format!("Failed to create query {}: {e}", query.name))?;
        self.api
            .set_permissions(
                ObjectTypePlural::Queries,
                &created.id,
                &[AccessControl::group("users", PermissionLevel::CanRun)],
            )
            .await
            .map_err(|e| format!("Failed to share query {}: {e}", query.name))?;
        self.state.insert(key, created.id);
        Ok(())
    }

    async fn install_viz(&mut self, query: &QueryFile) -> Result<(), Box<dyn Error>> {
        let spec = VizSpec::from_map(&query.viz).map_err(|e| format!("{}: {e}", query.name))?;
        let key = query.viz_key();

        if let Some(id) = self.state.get(&key).map(ToString::to_string) {
            self.api
                .update_visualization(
                    &id,
                    &VisualizationUpdate {
                        viz_type: spec.viz_type().to_string(),
                        name: spec.name().to_string(),
                        description: spec.description().map(str::to_string),
                        options: spec.options(),
                    },
                )
                .await
                .map_err(|e| format!("Failed to update visualization {id}: {e}"))?;
            return Ok(());
        }

        let viz = self
            .api
            .create_visualization(&VisualizationCreate {
                query_id: self.recorded(&query.query_key())?,
                viz_type: spec.viz_type().to_string(),
                name: spec.name().to_string(),
                description: spec.description().map(str::to_string),
                options: spec.options(),
            })
            .await
            .map_err(|e| format!("Failed to create visualization for {}: {e}", query.name))?;
        self.state.insert(key, viz.id);
        Ok(())
    }

    async fn install_widget(
        &mut self,
        folder: &DashboardFolder,
        query: &QueryFile,
    ) -> Result<(), Box<dyn Error>> {
        let widget =
            WidgetSpec::from_map(&query.widget).map_err(|e| format!("{}: {e}", query.name))?;
        let dashboard_id = self.recorded(&state::dashboard_key(&folder.dashboard_ref))?;
        let visualization_id = self.recorded(&query.viz_key())?;

        let options = widget.options(&mut self.next_row);
        let created = self
            .api
            .create_widget(&WidgetCreate {
                dashboard_id,
                options,
                width: 1,
                visualization_id: Some(visualization_id),
                text: None,
            })
            .await
            .map_err(|e| format!("Failed to create widget for {}: {e}", query.name))?;
        self.state.insert(query.widget_key(), created.id);
        Ok(())
    }

    /// Deletes objects whose state keys are no longer desired.
    async fn cleanup_orphans(&mut self, desired: &BTreeSet<String>) {
        for (kind, id) in self.state.retain_desired(desired) {
            let result = match kind {
                StateKind::QueryId => self.api.delete_query(&id).await,
                StateKind::VizId => self.api.delete_visualization(&id).await,
                StateKind::WidgetId => self.api.delete_widget(&id).await,
                StateKind::DashboardId => Ok(()),
            };
            if let Err(e) = result {
                tracing::info!(kind = kind.as_str(), %id, error = %e, "failed to delete orphaned object");
            }
        }
    }

    async fn store_state(&self) -> Result<(), Box<dyn Error>> {
        let path = self.state_path();
        tracing::debug!(%path, entries = self.state.len(), "uploading state");
        let bytes = self.state.to_json()?;
        self.api
            .import(&path, &bytes, ImportFormat::Auto, true)
            .await
            .map_err(|e| format!("Failed to upload {path}: {e}"))?;
        Ok(())
    }

    fn state_path(&self) -> String {
        format!("{}/{STATE_FILE}", self.config.workspace_root)
    }

    fn recorded(&self, key: &str) -> Result<String, Box<dyn Error>> {
        self.state
            .get(key)
            .map(ToString::to_string)
            .ok_or_else(|| format!("No state entry for {key}").into())
    }
}
