// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Dashboards-as-code for Databricks SQL: folders of plain SQL files are
//! scanned, validated and deployed as queries, visualizations and widgets.

mod api;
mod config;
mod deploy;
mod queries;
mod state;
mod viz;

pub use crate::api::WorkspaceApi;
pub use crate::config::{APP_NAME, Config};
pub use crate::deploy::{DeployReport, Deployer, ValidationIssue, validate};
pub use crate::queries::{
    DashboardFolder, QueryFile, QueryTransform, ScanError, SpecMap, VIZ_MARKER, WIDGET_MARKER,
    load_queries, load_query, scan, sql_files,
};
pub use crate::state::{InstallState, STATE_FILE, StateKind, dashboard_key};
pub use crate::viz::{CounterViz, SpecError, TableViz, VizSpec, WidgetSpec};
