// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request bodies for the SQL queries/dashboards API and the workspace file API.

/// Role a query or dashboard runs as when executed by a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunAsRole {
    /// Run with the owner's permissions.
    Owner,
    /// Run with the viewer's permissions.
    Viewer,
}

/// Body for creating a SQL query.
#[derive(Debug, Clone, serde::Serialize)]
pub struct QueryCreate {
    /// Data source the query executes against.
    pub data_source_id: String,
    /// Display name.
    pub name: String,
    /// SQL text.
    pub query: String,
    /// Workspace folder to create the query in (e.g., `folders/12345`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Execution role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_role: Option<RunAsRole>,
}

/// Body for updating an existing SQL query in place.
#[derive(Debug, Clone, serde::Serialize)]
pub struct QueryUpdate {
    /// Data source the query executes against.
    pub data_source_id: String,
    /// Display name.
    pub name: String,
    /// SQL text.
    pub query: String,
}

/// Body for creating a visualization on a query.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VisualizationCreate {
    /// Query the visualization belongs to.
    pub query_id: String,
    /// Visualization type (e.g., `TABLE`, `COUNTER`).
    #[serde(rename = "type")]
    pub viz_type: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Type-specific options, serialized as-is.
    pub options: serde_json::Value,
}

/// Body for updating an existing visualization.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VisualizationUpdate {
    /// Visualization type (e.g., `TABLE`, `COUNTER`).
    #[serde(rename = "type")]
    pub viz_type: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Type-specific options, serialized as-is.
    pub options: serde_json::Value,
}

/// Placement of a widget on the dashboard grid.
///
/// The API keeps these keys camelCased inside `options.position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WidgetPosition {
    /// Grid column.
    pub col: u32,
    /// Grid row.
    pub row: u32,
    /// Width in grid cells.
    #[serde(rename = "sizeX")]
    pub size_x: u32,
    /// Height in grid cells.
    #[serde(rename = "sizeY")]
    pub size_y: u32,
    /// Let the widget grow with its content.
    #[serde(rename = "autoHeight", skip_serializing_if = "Option::is_none")]
    pub auto_height: Option<bool>,
}

/// Widget display options.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WidgetOptions {
    /// Widget title. An empty string hides the title bar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional description shown below the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Placement on the dashboard grid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<WidgetPosition>,
}

/// Body for creating a dashboard widget.
///
/// A widget shows either a visualization or markdown text, so exactly one
/// of `visualization_id` and `text` should be set.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WidgetCreate {
    /// Dashboard the widget is placed on.
    pub dashboard_id: String,
    /// Display options, including grid placement.
    pub options: WidgetOptions,
    /// Widget width multiplier.
    pub width: u32,
    /// Visualization to render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization_id: Option<String>,
    /// Markdown text to render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Body for creating a dashboard.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardCreate {
    /// Display name.
    pub name: String,
    /// Workspace folder to create the dashboard in (e.g., `folders/12345`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Execution role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_role: Option<RunAsRole>,
}

/// Permission level for SQL objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionLevel {
    /// View the object.
    CanView,
    /// Run the object.
    CanRun,
    /// Manage the object.
    CanManage,
}

/// A single entry in an access control list.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AccessControl {
    /// Group the permission applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// User the permission applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Granted permission level.
    pub permission_level: PermissionLevel,
}

impl AccessControl {
    /// Grants a permission level to a group.
    #[must_use]
    pub fn group(group_name: impl Into<String>, permission_level: PermissionLevel) -> Self {
        Self {
            group_name: Some(group_name.into()),
            user_name: None,
            permission_level,
        }
    }

    /// Grants a permission level to a user.
    #[must_use]
    pub fn user(user_name: impl Into<String>, permission_level: PermissionLevel) -> Self {
        Self {
            group_name: None,
            user_name: Some(user_name.into()),
            permission_level,
        }
    }
}

/// SQL object types as they appear in permission endpoint paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectTypePlural {
    /// Alerts.
    Alerts,
    /// Dashboards.
    Dashboards,
    /// Data sources.
    DataSources,
    /// Queries.
    Queries,
}

impl ObjectTypePlural {
    /// Path segment for this object type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alerts => "alerts",
            Self::Dashboards => "dashboards",
            Self::DataSources => "data_sources",
            Self::Queries => "queries",
        }
    }
}

/// Format of a workspace import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportFormat {
    /// Infer the format from the file extension.
    Auto,
    /// Notebook source code.
    Source,
    /// HTML export.
    Html,
    /// Jupyter notebook.
    Jupyter,
    /// Databricks archive.
    Dbc,
}
