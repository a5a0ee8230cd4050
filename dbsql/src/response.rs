// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response bodies returned by the REST API.
//!
//! Only the fields the client makes use of are modeled; unknown fields are
//! ignored during deserialization.

/// A SQL query object.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Query {
    /// Query id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// SQL text.
    #[serde(default)]
    pub query: Option<String>,
    /// Data source the query executes against.
    #[serde(default)]
    pub data_source_id: Option<String>,
}

/// A visualization attached to a query.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Visualization {
    /// Visualization id.
    pub id: String,
    /// Visualization type (e.g., `TABLE`, `COUNTER`).
    #[serde(default, rename = "type")]
    pub viz_type: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A widget placed on a dashboard.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Widget {
    /// Widget id.
    pub id: String,
    /// Visualization the widget renders, absent for text widgets.
    #[serde(default)]
    pub visualization: Option<Visualization>,
}

/// A dashboard object.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Dashboard {
    /// Dashboard id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Widgets placed on the dashboard.
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

/// A data source backing SQL execution.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DataSource {
    /// Data source id.
    pub id: String,
    /// SQL warehouse the data source maps to.
    #[serde(default)]
    pub warehouse_id: Option<String>,
}

/// A SQL warehouse.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Warehouse {
    /// Warehouse id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Lifecycle state (e.g., `RUNNING`, `STOPPED`).
    #[serde(default)]
    pub state: Option<String>,
}

/// Wrapper around the warehouse listing.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub(crate) struct WarehouseList {
    #[serde(default)]
    pub warehouses: Vec<Warehouse>,
}

/// Metadata of a workspace object.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ObjectInfo {
    /// Numeric workspace object id.
    pub object_id: i64,
    /// Object type (e.g., `DIRECTORY`, `FILE`, `NOTEBOOK`).
    #[serde(default)]
    pub object_type: Option<String>,
    /// Absolute workspace path.
    #[serde(default)]
    pub path: Option<String>,
}

/// Body of a workspace export, with base64-encoded content.
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct ExportedContent {
    pub content: String,
}
