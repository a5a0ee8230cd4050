// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Client for the Databricks SQL queries/dashboards REST API and the workspace file API.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

mod client;
mod config;
mod error;
mod http;
mod request;
mod response;

pub use crate::client::DbsqlClient;
pub use crate::config::{AuthMethod, WorkspaceConfig};
pub use crate::error::DbsqlError;
pub use crate::request::{
    AccessControl, DashboardCreate, ImportFormat, ObjectTypePlural, PermissionLevel, QueryCreate,
    QueryUpdate, RunAsRole, VisualizationCreate, VisualizationUpdate, WidgetCreate, WidgetOptions,
    WidgetPosition,
};
pub use crate::response::{
    Dashboard, DataSource, ObjectInfo, Query, Visualization, Warehouse, Widget,
};
