// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.

use std::path::Path;

use sqldeck_core::{Config, STATE_FILE};
use sqldeck_dbsql::WorkspaceConfig;

use crate::common::FakeWorkspace;

/// Workspace folder the test configuration deploys into.
pub const WORKSPACE_ROOT: &str = "/Users/tester@example.com/.sqldeck";

/// Creates a test configuration rooted at the given source tree.
///
/// The configuration pins warehouse `w1`, matching the warehouse that
/// [`fake_workspace`] registers.
#[must_use]
pub fn test_config(source_path: &Path) -> Config {
    Config {
        source_path: source_path.to_path_buf(),
        workspace_root: WORKSPACE_ROOT.to_string(),
        name_prefix: "[TEST]".to_string(),
        warehouse_id: Some("w1".to_string()),
        workspace: WorkspaceConfig {
            host: "https://adb-1234.example.net".to_string(),
            ..WorkspaceConfig::default()
        },
    }
}

/// Creates a fake workspace with one warehouse and a matching data source.
#[must_use]
pub fn fake_workspace() -> FakeWorkspace {
    let fake = FakeWorkspace::new();
    fake.add_warehouse("w1", "Main");
    fake.add_data_source("ds-1", "w1");
    fake
}

/// Workspace path of the deployed state file.
#[must_use]
pub fn state_path() -> String {
    format!("{WORKSPACE_ROOT}/{STATE_FILE}")
}

/// Returns SQL for a table visualization over two columns.
#[must_use]
pub fn sample_table_sql() -> String {
    "-- viz type=table, name=Overview, columns=region,revenue\n\
     -- widget title=Revenue by region, col=0, row=1, size_x=6, size_y=8\n\
     SELECT region, revenue FROM main.sales\n"
        .to_string()
}

/// Returns SQL for a counter visualization without an explicit row.
#[must_use]
pub fn sample_counter_sql() -> String {
    "-- viz type=counter, name=Total rows, value_column=total\n\
     -- widget title=Totals\n\
     SELECT count(*) AS total FROM main.sales\n"
        .to_string()
}

/// Returns SQL that is missing its `-- viz` magic comment.
#[must_use]
pub fn sample_sql_without_viz() -> String {
    "-- widget title=Broken\nSELECT 1\n".to_string()
}

/// Returns SQL with an unsupported visualization type.
#[must_use]
pub fn sample_sql_unknown_viz_type() -> String {
    "-- viz type=pie, name=Shares\n-- widget title=Shares\nSELECT 1\n".to_string()
}

/// Returns SQL with a widget size that does not parse.
#[must_use]
pub fn sample_sql_bad_widget() -> String {
    "-- viz type=counter, name=Total, value_column=n\n\
     -- widget size_x=wide\n\
     SELECT count(*) AS n FROM main.sales\n"
        .to_string()
}
