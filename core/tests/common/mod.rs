// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - An in-memory fake of the workspace API
//! - Test data factories (fixtures)
//! - Temporary source tree management with auto-cleanup

mod fixtures;
mod temp_dir;

#[allow(unused_imports)]
pub use fake::FakeWorkspace;
#[allow(unused_imports)]
pub use fixtures::{
    WORKSPACE_ROOT, fake_workspace, sample_counter_sql, sample_sql_bad_widget,
    sample_sql_unknown_viz_type, sample_sql_without_viz, sample_table_sql, state_path,
    test_config,
};
#[allow(unused_imports)]
pub use temp_dir::{TempDirs, setup_temp_dirs};
