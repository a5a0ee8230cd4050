// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! State file lifecycle tests: corrupt state, persistence across engine
//! instances, and what garbage collection leaves behind.

use std::collections::BTreeMap;

use sqldeck_core::Deployer;

use crate::common::{
    fake_workspace, sample_table_sql, setup_temp_dirs, state_path, test_config,
};

fn read_state(fake: &crate::common::FakeWorkspace) -> BTreeMap<String, String> {
    serde_json::from_slice(&fake.file(&state_path()).unwrap()).unwrap()
}

#[tokio::test]
async fn lifecycle_corrupt_state_starts_over() {
    // Arrange - a state file that is not JSON
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    let fake = fake_workspace();
    fake.put_file(&state_path(), b"{ definitely not json");
    let mut deployer = Deployer::new(fake.clone(), test_config(&dirs.source_path));

    // Act
    let report = deployer.deploy().await.unwrap();

    // Assert - deployed from scratch and the file is valid again
    assert_eq!(report.dashboards.len(), 1);
    let state = read_state(&fake);
    assert_eq!(state.len(), 4);
    assert!(state.contains_key("sales_main_kpis:dashboard_id"));
}

#[tokio::test]
async fn lifecycle_state_survives_engine_instances() {
    // Arrange
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    let fake = fake_workspace();
    let config = test_config(&dirs.source_path);
    let mut first = Deployer::new(fake.clone(), config.clone());
    let report = first.deploy().await.unwrap();
    let dashboard_id = report.dashboards.get("sales_main_kpis").unwrap().clone();

    // Act - a brand new engine picks up where the first left off
    let mut second = Deployer::new(fake.clone(), config);
    let report = second.deploy().await.unwrap();

    // Assert - the dashboard was reused, not recreated
    assert_eq!(report.dashboards.get("sales_main_kpis"), Some(&dashboard_id));
    assert_eq!(fake.dashboard_ids(), vec![dashboard_id.clone()]);
    assert_eq!(fake.queries().len(), 1);
    assert_eq!(read_state(&fake)["sales_main_kpis:dashboard_id"], dashboard_id);
}

#[tokio::test]
async fn lifecycle_fetch_state_reads_without_deploying() {
    // Arrange
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    let fake = fake_workspace();
    let config = test_config(&dirs.source_path);
    Deployer::new(fake.clone(), config.clone())
        .deploy()
        .await
        .unwrap();
    let queries_before = fake.queries().len();

    // Act
    let mut reader = Deployer::new(fake.clone(), config);
    reader.fetch_state().await.unwrap();

    // Assert - the URL is resolvable and nothing was touched
    assert!(reader.dashboard_url("sales_main_kpis").is_some());
    assert!(reader.dashboard_url("unknown_ref").is_none());
    assert_eq!(fake.queries().len(), queries_before);
}

#[tokio::test]
async fn lifecycle_fetch_state_tolerates_missing_file() {
    let fake = fake_workspace();
    let dirs = setup_temp_dirs().await.unwrap();
    let mut deployer = Deployer::new(fake, test_config(&dirs.source_path));

    deployer.fetch_state().await.unwrap();

    assert!(deployer.state().is_empty());
    assert!(deployer.dashboard_url("sales_main_kpis").is_none());
}

#[tokio::test]
async fn lifecycle_removing_folder_keeps_remote_dashboard() {
    // Arrange
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    let fake = fake_workspace();
    let mut deployer = Deployer::new(fake.clone(), test_config(&dirs.source_path));
    let report = deployer.deploy().await.unwrap();
    let dashboard_id = report.dashboards.get("sales_main_kpis").unwrap().clone();

    // Act - the whole dashboard folder disappears from the tree
    dirs.remove_dashboard_dir("sales", "main_kpis").await.unwrap();
    let report = deployer.deploy().await.unwrap();

    // Assert - queries, viz and widget are gone but the dashboard stays
    assert!(report.dashboards.is_empty());
    assert_eq!(fake.dashboard_ids(), vec![dashboard_id.clone()]);
    assert!(fake.queries().is_empty());
    assert_eq!(fake.deletions().len(), 3);
    assert!(!fake.deletions().contains(&dashboard_id));

    // Assert - the state no longer tracks the dashboard either
    assert!(read_state(&fake).is_empty());
}

#[tokio::test]
async fn lifecycle_recreates_queries_deleted_behind_our_back() {
    // Arrange
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    let fake = fake_workspace();
    let mut deployer = Deployer::new(fake.clone(), test_config(&dirs.source_path));
    deployer.deploy().await.unwrap();
    let old_id = fake.queries().remove(0).id;

    // Act - someone deletes the query in the workspace UI
    fake.remove_query(&old_id);
    deployer.deploy().await.unwrap();

    // Assert - a fresh query was created and recorded
    let queries = fake.queries();
    assert_eq!(queries.len(), 1);
    assert_ne!(queries[0].id, old_id);
    assert_eq!(
        read_state(&fake)["sales_main_kpis_10_revenue.sql:query_id"],
        queries[0].id
    );
}
