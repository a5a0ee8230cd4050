// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Deployment engine tests covering the create, update and garbage
//! collection paths.

use sqldeck_core::Deployer;
use sqldeck_dbsql::PermissionLevel;

use crate::common::{
    FakeWorkspace, fake_workspace, sample_counter_sql, sample_table_sql, setup_temp_dirs,
    state_path, test_config,
};

#[tokio::test]
async fn deploy_creates_full_stack() {
    // Arrange
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    dirs.create_sql_file("sales", "main_kpis", "20_total.sql", &sample_counter_sql())
        .await
        .unwrap();
    let fake = fake_workspace();
    let mut deployer = Deployer::new(fake.clone(), test_config(&dirs.source_path));

    // Act
    let report = deployer.deploy().await.unwrap();

    // Assert - dashboard
    assert_eq!(report.dashboards.len(), 1);
    let dashboard_id = report.dashboards.get("sales_main_kpis").unwrap();
    assert_eq!(
        fake.dashboard_name(dashboard_id).as_deref(),
        Some("[TEST] Sales (Main_Kpis)")
    );
    assert_eq!(
        deployer.dashboard_url("sales_main_kpis").unwrap(),
        format!("https://adb-1234.example.net/sql/dashboards/{dashboard_id}")
    );

    // Assert - queries carry the dashboard name and the resolved data source
    let queries = fake.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(
        queries[0].name.as_deref(),
        Some("[TEST] Sales (Main_Kpis) - 10_revenue.sql")
    );
    assert_eq!(
        queries[1].name.as_deref(),
        Some("[TEST] Sales (Main_Kpis) - 20_total.sql")
    );
    for query in &queries {
        assert_eq!(query.data_source_id.as_deref(), Some("ds-1"));
    }

    // Assert - widgets: explicit row honored, auto row follows file order
    let widgets = fake.widgets_of(dashboard_id);
    assert_eq!(widgets.len(), 2);
    let first = widgets[0].position.as_ref().unwrap();
    assert_eq!((first.col, first.row, first.size_x, first.size_y), (0, 1, 6, 8));
    let second = widgets[1].position.as_ref().unwrap();
    assert_eq!((second.col, second.row, second.size_x, second.size_y), (0, 2, 3, 3));

    // Assert - dashboards are shared read-only, queries as runnable
    let permissions = fake.permissions();
    assert!(
        permissions.contains(&(format!("dashboards/{dashboard_id}"), PermissionLevel::CanView))
    );
    assert_eq!(
        permissions
            .iter()
            .filter(|(path, level)| path.starts_with("queries/")
                && *level == PermissionLevel::CanRun)
            .count(),
        2
    );

    // Assert - state file uploaded with one entry per object
    let state: serde_json::Value =
        serde_json::from_slice(&fake.file(&state_path()).unwrap()).unwrap();
    assert_eq!(state.as_object().unwrap().len(), 7);
    assert_eq!(state["sales_main_kpis:dashboard_id"], *dashboard_id);
}

#[tokio::test]
async fn deploy_second_run_updates_in_place() {
    // Arrange
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    dirs.create_sql_file("sales", "main_kpis", "20_total.sql", &sample_counter_sql())
        .await
        .unwrap();
    let fake = fake_workspace();
    let mut deployer = Deployer::new(fake.clone(), test_config(&dirs.source_path));
    deployer.deploy().await.unwrap();
    let queries_before: Vec<_> = fake.queries().into_iter().map(|q| q.id).collect();
    let permissions_before = fake.permissions().len();

    // Act
    let report = deployer.deploy().await.unwrap();

    // Assert - same queries and dashboard, nothing recreated
    let queries_after: Vec<_> = fake.queries().into_iter().map(|q| q.id).collect();
    assert_eq!(queries_after, queries_before);
    assert_eq!(fake.dashboard_ids().len(), 1);
    assert_eq!(report.dashboards.len(), 1);

    // Assert - no permissions granted again on the update path
    assert_eq!(fake.permissions().len(), permissions_before);

    // Assert - widgets wiped and recreated for a clean grid
    let dashboard_id = report.dashboards.get("sales_main_kpis").unwrap();
    let widgets = fake.widgets_of(dashboard_id);
    assert_eq!(widgets.len(), 2);
    assert_eq!(widgets[0].position.as_ref().unwrap().row, 1);
    assert_eq!(widgets[1].position.as_ref().unwrap().row, 2);
    assert_eq!(fake.deletions().len(), 2, "both old widgets deleted");
}

#[tokio::test]
async fn deploy_removes_orphaned_query() {
    // Arrange
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    dirs.create_sql_file("sales", "main_kpis", "20_total.sql", &sample_counter_sql())
        .await
        .unwrap();
    let fake = fake_workspace();
    let mut deployer = Deployer::new(fake.clone(), test_config(&dirs.source_path));
    deployer.deploy().await.unwrap();
    let orphan_id = fake
        .queries()
        .into_iter()
        .find(|q| q.name.as_deref().unwrap().ends_with("20_total.sql"))
        .unwrap()
        .id;

    // Act - drop one file and redeploy
    dirs.remove_sql_file("sales", "main_kpis", "20_total.sql")
        .await
        .unwrap();
    deployer.deploy().await.unwrap();

    // Assert - the backing query is gone, remotely and from the state
    assert!(fake.query(&orphan_id).is_none());
    assert!(fake.deletions().contains(&orphan_id));
    let state: serde_json::Value =
        serde_json::from_slice(&fake.file(&state_path()).unwrap()).unwrap();
    assert!(
        state
            .as_object()
            .unwrap()
            .keys()
            .all(|key| !key.contains("20_total.sql"))
    );

    // Assert - the surviving query keeps its widget
    let dashboard_id = state["sales_main_kpis:dashboard_id"].as_str().unwrap();
    assert_eq!(fake.widgets_of(dashboard_id).len(), 1);
}

#[tokio::test]
async fn deploy_recreates_dashboard_deleted_behind_our_back() {
    // Arrange
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    let fake = fake_workspace();
    let mut deployer = Deployer::new(fake.clone(), test_config(&dirs.source_path));
    let report = deployer.deploy().await.unwrap();
    let old_id = report.dashboards.get("sales_main_kpis").unwrap().clone();
    let query_ids: Vec<_> = fake.queries().into_iter().map(|q| q.id).collect();

    // Act - someone deletes the dashboard in the workspace UI
    fake.remove_dashboard(&old_id);
    let report = deployer.deploy().await.unwrap();

    // Assert - a fresh dashboard, same queries
    let new_id = report.dashboards.get("sales_main_kpis").unwrap();
    assert_ne!(*new_id, old_id);
    assert_eq!(fake.dashboard_ids(), vec![new_id.clone()]);
    let kept: Vec<_> = fake.queries().into_iter().map(|q| q.id).collect();
    assert_eq!(kept, query_ids);
    assert_eq!(fake.widgets_of(new_id).len(), 1);
    assert!(fake.deletions().is_empty(), "nothing deleted through the API");
}

#[tokio::test]
async fn deploy_without_warehouse_fails() {
    // Arrange - empty workspace, nothing configured
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    let fake = FakeWorkspace::new();
    let mut config = test_config(&dirs.source_path);
    config.warehouse_id = None;
    let mut deployer = Deployer::new(fake.clone(), config);

    // Act
    let err = deployer.deploy().await.unwrap_err();

    // Assert - clear error, and no partial state uploaded
    assert!(err.to_string().contains("warehouse"), "got: {err}");
    assert!(fake.file(&state_path()).is_none());
}

#[tokio::test]
async fn deploy_fails_when_no_data_source_matches() {
    // Arrange - a warehouse without a data source mapping
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    let fake = FakeWorkspace::new();
    fake.add_warehouse("w1", "Main");
    let mut deployer = Deployer::new(fake.clone(), test_config(&dirs.source_path));

    // Act
    let err = deployer.deploy().await.unwrap_err();

    // Assert
    assert!(err.to_string().contains("data source"), "got: {err}");
}

#[tokio::test]
async fn deploy_applies_transform_before_upload() {
    // Arrange
    let dirs = setup_temp_dirs().await.unwrap();
    let sql = "-- viz type=counter, name=Total, value_column=n\n\
               -- widget title=Total\n\
               SELECT count(*) AS n FROM $catalog.sales\n";
    dirs.create_sql_file("sales", "main_kpis", "10_total.sql", sql)
        .await
        .unwrap();
    let fake = fake_workspace();
    let mut deployer = Deployer::new(fake.clone(), test_config(&dirs.source_path))
        .with_transform(Box::new(|text| text.replace("$catalog", "hive_metastore")));

    // Act
    deployer.deploy().await.unwrap();

    // Assert
    let query = fake.queries().remove(0);
    let text = query.query.unwrap();
    assert!(text.contains("hive_metastore.sales"));
    assert!(!text.contains("$catalog"));
}
