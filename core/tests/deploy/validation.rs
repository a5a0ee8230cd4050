// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Offline validation tests: every broken file is reported, good trees
//! pass without touching any workspace.

use sqldeck_core::validate;

use crate::common::{
    sample_counter_sql, sample_sql_bad_widget, sample_sql_unknown_viz_type,
    sample_sql_without_viz, sample_table_sql, setup_temp_dirs, test_config,
};

#[tokio::test]
async fn validation_passes_clean_tree() {
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    dirs.create_sql_file("sales", "main_kpis", "20_total.sql", &sample_counter_sql())
        .await
        .unwrap();

    let issues = validate(&test_config(&dirs.source_path)).await.unwrap();

    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[tokio::test]
async fn validation_collects_issue_per_broken_file() {
    // Arrange - three files, each broken differently
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "a.sql", &sample_sql_without_viz())
        .await
        .unwrap();
    dirs.create_sql_file("sales", "main_kpis", "b.sql", &sample_sql_unknown_viz_type())
        .await
        .unwrap();
    dirs.create_sql_file("sales", "main_kpis", "c.sql", &sample_sql_bad_widget())
        .await
        .unwrap();

    // Act
    let issues = validate(&test_config(&dirs.source_path)).await.unwrap();

    // Assert - one issue per file, in file order
    assert_eq!(issues.len(), 3, "got: {issues:?}");
    assert!(issues[0].path.ends_with("a.sql"));
    assert!(issues[0].message.contains("-- viz"));
    assert!(issues[1].path.ends_with("b.sql"));
    assert!(issues[1].message.contains("unknown viz type: pie"));
    assert!(issues[2].path.ends_with("c.sql"));
    assert!(issues[2].message.contains("invalid value"));

    // Display names the file so the output is actionable on its own
    let text = issues[0].to_string();
    assert!(text.starts_with("error in "), "got: {text}");
    assert!(text.contains("a.sql"));
}

#[tokio::test]
async fn validation_reports_viz_and_widget_separately() {
    // Arrange - one file with a broken viz and a broken widget
    let dirs = setup_temp_dirs().await.unwrap();
    let sql = "-- viz type=table, name=Broken\n-- widget row=soon\nSELECT 1\n";
    dirs.create_sql_file("sales", "main_kpis", "broken.sql", sql)
        .await
        .unwrap();

    // Act
    let issues = validate(&test_config(&dirs.source_path)).await.unwrap();

    // Assert - the missing columns key and the bad row are both reported
    assert_eq!(issues.len(), 2, "got: {issues:?}");
    assert!(issues[0].message.contains("columns"));
    assert!(issues[1].message.contains("row"));
}

#[tokio::test]
async fn validation_spans_multiple_dashboards() {
    let dirs = setup_temp_dirs().await.unwrap();
    dirs.create_sql_file("sales", "main_kpis", "10_revenue.sql", &sample_table_sql())
        .await
        .unwrap();
    dirs.create_sql_file("ops", "alerts", "bad.sql", &sample_sql_without_viz())
        .await
        .unwrap();

    let issues = validate(&test_config(&dirs.source_path)).await.unwrap();

    assert_eq!(issues.len(), 1);
    assert!(issues[0].path.ends_with("bad.sql"));
}
