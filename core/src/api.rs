// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Seam between the deployment engine and the workspace REST client, so the
//! engine can run against an in-memory double in tests.

use async_trait::async_trait;
use sqldeck_dbsql::{
    AccessControl, Dashboard, DashboardCreate, DataSource, DbsqlClient, DbsqlError, ImportFormat,
    ObjectInfo, ObjectTypePlural, Query, QueryCreate, QueryUpdate, Visualization,
    VisualizationCreate, VisualizationUpdate, Warehouse, Widget, WidgetCreate,
};

/// Operations the deployment engine needs from a Databricks workspace.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Creates a SQL query.
    async fn create_query(&self, req: &QueryCreate) -> Result<Query, DbsqlError>;

    /// Updates a SQL query in place.
    async fn update_query(&self, id: &str, req: &QueryUpdate) -> Result<Query, DbsqlError>;

    /// Fetches a SQL query by id.
    async fn get_query(&self, id: &str) -> Result<Query, DbsqlError>;

    /// Moves a SQL query to the trash.
    async fn delete_query(&self, id: &str) -> Result<(), DbsqlError>;

    /// Creates a visualization on a query.
    async fn create_visualization(
        &self,
        req: &VisualizationCreate,
    ) -> Result<Visualization, DbsqlError>;

    /// Updates a visualization in place.
    async fn update_visualization(
        &self,
        id: &str,
        req: &VisualizationUpdate,
    ) -> Result<Visualization, DbsqlError>;

    /// Deletes a visualization.
    async fn delete_visualization(&self, id: &str) -> Result<(), DbsqlError>;

    /// Places a widget on a dashboard.
    async fn create_widget(&self, req: &WidgetCreate) -> Result<Widget, DbsqlError>;

    /// Removes a widget from its dashboard.
    async fn delete_widget(&self, id: &str) -> Result<(), DbsqlError>;

    /// Creates a dashboard.
    async fn create_dashboard(&self, req: &DashboardCreate) -> Result<Dashboard, DbsqlError>;

    /// Fetches a dashboard, including its widgets.
    async fn get_dashboard(&self, id: &str) -> Result<Dashboard, DbsqlError>;

    /// Replaces the access control list of a SQL object.
    async fn set_permissions(
        &self,
        object_type: ObjectTypePlural,
        id: &str,
        acl: &[AccessControl],
    ) -> Result<(), DbsqlError>;

    /// Lists the data sources SQL objects may execute against.
    async fn list_data_sources(&self) -> Result<Vec<DataSource>, DbsqlError>;

    /// Lists the SQL warehouses of the workspace.
    async fn list_warehouses(&self) -> Result<Vec<Warehouse>, DbsqlError>;

    /// Fetches metadata of a workspace object.
    async fn get_status(&self, path: &str) -> Result<ObjectInfo, DbsqlError>;

    /// Creates a workspace directory, including missing parents.
    async fn mkdirs(&self, path: &str) -> Result<(), DbsqlError>;

    /// Uploads a file into the workspace.
    async fn import(
        &self,
        path: &str,
        content: &[u8],
        format: ImportFormat,
        overwrite: bool,
    ) -> Result<(), DbsqlError>;

    /// Downloads a file from the workspace.
    async fn export(&self, path: &str) -> Result<Vec<u8>, DbsqlError>;
}

#[async_trait]
impl WorkspaceApi for DbsqlClient {
    async fn create_query(&self, req: &QueryCreate) -> Result<Query, DbsqlError> {
        self.create_query(req).await
    }

    async fn update_query(&self, id: &str, req: &QueryUpdate) -> Result<Query, DbsqlError> {
        self.update_query(id, req).await
    }

    async fn get_query(&self, id: &str) -> Result<Query, DbsqlError> {
        self.get_query(id).await
    }

    async fn delete_query(&self, id: &str) -> Result<(), DbsqlError> {
        self.delete_query(id).await
    }

    async fn create_visualization(
        &self,
        req: &VisualizationCreate,
    ) -> Result<Visualization, DbsqlError> {
        self.create_visualization(req).await
    }

    async fn update_visualization(
        &self,
        id: &str,
        req: &VisualizationUpdate,
    ) -> Result<Visualization, DbsqlError> {
        self.update_visualization(id, req).await
    }

    async fn delete_visualization(&self, id: &str) -> Result<(), DbsqlError> {
        self.delete_visualization(id).await
    }

    async fn create_widget(&self, req: &WidgetCreate) -> Result<Widget, DbsqlError> {
        self.create_widget(req).await
    }

    async fn delete_widget(&self, id: &str) -> Result<(), DbsqlError> {
        self.delete_widget(id).await
    }

    async fn create_dashboard(&self, req: &DashboardCreate) -> Result<Dashboard, DbsqlError> {
        self.create_dashboard(req).await
    }

    async fn get_dashboard(&self, id: &str) -> Result<Dashboard, DbsqlError> {
        self.get_dashboard(id).await
    }

    async fn set_permissions(
        &self,
        object_type: ObjectTypePlural,
        id: &str,
        acl: &[AccessControl],
    ) -> Result<(), DbsqlError> {
        self.set_permissions(object_type, id, acl).await
    }

    async fn list_data_sources(&self) -> Result<Vec<DataSource>, DbsqlError> {
        self.list_data_sources().await
    }

    async fn list_warehouses(&self) -> Result<Vec<Warehouse>, DbsqlError> {
        self.list_warehouses().await
    }

    async fn get_status(&self, path: &str) -> Result<ObjectInfo, DbsqlError> {
        self.get_status(path).await
    }

    async fn mkdirs(&self, path: &str) -> Result<(), DbsqlError> {
        self.mkdirs(path).await
    }

    async fn import(
        &self,
        path: &str,
        content: &[u8],
        format: ImportFormat,
        overwrite: bool,
    ) -> Result<(), DbsqlError> {
        self.import(path, content, format, overwrite).await
    }

    async fn export(&self, path: &str) -> Result<Vec<u8>, DbsqlError> {
        self.export(path).await
    }
}
