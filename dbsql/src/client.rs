// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Databricks client for SQL query, visualization, widget and dashboard operations.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::WorkspaceConfig;
use crate::error::DbsqlError;
use crate::http::HttpClient;
use crate::request::{
    AccessControl, DashboardCreate, ImportFormat, ObjectTypePlural, QueryCreate, QueryUpdate,
    VisualizationCreate, VisualizationUpdate, WidgetCreate,
};
use crate::response::{
    Dashboard, DataSource, ExportedContent, ObjectInfo, Query, Visualization, Warehouse,
    WarehouseList, Widget,
};

/// Root of the legacy SQL queries/dashboards API.
const SQL_API: &str = "/api/2.0/preview/sql";

/// SQL warehouse listing endpoint.
const WAREHOUSES_API: &str = "/api/2.0/sql/warehouses";

/// Root of the workspace file API.
const WORKSPACE_API: &str = "/api/2.0/workspace";

/// Databricks client for managing SQL queries, visualizations, widgets and
/// dashboards, plus the workspace files they live next to.
///
/// # Example
///
/// ```ignore
/// use sqldeck_dbsql::{AuthMethod, DbsqlClient, WorkspaceConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = WorkspaceConfig {
///     host: "https://adb-1234.5.azuredatabricks.net".to_string(),
///     auth: AuthMethod::Bearer {
///         token: "dapi...".to_string(),
///     },
///     ..Default::default()
/// };
///
/// let client = DbsqlClient::new(config)?;
/// let warehouses = client.list_warehouses().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DbsqlClient {
    http: Arc<HttpClient>,
    config: WorkspaceConfig,
}

impl DbsqlClient {
    /// Creates a new Databricks client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: WorkspaceConfig) -> Result<Self, DbsqlError> {
        let http = HttpClient::new(config.clone())?;
        Ok(Self {
            http: Arc::new(http),
            config,
        })
    }

    /// Workspace base URL without a trailing slash.
    #[must_use]
    pub fn host(&self) -> &str {
        self.config.host.trim_end_matches('/')
    }

    /// Creates a SQL query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_query(&self, req: &QueryCreate) -> Result<Query, DbsqlError> {
        self.post(&format!("{SQL_API}/queries"), req).await
    }

    /// Updates a SQL query in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the query does not exist.
    pub async fn update_query(&self, id: &str, req: &QueryUpdate) -> Result<Query, DbsqlError> {
        self.post(&format!("{SQL_API}/queries/{id}"), req).await
    }

    /// Fetches a SQL query by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the query does not exist.
    pub async fn get_query(&self, id: &str) -> Result<Query, DbsqlError> {
        self.get(&format!("{SQL_API}/queries/{id}")).await
    }

    /// Moves a SQL query to the trash.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_query(&self, id: &str) -> Result<(), DbsqlError> {
        self.delete(&format!("{SQL_API}/queries/{id}")).await
    }

    /// Creates a visualization on a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_visualization(
        &self,
        req: &VisualizationCreate,
    ) -> Result<Visualization, DbsqlError> {
        self.post(&format!("{SQL_API}/visualizations"), req).await
    }

    /// Updates a visualization in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the visualization does not exist.
    pub async fn update_visualization(
        &self,
        id: &str,
        req: &VisualizationUpdate,
    ) -> Result<Visualization, DbsqlError> {
        self.post(&format!("{SQL_API}/visualizations/{id}"), req)
            .await
    }

    /// Deletes a visualization.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_visualization(&self, id: &str) -> Result<(), DbsqlError> {
        self.delete(&format!("{SQL_API}/visualizations/{id}")).await
    }

    /// Places a widget on a dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_widget(&self, req: &WidgetCreate) -> Result<Widget, DbsqlError> {
        self.post(&format!("{SQL_API}/widgets"), req).await
    }

    /// Removes a widget from its dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_widget(&self, id: &str) -> Result<(), DbsqlError> {
        self.delete(&format!("{SQL_API}/widgets/{id}")).await
    }

    /// Creates a dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_dashboard(&self, req: &DashboardCreate) -> Result<Dashboard, DbsqlError> {
        self.post(&format!("{SQL_API}/dashboards"), req).await
    }

    /// Fetches a dashboard, including its widgets.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the dashboard does not exist.
    pub async fn get_dashboard(&self, id: &str) -> Result<Dashboard, DbsqlError> {
        self.get(&format!("{SQL_API}/dashboards/{id}")).await
    }

    /// Replaces the access control list of a SQL object.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn set_permissions(
        &self,
        object_type: ObjectTypePlural,
        id: &str,
        acl: &[AccessControl],
    ) -> Result<(), DbsqlError> {
        #[derive(Serialize)]
        struct SetPermissions<'a> {
            access_control_list: &'a [AccessControl],
        }

        let path = format!("{SQL_API}/permissions/{}/{id}", object_type.as_str());
        self.post_no_response(
            &path,
            &SetPermissions {
                access_control_list: acl,
            },
        )
        .await
    }

    /// Lists the data sources SQL objects may execute against.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_data_sources(&self) -> Result<Vec<DataSource>, DbsqlError> {
        self.get(&format!("{SQL_API}/data_sources")).await
    }

    /// Lists the SQL warehouses of the workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>, DbsqlError> {
        let list: WarehouseList = self.get(WAREHOUSES_API).await?;
        Ok(list.warehouses)
    }

    /// Fetches metadata of a workspace object.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the path does not exist.
    pub async fn get_status(&self, path: &str) -> Result<ObjectInfo, DbsqlError> {
        self.get_with_query(&format!("{WORKSPACE_API}/get-status"), &[("path", path)])
            .await
    }

    /// Creates a workspace directory, including missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mkdirs(&self, path: &str) -> Result<(), DbsqlError> {
        #[derive(Serialize)]
        struct Mkdirs<'a> {
            path: &'a str,
        }

        self.post_no_response(&format!("{WORKSPACE_API}/mkdirs"), &Mkdirs { path })
            .await
    }

    /// Uploads a file into the workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, or if `overwrite` is false and
    /// the path already exists.
    pub async fn import(
        &self,
        path: &str,
        content: &[u8],
        format: ImportFormat,
        overwrite: bool,
    ) -> Result<(), DbsqlError> {
        #[derive(Serialize)]
        struct Import<'a> {
            path: &'a str,
            content: String,
            format: ImportFormat,
            overwrite: bool,
        }

        let body = Import {
            path,
            content: BASE64.encode(content),
            format,
            overwrite,
        };
        self.post_no_response(&format!("{WORKSPACE_API}/import"), &body)
            .await
    }

    /// Downloads a file from the workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the path does not exist.
    pub async fn export(&self, path: &str) -> Result<Vec<u8>, DbsqlError> {
        let exported: ExportedContent = self
            .get_with_query(&format!("{WORKSPACE_API}/export"), &[("path", path)])
            .await?;
        Ok(BASE64.decode(exported.content)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DbsqlError> {
        let url = self.full_url(path);
        let req = self.http.build_request(Method::GET, &url);
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DbsqlError> {
        let url = self.full_url(path);
        let req = self.http.build_request(Method::GET, &url).query(query);
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, DbsqlError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.full_url(path);
        let req = self.http.build_request(Method::POST, &url).json(body);
        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    async fn post_no_response<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), DbsqlError> {
        let url = self.full_url(path);
        let req = self.http.build_request(Method::POST, &url).json(body);
        self.http.execute(req).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), DbsqlError> {
        let url = self.full_url(path);
        let req = self.http.build_request(Method::DELETE, &url);
        self.http.execute(req).await?;
        Ok(())
    }

    fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.config.host.trim_end_matches('/'), path)
    }
}
