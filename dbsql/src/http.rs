// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with authentication and API error mapping.

use reqwest::{Client, RequestBuilder, Response};

use crate::config::{AuthMethod, WorkspaceConfig};
use crate::error::DbsqlError;

/// Error body the REST API returns alongside non-2xx statuses.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    error_code: Option<String>,
    message: Option<String>,
}

/// HTTP client for Databricks REST operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: WorkspaceConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: WorkspaceConfig) -> Result<Self, DbsqlError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a request with authentication headers.
    pub fn build_request(&self, method: reqwest::Method, url: &str) -> RequestBuilder {
        let mut req = self.client.request(method, url);

        match &self.config.auth {
            AuthMethod::Basic { username, password } => {
                req = req.basic_auth(username, Some(password));
            }
            AuthMethod::Bearer { token } => {
                req = req.bearer_auth(token);
            }
            AuthMethod::None => {}
        }

        req
    }

    /// Executes a request and checks for HTTP errors.
    ///
    /// Non-2xx responses are decoded into [`DbsqlError::Api`], keeping the
    /// `error_code` field when the body carries the standard error JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns an error status code.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, DbsqlError> {
        let resp = req.send().await?;

        match resp.status() {
            reqwest::StatusCode::OK
            | reqwest::StatusCode::CREATED
            | reqwest::StatusCode::NO_CONTENT => Ok(resp),
            status => {
                let text = resp
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read response".to_string());
                tracing::debug!(status = status.as_u16(), body = %text, "request failed");
                Err(Self::api_error(status.as_u16(), &text))
            }
        }
    }

    /// Maps an error status and body to a [`DbsqlError::Api`].
    fn api_error(status: u16, body: &str) -> DbsqlError {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => DbsqlError::Api {
                status,
                error_code: parsed.error_code,
                message: parsed.message.unwrap_or_else(|| body.to_string()),
            },
            Err(_) => DbsqlError::Api {
                status,
                error_code: None,
                message: body.to_string(),
            },
        }
    }
}
