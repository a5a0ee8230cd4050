// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Error code the workspace API returns for objects that do not exist.
const RESOURCE_DOES_NOT_EXIST: &str = "RESOURCE_DOES_NOT_EXIST";

/// Databricks client errors.
#[non_exhaustive]
#[derive(Debug)]
pub enum DbsqlError {
    /// HTTP layer error.
    Http(String),

    /// Error response from the REST API.
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Machine-readable error code, if the body carried one.
        error_code: Option<String>,
        /// Human-readable message.
        message: String,
    },

    /// JSON encoding/decoding error.
    Json(String),

    /// Invalid response from server.
    InvalidResponse(String),

    /// Configuration error.
    Config(String),
}

impl DbsqlError {
    /// Whether this error means the requested object does not exist.
    ///
    /// Matches both a plain HTTP 404 and the `RESOURCE_DOES_NOT_EXIST`
    /// error code some endpoints return with other statuses.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Api {
                status, error_code, ..
            } => {
                *status == 404
                    || error_code
                        .as_deref()
                        .is_some_and(|c| c == RESOURCE_DOES_NOT_EXIST)
            }
            _ => false,
        }
    }
}

impl fmt::Display for DbsqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Api {
                status,
                error_code: Some(code),
                message,
            } => write!(f, "API error {status} ({code}): {message}"),
            Self::Api {
                status,
                error_code: None,
                message,
            } => write!(f, "API error {status}: {message}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::InvalidResponse(e) => write!(f, "Invalid server response: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for DbsqlError {}

impl From<reqwest::Error> for DbsqlError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<serde_json::Error> for DbsqlError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

impl From<base64::DecodeError> for DbsqlError {
    fn from(e: base64::DecodeError) -> Self {
        Self::InvalidResponse(format!("Invalid base64 content: {e}"))
    }
}
