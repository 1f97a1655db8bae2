//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

/// Error body returned by the upstream financial-data API.
///
/// ```json
/// {
///   "error_type": "INVALID_INPUT",
///   "error_code": "INVALID_PUBLIC_TOKEN",
///   "error_message": "provided public token is in an invalid format",
///   "display_message": null,
///   "request_id": "HNTDNrA8F1shFEW"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PlaidError {
    pub error_type: String,
    pub error_code: String,
    pub error_message: String,
    #[serde(default)]
    pub display_message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,

    /// HTTP status the upstream answered with. Not part of the body.
    #[serde(skip)]
    pub status: u16,
}

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from the item store
/// - **Upstream Errors**: Transport failures or error bodies from the financial-data API
/// - **Resource Errors**: Requested item has never been linked
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The upstream API could not be reached or its answer could not be decoded.
    ///
    /// Returns HTTP 502 Bad Gateway.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream API answered with a structured error.
    ///
    /// Client errors (4xx) keep their status; server errors become 502.
    #[error("Upstream error {}: {}", .0.error_code, .0.error_message)]
    Plaid(PlaidError),

    /// The upstream API answered with a non-success status and an unreadable body.
    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    /// No access token is stored for the requested item.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Item not found")]
    ItemNotFound,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `ItemNotFound` → 404 Not Found
/// - `InvalidRequest` → 400 Bad Request
/// - `Plaid` → upstream 4xx status, or 502 for upstream 5xx
/// - `Upstream`, `UpstreamStatus` → 502 Bad Gateway
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::ItemNotFound => (
                StatusCode::NOT_FOUND,
                "item_not_found".to_string(),
                self.to_string(),
            ),
            AppError::InvalidRequest(ref msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_request".to_string(),
                msg.clone(),
            ),
            AppError::Plaid(ref err) => {
                let status = StatusCode::from_u16(err.status)
                    .ok()
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                if status.is_server_error() {
                    tracing::error!(
                        error_type = %err.error_type,
                        error_code = %err.error_code,
                        request_id = ?err.request_id,
                        "Upstream server error: {}",
                        err.error_message
                    );
                }
                let message = err
                    .display_message
                    .clone()
                    .unwrap_or_else(|| err.error_message.clone());
                (status, err.error_code.to_lowercase(), message)
            }
            AppError::UpstreamStatus(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error".to_string(),
                    self.to_string(),
                )
            }
            AppError::Upstream(ref e) => {
                tracing::error!("Upstream request failed: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_unavailable".to_string(),
                    "The financial data provider is unavailable".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".to_string(),
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn plaid_error(status: u16, display_message: Option<&str>) -> PlaidError {
        PlaidError {
            error_type: "INVALID_INPUT".to_string(),
            error_code: "INVALID_PUBLIC_TOKEN".to_string(),
            error_message: "provided public token is in an invalid format".to_string(),
            display_message: display_message.map(str::to_string),
            request_id: Some("req-1".to_string()),
            status,
        }
    }

    #[tokio::test]
    async fn test_item_not_found() {
        let (status, body) = render(AppError::ItemNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "item_not_found");
        assert_eq!(body["error"]["message"], "Item not found");
    }

    #[tokio::test]
    async fn test_invalid_request_keeps_message() {
        let (status, body) =
            render(AppError::InvalidRequest("public_token is required".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_request");
        assert_eq!(body["error"]["message"], "public_token is required");
    }

    #[tokio::test]
    async fn test_upstream_client_error_passes_status() {
        let (status, body) = render(AppError::Plaid(plaid_error(400, None))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_public_token");
        assert_eq!(
            body["error"]["message"],
            "provided public token is in an invalid format"
        );
    }

    #[tokio::test]
    async fn test_upstream_display_message_preferred() {
        let (status, body) = render(AppError::Plaid(plaid_error(
            429,
            Some("Too many requests, try again later"),
        )))
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["message"], "Too many requests, try again later");
    }

    #[tokio::test]
    async fn test_upstream_server_error_becomes_bad_gateway() {
        let (status, _) = render(AppError::Plaid(plaid_error(500, None))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, body) = render(AppError::UpstreamStatus(503)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "upstream_error");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let (status, body) = render(AppError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "internal_error");
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }
}
