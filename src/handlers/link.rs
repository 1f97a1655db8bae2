//! Account linking HTTP handlers.
//!
//! This module implements the two steps of linking an institution:
//! - POST /api/create-link-token - Issue a link token for the front-end
//! - POST /api/exchange-public-token - Trade the public token for an access token

use axum::{Json, extract::State};
use uuid::Uuid;

use crate::{
    db::token_fingerprint,
    error::AppError,
    models::link::{
        CreateLinkTokenRequest, ExchangePublicTokenRequest, ExchangePublicTokenResponse,
        LinkTokenResponse,
    },
    state::AppState,
};

/// Create a link token.
///
/// # Endpoint
///
/// `POST /api/create-link-token`
///
/// # Request Body
///
/// Optional. When present it must be JSON:
///
/// ```json
/// {
///   "client_user_id": "user-42"  // optional, random UUID when absent
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: the link token and its expiry
/// - **Error (400)**: empty `client_user_id` or upstream input error
/// - **Error (502)**: upstream unavailable
///
/// ```json
/// {
///   "link_token": "link-sandbox-af1a0311-da53-4636-b754-dd15cc058176",
///   "expiration": "2025-12-20T14:00:00Z"
/// }
/// ```
pub async fn create_link_token(
    State(state): State<AppState>,
    request: Option<Json<CreateLinkTokenRequest>>,
) -> Result<Json<LinkTokenResponse>, AppError> {
    // A request without a body (and without a content type) is treated as `{}`
    let request = request.map(|Json(request)| request).unwrap_or_default();

    let client_user_id = match request.client_user_id {
        Some(id) if id.trim().is_empty() => {
            return Err(AppError::InvalidRequest(
                "client_user_id must not be empty".to_string(),
            ));
        }
        Some(id) => id,
        None => Uuid::new_v4().to_string(),
    };

    let token = state.plaid.create_link_token(&client_user_id).await?;
    tracing::info!(client_user_id, "Link token created");

    Ok(Json(token))
}

/// Exchange a public token for an access token and remember the item.
///
/// # Endpoint
///
/// `POST /api/exchange-public-token`
///
/// # Request Body
///
/// ```json
/// {
///   "public_token": "public-sandbox-b0e2c4ee-a763-4df5-bfe9-46a46bce993d"
/// }
/// ```
///
/// # Response
///
/// Only the item id is returned; the access token is stored server-side.
///
/// ```json
/// {
///   "item_id": "M5eVJqLnv3tbzdngLDp9FL5OlDNxlNhlE55op"
/// }
/// ```
pub async fn exchange_public_token(
    State(state): State<AppState>,
    Json(request): Json<ExchangePublicTokenRequest>,
) -> Result<Json<ExchangePublicTokenResponse>, AppError> {
    if request.public_token.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "public_token is required".to_string(),
        ));
    }

    let exchange = state
        .plaid
        .exchange_public_token(&request.public_token)
        .await?;

    state
        .items
        .save_item(&exchange.item_id, &exchange.access_token)
        .await?;

    tracing::info!(
        item_id = %exchange.item_id,
        token = %token_fingerprint(&exchange.access_token),
        "Item linked"
    );

    Ok(Json(ExchangePublicTokenResponse {
        item_id: exchange.item_id,
    }))
}
