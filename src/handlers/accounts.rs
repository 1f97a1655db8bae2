//! Account listing HTTP handler.
//!
//! - POST /api/accounts - List the accounts of a linked item

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    models::account::{AccountsRequest, AccountsResponse},
    state::AppState,
};

/// List all accounts of a linked item.
///
/// # Endpoint
///
/// `POST /api/accounts`
///
/// # Request Body
///
/// ```json
/// { "item_id": "M5eVJqLnv3tbzdngLDp9FL5OlDNxlNhlE55op" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: accounts with balances
/// - **Error (404)**: item was never linked
/// - **Error (4xx/502)**: upstream error
///
/// ```json
/// {
///   "item_id": "M5eVJqLnv3tbzdngLDp9FL5OlDNxlNhlE55op",
///   "accounts": [
///     {
///       "account_id": "BxBXxLj1m4HMXBm9WZZmCWVbPjX16EHwv99vp",
///       "name": "Plaid Checking",
///       "mask": "0000",
///       "type": "depository",
///       "subtype": "checking",
///       "balances": { "available": 100, "current": 110, "iso_currency_code": "USD" }
///     }
///   ]
/// }
/// ```
pub async fn get_accounts(
    State(state): State<AppState>,
    Json(request): Json<AccountsRequest>,
) -> Result<Json<AccountsResponse>, AppError> {
    let access_token = state
        .items
        .access_token(&request.item_id)
        .await?
        .ok_or(AppError::ItemNotFound)?;

    let accounts = state.plaid.get_accounts(&access_token).await?;

    Ok(Json(AccountsResponse {
        item_id: request.item_id,
        accounts,
    }))
}
