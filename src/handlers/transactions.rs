//! Transaction retrieval HTTP handler.
//!
//! - POST /api/transactions - Fetch one page of transactions of a linked item

use axum::{Json, extract::State};
use chrono::{Days, NaiveDate, Utc};

use crate::{
    error::AppError,
    models::transaction::{TransactionsRequest, TransactionsResponse},
    services::plaid_client::{MAX_TRANSACTIONS_PER_PAGE, TransactionsQuery},
    state::AppState,
};

/// Window used when the request gives no start date.
const DEFAULT_WINDOW_DAYS: u64 = 30;

const DEFAULT_PAGE_SIZE: u32 = 100;

/// Get transactions of a linked item.
///
/// # Endpoint
///
/// `POST /api/transactions`
///
/// # Validation
///
/// - `start_date` must not be after `end_date`
/// - `count` must be between 1 and 500
///
/// # Response (200)
///
/// ```json
/// {
///   "item_id": "M5eVJqLnv3tbzdngLDp9FL5OlDNxlNhlE55op",
///   "total_transactions": 1,
///   "transactions": [
///     {
///       "transaction_id": "lPNjeW1nR6CDn5okmGQ6hEpMo4lLNoSrzqDje",
///       "account_id": "BxBXxLj1m4HMXBm9WZZmCWVbPjX16EHwv99vp",
///       "amount": 2307.21,
///       "iso_currency_code": "USD",
///       "date": "2025-11-29",
///       "name": "Apple Store",
///       "pending": false
///     }
///   ]
/// }
/// ```
pub async fn get_transactions(
    State(state): State<AppState>,
    Json(request): Json<TransactionsRequest>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let query = resolve_query(&request, Utc::now().date_naive())?;

    let access_token = state
        .items
        .access_token(&request.item_id)
        .await?
        .ok_or(AppError::ItemNotFound)?;

    let page = state.plaid.get_transactions(&access_token, query).await?;

    Ok(Json(TransactionsResponse {
        item_id: request.item_id,
        total_transactions: page.total_transactions,
        transactions: page.transactions,
    }))
}

/// Fill in defaults and validate the requested window.
fn resolve_query(
    request: &TransactionsRequest,
    today: NaiveDate,
) -> Result<TransactionsQuery, AppError> {
    let end_date = request.end_date.unwrap_or(today);
    let start_date = match request.start_date {
        Some(date) => date,
        None => end_date
            .checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN),
    };

    if start_date > end_date {
        return Err(AppError::InvalidRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }

    let count = request.count.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_TRANSACTIONS_PER_PAGE).contains(&count) {
        return Err(AppError::InvalidRequest(format!(
            "count must be between 1 and {MAX_TRANSACTIONS_PER_PAGE}"
        )));
    }

    Ok(TransactionsQuery {
        start_date,
        end_date,
        count,
        offset: request.offset.unwrap_or(0),
    })
}
