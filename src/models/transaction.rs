//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: a posted or pending transaction reported upstream
//! - `TransactionsRequest`: Request body with the item and date window
//! - `TransactionsResponse`: Response body returned to clients

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single transaction on one of an item's accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,

    pub account_id: String,

    /// Positive values are money leaving the account, negative values money coming in.
    pub amount: f64,

    #[serde(default)]
    pub iso_currency_code: Option<String>,

    /// Posting date (or authorization date while pending), `YYYY-MM-DD`
    pub date: NaiveDate,

    pub name: String,

    #[serde(default)]
    pub merchant_name: Option<String>,

    pub pending: bool,

    #[serde(default)]
    pub category: Option<Vec<String>>,

    /// "online", "in store" or "other"
    #[serde(default)]
    pub payment_channel: Option<String>,
}

/// Request body for `POST /api/transactions`.
///
/// ```json
/// {
///   "item_id": "eVBnVMp7zdTJLkRNr33Rs6zr7KNJqBFL9DrE6",
///   "start_date": "2025-11-01",
///   "end_date": "2025-11-30",
///   "count": 100,
///   "offset": 0
/// }
/// ```
///
/// Only `item_id` is required. The window defaults to the last 30 days.
#[derive(Debug, Deserialize)]
pub struct TransactionsRequest {
    pub item_id: String,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub count: Option<u32>,

    #[serde(default)]
    pub offset: Option<u32>,
}

/// Response body for `POST /api/transactions`.
#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub item_id: String,

    /// Total number of transactions in the window, across all pages
    pub total_transactions: u32,

    pub transactions: Vec<Transaction>,
}
