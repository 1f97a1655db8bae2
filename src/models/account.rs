//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: an account as reported by the financial-data API
//! - `AccountsRequest`: Request body for listing accounts of an item
//! - `AccountsResponse`: Response body returned to clients

use serde::{Deserialize, Serialize};

/// An account held at the institution behind a linked item.
///
/// Deserialized from the upstream `/accounts/get` answer and serialized
/// unchanged to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,

    pub name: String,

    #[serde(default)]
    pub official_name: Option<String>,

    /// Last digits of the account number
    #[serde(default)]
    pub mask: Option<String>,

    /// Account type, e.g. "depository", "credit", "loan"
    #[serde(rename = "type")]
    pub account_type: String,

    #[serde(default)]
    pub subtype: Option<String>,

    pub balances: Balances,
}

/// Account balances.
///
/// Amounts are decimal units of the account currency as the upstream reports
/// them, not cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balances {
    #[serde(default)]
    pub available: Option<f64>,

    #[serde(default)]
    pub current: Option<f64>,

    #[serde(default)]
    pub limit: Option<f64>,

    /// ISO 4217 code; null when `unofficial_currency_code` is set
    #[serde(default)]
    pub iso_currency_code: Option<String>,

    #[serde(default)]
    pub unofficial_currency_code: Option<String>,
}

/// Request body for `POST /api/accounts`.
#[derive(Debug, Deserialize)]
pub struct AccountsRequest {
    pub item_id: String,
}

/// Response body for `POST /api/accounts`.
#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub item_id: String,
    pub accounts: Vec<Account>,
}
