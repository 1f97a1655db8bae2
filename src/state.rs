//! Shared application state injected into handlers.

use crate::{db::ItemStore, services::plaid_client::PlaidClient};

/// State cloned into every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub plaid: PlaidClient,
    pub items: ItemStore,
}

impl AppState {
    pub fn new(plaid: PlaidClient, items: ItemStore) -> Self {
        Self { plaid, items }
    }
}
