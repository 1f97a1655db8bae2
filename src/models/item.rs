//! Linked item model.
//!
//! An item is one set of institution credentials linked through the public
//! token exchange. Only the access token needed for later calls is kept.

use chrono::{DateTime, Utc};

/// Represents a linked item record.
///
/// # Database Table
///
/// Maps to the `linked_items` table, keyed by `item_id`. Linking the same
/// item again replaces its access token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LinkedItem {
    /// Upstream identifier of the item
    pub item_id: String,

    /// Long-lived token for calls on this item.
    ///
    /// Never returned to clients and never logged in clear.
    pub access_token: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}
