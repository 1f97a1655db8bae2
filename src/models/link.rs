//! Link token and public token exchange request/response types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/create-link-token`.
///
/// All fields are optional, and so is the body itself; an empty request
/// lets the server pick a user id.
#[derive(Debug, Default, Deserialize)]
pub struct CreateLinkTokenRequest {
    /// Stable identifier of the end user in the caller's system.
    ///
    /// A random UUID is generated when absent.
    #[serde(default)]
    pub client_user_id: Option<String>,
}

/// Link token returned to the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTokenResponse {
    pub link_token: String,

    /// RFC 3339 expiry timestamp as reported upstream
    pub expiration: String,
}

/// Request body for `POST /api/exchange-public-token`.
#[derive(Debug, Deserialize)]
pub struct ExchangePublicTokenRequest {
    pub public_token: String,
}

/// Response of the exchange. The access token stays on the server.
#[derive(Debug, Serialize)]
pub struct ExchangePublicTokenResponse {
    pub item_id: String,
}
