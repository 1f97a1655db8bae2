//! Client for the upstream financial-data API.
//!
//! Every call is a JSON POST authenticated with the client id and secret
//! headers. Non-success answers are decoded into [`PlaidError`] when the body
//! allows it.

use std::{fmt, time::Duration};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    config::{BaseUrlError, Config},
    error::{AppError, PlaidError},
    models::{account::Account, link::LinkTokenResponse, transaction::Transaction},
};

/// API version pinned on every request.
const API_VERSION: &str = "2020-09-14";

/// Upper bound the upstream accepts for `count` on `/transactions/get`.
pub const MAX_TRANSACTIONS_PER_PAGE: u32 = 500;

/// Settings sent with every link token request.
#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub client_name: String,
    pub products: Vec<String>,
    pub country_codes: Vec<String>,
    pub language: String,
    pub redirect_uri: Option<String>,
    pub webhook: Option<String>,
}

impl From<&Config> for LinkSettings {
    fn from(config: &Config) -> Self {
        Self {
            client_name: config.client_name.clone(),
            products: config.plaid_products.clone(),
            country_codes: config.plaid_country_codes.clone(),
            language: config.link_language.clone(),
            redirect_uri: config.plaid_redirect_uri.clone(),
            webhook: config.plaid_webhook_url.clone(),
        }
    }
}

/// Failure while constructing the client at startup.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error(transparent)]
    BaseUrl(#[from] BaseUrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Upstream API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct PlaidClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    secret: String,
    link: LinkSettings,
}

impl fmt::Debug for PlaidClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaidClient")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct LinkUser<'a> {
    client_user_id: &'a str,
}

#[derive(Debug, Serialize)]
struct LinkTokenCreateRequest<'a> {
    client_name: &'a str,
    user: LinkUser<'a>,
    products: &'a [String],
    country_codes: &'a [String],
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PublicTokenExchangeRequest<'a> {
    public_token: &'a str,
}

/// Result of exchanging a public token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchange {
    pub access_token: String,
    pub item_id: String,
}

#[derive(Debug, Serialize)]
struct AccessTokenRequest<'a> {
    access_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccountsGetResponse {
    accounts: Vec<Account>,
}

#[derive(Debug, Serialize)]
struct TransactionsGetOptions {
    count: u32,
    offset: u32,
}

#[derive(Debug, Serialize)]
struct TransactionsGetRequest<'a> {
    access_token: &'a str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    options: TransactionsGetOptions,
}

/// One page of transactions.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsPage {
    pub transactions: Vec<Transaction>,
    pub total_transactions: u32,
}

/// Date window and paging for a transactions query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionsQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub count: u32,
    pub offset: u32,
}

impl PlaidClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ClientBuildError> {
        let base_url = config.plaid_base_url()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            client_id: config.plaid_client_id.clone(),
            secret: config.plaid_secret.clone(),
            link: LinkSettings::from(config),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a link token for one end user.
    pub async fn create_link_token(
        &self,
        client_user_id: &str,
    ) -> Result<LinkTokenResponse, AppError> {
        let request = LinkTokenCreateRequest {
            client_name: &self.link.client_name,
            user: LinkUser { client_user_id },
            products: &self.link.products,
            country_codes: &self.link.country_codes,
            language: &self.link.language,
            redirect_uri: self.link.redirect_uri.as_deref(),
            webhook: self.link.webhook.as_deref(),
        };

        self.post("/link/token/create", &request).await
    }

    /// Exchange a public token from the Link UI for an access token.
    pub async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<TokenExchange, AppError> {
        self.post(
            "/item/public_token/exchange",
            &PublicTokenExchangeRequest { public_token },
        )
        .await
    }

    /// List the accounts of an item.
    pub async fn get_accounts(&self, access_token: &str) -> Result<Vec<Account>, AppError> {
        let response: AccountsGetResponse = self
            .post("/accounts/get", &AccessTokenRequest { access_token })
            .await?;

        Ok(response.accounts)
    }

    /// Fetch one page of transactions of an item.
    pub async fn get_transactions(
        &self,
        access_token: &str,
        query: TransactionsQuery,
    ) -> Result<TransactionsPage, AppError> {
        let request = TransactionsGetRequest {
            access_token,
            start_date: query.start_date,
            end_date: query.end_date,
            options: TransactionsGetOptions {
                count: query.count,
                offset: query.offset,
            },
        };

        self.post("/transactions/get", &request).await
    }

    /// POST a JSON body and decode the JSON answer.
    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, AppError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .header("PLAID-CLIENT-ID", &self.client_id)
            .header("PLAID-SECRET", &self.secret)
            .header("Plaid-Version", API_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Resp>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        tracing::warn!(path, status = status.as_u16(), "Upstream call failed");

        Err(decode_error(status.as_u16(), &text))
    }
}

/// Turn a non-success upstream answer into an [`AppError`].
fn decode_error(status: u16, body: &str) -> AppError {
    match serde_json::from_str::<PlaidError>(body) {
        Ok(mut err) => {
            err.status = status;
            AppError::Plaid(err)
        }
        Err(_) => AppError::UpstreamStatus(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_structured_error() {
        let body = json!({
            "error_type": "ITEM_ERROR",
            "error_code": "PRODUCT_NOT_READY",
            "error_message": "the requested product is not yet ready",
            "display_message": null,
            "request_id": "abc"
        })
        .to_string();

        match decode_error(400, &body) {
            AppError::Plaid(err) => {
                assert_eq!(err.status, 400);
                assert_eq!(err.error_type, "ITEM_ERROR");
                assert_eq!(err.error_code, "PRODUCT_NOT_READY");
                assert_eq!(err.request_id.as_deref(), Some("abc"));
                assert!(err.display_message.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_unreadable_error() {
        assert!(matches!(
            decode_error(503, "<html>Service Unavailable</html>"),
            AppError::UpstreamStatus(503)
        ));
    }

    #[test]
    fn test_link_token_request_omits_unset_options() {
        let products = vec!["transactions".to_string()];
        let country_codes = vec!["US".to_string()];
        let request = LinkTokenCreateRequest {
            client_name: "Test App",
            user: LinkUser {
                client_user_id: "user-1",
            },
            products: &products,
            country_codes: &country_codes,
            language: "en",
            redirect_uri: None,
            webhook: Some("https://example.com/hook"),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["user"]["client_user_id"], "user-1");
        assert_eq!(value["products"], json!(["transactions"]));
        assert_eq!(value["webhook"], "https://example.com/hook");
        assert!(value.get("redirect_uri").is_none());
    }

    #[test]
    fn test_transactions_request_shape() {
        let request = TransactionsGetRequest {
            access_token: "access-1",
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            options: TransactionsGetOptions {
                count: 50,
                offset: 10,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["start_date"], "2025-01-01");
        assert_eq!(value["end_date"], "2025-01-31");
        assert_eq!(value["options"], json!({ "count": 50, "offset": 10 }));
    }
}
