//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;
use url::Url;

/// Upstream environment the service talks to.
///
/// Parsed from `PLAID_ENV` (lowercase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaidEnv {
    Sandbox,
    Development,
    Production,
}

impl PlaidEnv {
    /// Base URL of the upstream API for this environment.
    pub fn base_url(self) -> &'static str {
        match self {
            PlaidEnv::Sandbox => "https://sandbox.plaid.com",
            PlaidEnv::Development => "https://development.plaid.com",
            PlaidEnv::Production => "https://production.plaid.com",
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `PLAID_CLIENT_ID` (required): upstream client id
/// - `PLAID_SECRET` (required): upstream secret
/// - `PLAID_ENV` (optional): `sandbox`, `development` or `production`, defaults to sandbox
/// - `PLAID_BASE_URL` (optional): overrides the environment's base URL
/// - `PLAID_PRODUCTS` (optional): comma separated products, defaults to `transactions`
/// - `PLAID_COUNTRY_CODES` (optional): comma separated country codes, defaults to `US`
/// - `PLAID_REDIRECT_URI` (optional): OAuth redirect URI passed to Link
/// - `PLAID_WEBHOOK_URL` (optional): webhook URL registered on new link tokens
/// - `CLIENT_NAME` (optional): name displayed in the Link UI
/// - `LINK_LANGUAGE` (optional): Link UI language, defaults to `en`
/// - `UPSTREAM_TIMEOUT_SECS` (optional): upstream request timeout, defaults to 10
/// - `DATABASE_URL` (optional): PostgreSQL connection string; linked items are kept in memory without it
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub plaid_client_id: String,

    pub plaid_secret: String,

    #[serde(default = "default_env")]
    pub plaid_env: PlaidEnv,

    pub plaid_base_url: Option<String>,

    #[serde(default = "default_products")]
    pub plaid_products: Vec<String>,

    #[serde(default = "default_country_codes")]
    pub plaid_country_codes: Vec<String>,

    pub plaid_redirect_uri: Option<String>,

    pub plaid_webhook_url: Option<String>,

    #[serde(default = "default_client_name")]
    pub client_name: String,

    #[serde(default = "default_language")]
    pub link_language: String,

    #[serde(default = "default_timeout_secs")]
    pub upstream_timeout_secs: u64,

    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,
}

fn default_env() -> PlaidEnv {
    PlaidEnv::Sandbox
}

fn default_products() -> Vec<String> {
    vec!["transactions".to_string()]
}

fn default_country_codes() -> Vec<String> {
    vec!["US".to_string()]
}

fn default_client_name() -> String {
    "Financial Link Server".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

/// The resolved upstream base URL is not usable.
#[derive(Debug, thiserror::Error)]
pub enum BaseUrlError {
    #[error("invalid upstream base URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("upstream base URL must use http or https, got `{0}`")]
    Scheme(String),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., PLAID_CLIENT_ID)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: plaid_client_id -> PLAID_CLIENT_ID
        envy::from_env::<Config>()
    }

    /// Build configuration from explicit key/value pairs instead of the process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
    }

    /// Upstream base URL: the explicit override if set, otherwise the one for `PLAID_ENV`.
    pub fn plaid_base_url(&self) -> Result<Url, BaseUrlError> {
        let raw = self
            .plaid_base_url
            .as_deref()
            .unwrap_or_else(|| self.plaid_env.base_url());

        let url = Url::parse(raw)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(BaseUrlError::Scheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[
            ("PLAID_CLIENT_ID", "client"),
            ("PLAID_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.plaid_env, PlaidEnv::Sandbox);
        assert_eq!(config.plaid_products, vec!["transactions"]);
        assert_eq!(config.plaid_country_codes, vec!["US"]);
        assert_eq!(config.link_language, "en");
        assert_eq!(config.upstream_timeout_secs, 10);
        assert_eq!(config.server_port, 3000);
        assert!(config.database_url.is_none());
        assert!(config.plaid_redirect_uri.is_none());
        assert_eq!(
            config.plaid_base_url().unwrap().as_str(),
            "https://sandbox.plaid.com/"
        );
    }

    #[test]
    fn test_missing_credentials() {
        let result = Config::from_vars(vars(&[("PLAID_CLIENT_ID", "client")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_lists_and_env() {
        let config = Config::from_vars(vars(&[
            ("PLAID_CLIENT_ID", "client"),
            ("PLAID_SECRET", "secret"),
            ("PLAID_ENV", "production"),
            ("PLAID_PRODUCTS", "auth,transactions"),
            ("PLAID_COUNTRY_CODES", "US,CA"),
            ("SERVER_PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.plaid_env, PlaidEnv::Production);
        assert_eq!(config.plaid_products, vec!["auth", "transactions"]);
        assert_eq!(config.plaid_country_codes, vec!["US", "CA"]);
        assert_eq!(config.server_port, 8080);
        assert_eq!(
            config.plaid_base_url().unwrap().as_str(),
            "https://production.plaid.com/"
        );
    }

    #[test]
    fn test_base_url_override() {
        let mut config = Config::from_vars(vars(&[
            ("PLAID_CLIENT_ID", "client"),
            ("PLAID_SECRET", "secret"),
            ("PLAID_BASE_URL", "http://127.0.0.1:9000"),
        ]))
        .unwrap();

        assert_eq!(
            config.plaid_base_url().unwrap().as_str(),
            "http://127.0.0.1:9000/"
        );

        config.plaid_base_url = Some("ftp://example.com".to_string());
        assert!(matches!(
            config.plaid_base_url(),
            Err(BaseUrlError::Scheme(_))
        ));

        config.plaid_base_url = Some("not a url".to_string());
        assert!(matches!(
            config.plaid_base_url(),
            Err(BaseUrlError::Parse(_))
        ));
    }
}
