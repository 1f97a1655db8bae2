//! Route table of the API and composition of the full application.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | POST | /create-link-token | `create_link_token` |
//! | POST | /exchange-public-token | `exchange_public_token` |
//! | POST | /accounts | `get_accounts` |
//! | POST | /transactions | `get_transactions` |

use axum::{
    Router,
    handler::Handler,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

pub const CREATE_LINK_TOKEN_PATH: &str = "/create-link-token";
pub const EXCHANGE_PUBLIC_TOKEN_PATH: &str = "/exchange-public-token";
pub const ACCOUNTS_PATH: &str = "/accounts";
pub const TRANSACTIONS_PATH: &str = "/transactions";

/// Prefix under which [`build_app`] mounts [`api_routes`].
pub const API_PREFIX: &str = "/api";

/// Bind the four API endpoints to the given handlers.
///
/// Each handler is registered as-is for POST on its path; nothing runs until
/// a request arrives. The returned router is generic over the parent's state
/// so it can be nested or merged into any server.
pub fn api_routes<
    S,
    CreateLink,
    CreateLinkArgs,
    Exchange,
    ExchangeArgs,
    Accounts,
    AccountsArgs,
    Transactions,
    TransactionsArgs,
>(
    create_link_token: CreateLink,
    exchange_public_token: Exchange,
    get_accounts: Accounts,
    get_transactions: Transactions,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    CreateLink: Handler<CreateLinkArgs, S>,
    CreateLinkArgs: 'static,
    Exchange: Handler<ExchangeArgs, S>,
    ExchangeArgs: 'static,
    Accounts: Handler<AccountsArgs, S>,
    AccountsArgs: 'static,
    Transactions: Handler<TransactionsArgs, S>,
    TransactionsArgs: 'static,
{
    Router::new()
        .route(CREATE_LINK_TOKEN_PATH, post(create_link_token))
        .route(EXCHANGE_PUBLIC_TOKEN_PATH, post(exchange_public_token))
        .route(ACCOUNTS_PATH, post(get_accounts))
        .route(TRANSACTIONS_PATH, post(get_transactions))
}

/// Build the complete application: health probe, API routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let api = api_routes(
        handlers::link::create_link_token,
        handlers::link::exchange_public_token,
        handlers::accounts::get_accounts,
        handlers::transactions::get_transactions,
    );

    // Browser front-ends call the API directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Public routes
        .route("/health", get(handlers::health::health_check))
        .nest(API_PREFIX, api)
        .layer(cors)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share the upstream client and item store with all handlers via State extraction
        .with_state(state)
}
