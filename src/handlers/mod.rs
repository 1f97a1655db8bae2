//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives the JSON request body
//! 2. Looks up stored items and calls the upstream API
//! 3. Returns a JSON response or an `AppError`

/// Account listing endpoint
pub mod accounts;
/// Health probe mounted by the server, outside the API routes
pub mod health;
/// Link token creation and public token exchange
pub mod link;
/// Transaction retrieval endpoint
pub mod transactions;
