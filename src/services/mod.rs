//! Business logic services.
//!
//! Services hold the outbound integrations separated from HTTP handlers.

pub mod plaid_client;
