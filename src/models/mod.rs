//! Data models for stored items and the JSON bodies exchanged with clients and upstream.

pub mod account;
pub mod item;
pub mod link;
pub mod transaction;
