//! App version server
//!
//! Tells mobile clients whether a newer build exists for their platform,
//! whether installing it is mandatory, and which release notes to show.
//!
//! Architecture:
//! - SeaORM for release storage (SQLite)
//! - Axum for the HTTP API with rate limiting
//! - DashMap for the short-lived decision cache
//! - Tokio for async runtime

pub mod cache;
pub mod config;
pub mod entity;
pub mod error;
pub mod locale;
pub mod platform;
pub mod plugins;
pub mod prelude;
pub mod state;
pub mod sv;
pub mod version;
