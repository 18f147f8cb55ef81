//! Typed endpoints of the booking backend.
//!
//! One [`ApiClient`] serves every endpoint group; each group lives in its own
//! `impl ApiClient` block.

pub mod admin;
pub mod auth;
pub mod availability;
pub mod client;
pub mod reservations;
pub mod reviews;
pub mod venues;

pub use admin::AdminOverview;
pub use client::{extract_error_message, ApiClient};
pub use reviews::ReviewOutcome;
