//! Client for a sports-venue booking backend.
//!
//! Covers the quote-then-book workflow, normalization of the backend's
//! varying reservation shapes, list sorting, local stores for the session and a
//! bounded quote cache, and the operator's admin listing.

pub mod api;
pub mod booking;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod session;
pub mod sort;
pub mod store;
pub mod wire;

pub use api::ApiClient;
pub use error::{ApiError, Result};
pub use session::Session;
