use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{ReservationAction, ReservationStatus};

/// Errors surfaced by the booking client.
///
/// Validation variants are raised before any request leaves the process.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid time window: end {end} must be later than start {start}")]
    InvalidTimeWindow { start: String, end: String },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Non-2xx response. `message` is already extracted from the body.
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    /// 2xx response whose body lacks something the client needs
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The session lacks the login or role an operation requires
    #[error("{0}")]
    NotPermitted(String),

    #[error("cannot {action} a reservation that is {from}")]
    InvalidTransition {
        from: ReservationStatus,
        action: ReservationAction,
    },
}

impl ApiError {
    /// HTTP status of the failed call, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// True for 404 responses and server messages that read "not found".
    ///
    /// Only answers from the server qualify; transport and decode failures
    /// are never not-found, whatever their text contains.
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::Http { status, message } => {
                *status == StatusCode::NOT_FOUND
                    || message.to_lowercase().contains("not found")
            }
            _ => false,
        }
    }

    /// True when this error was raised locally, without a network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::Validation(_)
                | ApiError::InvalidTimeWindow { .. }
                | ApiError::MissingField(_)
                | ApiError::InvalidTransition { .. }
        )
    }

    /// Message shown to the user at the flow boundary.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
