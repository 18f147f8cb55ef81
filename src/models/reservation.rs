use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::normalize::normalize_status;

/// A reservation in canonical client form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique reservation identifier
    pub id: String,

    /// Normalized lifecycle status
    pub status: ReservationStatus,

    /// Calendar date of the booking
    pub date: Option<NaiveDate>,

    /// Local start time (HH:MM)
    pub start_time: Option<NaiveTime>,

    /// Local end time (HH:MM)
    pub end_time: Option<NaiveTime>,

    /// Total price in CLP (no decimals)
    pub total_price: Option<i64>,

    /// When the reservation record was created
    pub created_at: Option<NaiveDateTime>,

    /// Free-form note attached at booking time
    pub notes: Option<String>,

    pub court: CourtRef,

    pub venue: VenueRef,

    /// Person holding the booking (admin listings only)
    pub holder: Option<Holder>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourtRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueRef {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holder {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Reservation {
    /// Date and start time composed into a local timestamp
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        let date = self.date?;
        Some(date.and_time(self.start_time.unwrap_or(NaiveTime::MIN)))
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }

    /// "HH:MM-HH:MM", or whatever part of it is known
    pub fn time_range(&self) -> String {
        [self.start_time, self.end_time]
            .iter()
            .flatten()
            .map(|t| t.format("%H:%M").to_string())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Client-observed reservation status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Expired,
    /// Unrecognized backend value, kept verbatim for display
    Other(String),
}

impl ReservationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Expired => "expired",
            ReservationStatus::Other(raw) => raw,
        }
    }

    /// Cancelled and expired reservations never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Cancelled | ReservationStatus::Expired)
    }

    /// Apply a user action, enforcing the client-side state machine.
    ///
    /// `pending -> confirmed`, `pending|confirmed -> cancelled`. Unrecognized
    /// statuses are left for the server to judge.
    pub fn apply(&self, action: ReservationAction) -> Result<ReservationStatus> {
        let next = match (self, action) {
            (ReservationStatus::Pending, ReservationAction::Confirm) => ReservationStatus::Confirmed,
            (
                ReservationStatus::Pending | ReservationStatus::Confirmed,
                ReservationAction::Cancel,
            ) => ReservationStatus::Cancelled,
            (ReservationStatus::Other(_), ReservationAction::Confirm) => ReservationStatus::Confirmed,
            (ReservationStatus::Other(_), ReservationAction::Cancel) => ReservationStatus::Cancelled,
            (from, action) => {
                return Err(ApiError::InvalidTransition {
                    from: from.clone(),
                    action,
                })
            }
        };
        Ok(next)
    }
}

impl From<&str> for ReservationStatus {
    fn from(raw: &str) -> Self {
        normalize_status(raw)
    }
}

impl From<String> for ReservationStatus {
    fn from(raw: String) -> Self {
        normalize_status(&raw)
    }
}

impl From<ReservationStatus> for String {
    fn from(status: ReservationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Explicit user action on a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationAction {
    Confirm,
    Cancel,
}

impl ReservationAction {
    /// Path segment of the transition endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            ReservationAction::Confirm => "confirmar",
            ReservationAction::Cancel => "cancelar",
        }
    }
}

impl fmt::Display for ReservationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationAction::Confirm => f.write_str("confirm"),
            ReservationAction::Cancel => f.write_str("cancel"),
        }
    }
}
