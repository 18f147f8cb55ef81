use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::wire::datetime::{parse_date, parse_time};

/// Slot fields shared by quote and create requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub court_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub note: Option<String>,
    pub coupon: Option<String>,
}

impl SlotRequest {
    pub fn new(court_id: i64, date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            court_id,
            date,
            start_time,
            end_time,
            note: None,
            coupon: None,
        }
    }

    /// Build a request from raw form values ("YYYY-MM-DD", "HH:MM").
    pub fn parse(court_id: &str, date: &str, start_time: &str, end_time: &str) -> Result<Self> {
        let court_id = court_id.trim();
        if court_id.is_empty() {
            return Err(ApiError::MissingField("court id"));
        }
        let court_id: i64 = court_id
            .parse()
            .map_err(|_| ApiError::Validation(format!("invalid court id: {court_id}")))?;

        Ok(Self::new(
            court_id,
            parse_date(date)?,
            parse_time(start_time)?,
            parse_time(end_time)?,
        ))
    }

    /// Attach a note; blank notes are dropped
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = non_blank(note.into());
        self
    }

    pub fn with_coupon(mut self, coupon: impl Into<String>) -> Self {
        self.coupon = non_blank(coupon.into());
        self
    }

    /// Local checks run before any request is sent
    pub fn validate(&self) -> Result<()> {
        if self.court_id <= 0 {
            return Err(ApiError::MissingField("court id"));
        }
        if self.end_time <= self.start_time {
            return Err(ApiError::InvalidTimeWindow {
                start: self.start_time.format("%H:%M").to_string(),
                end: self.end_time.format("%H:%M").to_string(),
            });
        }
        Ok(())
    }

    /// Slot length in hours
    pub fn hours(&self) -> f64 {
        (self.end_time - self.start_time).num_minutes() as f64 / 60.0
    }

    pub fn cache_key(&self) -> QuoteKey {
        QuoteKey {
            court_id: self.court_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Cache key for a quoted slot, rendered as `quote:<court>:<date>:<start>-<end>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    pub court_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl fmt::Display for QuoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "quote:{}:{}:{}-{}",
            self.court_id,
            self.date.format("%Y-%m-%d"),
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

/// A priced estimate for one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Server-side quote id, when the backend issues one
    pub quote_id: Option<String>,

    pub price_per_hour: i64,

    pub hours: f64,

    pub subtotal: i64,

    pub discount: Option<i64>,

    pub total: i64,

    /// ISO currency code, "CLP" unless the server says otherwise
    pub currency: String,

    /// Promotion or coupon code the server applied
    pub applied_promotion: Option<String>,

    /// Validity limit; staleness is judged by the server
    pub expires_at: Option<DateTime<Utc>>,

    /// Human-readable pricing detail
    pub detail: Option<String>,
}

/// Quote cache value: `{"total": .., "at": <epoch millis>}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedQuote {
    pub total: i64,
    #[serde(rename = "at")]
    pub computed_at_epoch_millis: i64,
}
