use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user_id: Option<i64>,
    pub court_id: Option<i64>,
    pub venue_id: Option<i64>,
    /// 1..=5
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// A review about to be submitted for a finished reservation
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub reservation_id: i64,
    pub court_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub rating: u8,
    pub comment: String,
}

impl ReviewDraft {
    pub fn validate(&self) -> Result<()> {
        if self.reservation_id <= 0 {
            return Err(ApiError::MissingField("reservation id"));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(ApiError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                self.rating
            )));
        }
        let has_context = self.court_id.is_some_and(|id| id > 0)
            || self.venue_id.is_some_and(|id| id > 0);
        if !has_context {
            return Err(ApiError::MissingField("court or venue id"));
        }
        Ok(())
    }
}
