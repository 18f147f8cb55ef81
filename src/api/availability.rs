use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::models::Availability;
use crate::session::Session;
use crate::wire::datetime::format_date;
use crate::wire::decode_availability;

use super::ApiClient;

/// Block lengths the backend accepts, in minutes
const SLOT_MINUTES_RANGE: std::ops::RangeInclusive<u32> = 15..=180;

#[derive(Debug, Serialize)]
struct AvailabilityQuery {
    id_cancha: i64,
    fecha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    slot_min: Option<u32>,
}

impl ApiClient {
    /// Free slots of a court on `date` via `GET /disponibilidad`.
    ///
    /// Without `slot_minutes` the server picks the block length (one hour).
    pub async fn availability(
        &self,
        session: &Session,
        court_id: i64,
        date: NaiveDate,
        slot_minutes: Option<u32>,
    ) -> Result<Availability> {
        if court_id <= 0 {
            return Err(ApiError::Validation(format!("invalid court id: {court_id}")));
        }
        if let Some(minutes) = slot_minutes {
            if !SLOT_MINUTES_RANGE.contains(&minutes) {
                return Err(ApiError::Validation(format!(
                    "slot length must be between {} and {} minutes",
                    SLOT_MINUTES_RANGE.start(),
                    SLOT_MINUTES_RANGE.end()
                )));
            }
        }

        let query = AvailabilityQuery {
            id_cancha: court_id,
            fecha: format_date(date),
            slot_min: slot_minutes,
        };
        let body = self
            .get_json_with_query(session, "/disponibilidad", &query)
            .await?;
        let availability = decode_availability(body, court_id, date)?;

        debug!(
            "Court {} has {} free slots on {}",
            court_id,
            availability.slots.len(),
            query.fecha
        );
        Ok(availability)
    }
}
