use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::info;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{Quote, Reservation, SlotRequest};
use crate::session::Session;

/// Where the caller goes after a successful booking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NextStep {
    ReservationList,
    /// Rate the venue of the reservation that was just created
    Review(ReviewHandoff),
}

/// Identifiers the review flow needs after a direct booking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewHandoff {
    pub reservation_id: String,
    pub venue_id: String,
    pub venue_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    /// `None` when the backend acknowledged without returning a record
    pub reservation: Option<Reservation>,
    pub next: NextStep,
}

/// Creates reservations through either booking flow
#[derive(Clone)]
pub struct ReservationSubmitter {
    api: ApiClient,
}

impl ReservationSubmitter {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Book a slot that was quoted first, binding the quote id when there is one
    pub async fn confirm_quoted(
        &self,
        session: &Session,
        slot: &SlotRequest,
        quote: &Quote,
    ) -> Result<Submission> {
        let created = self
            .api
            .create_reservation(session, slot, quote.quote_id.as_deref())
            .await?
            .map(|r| {
                let mut r = fill_from_slot(r, slot);
                r.total_price = r.total_price.or(Some(quote.total));
                r
            });

        info!(
            "Confirmed quoted booking for court {} ({})",
            slot.court_id,
            quote.quote_id.as_deref().unwrap_or("no quote id")
        );
        Ok(Submission {
            reservation: created,
            next: NextStep::ReservationList,
        })
    }

    /// Book a slot directly and let the backend price it
    pub async fn create_direct(&self, session: &Session, slot: &SlotRequest) -> Result<Submission> {
        let created = self
            .api
            .create_reservation(session, slot, None)
            .await?
            .map(|r| fill_from_slot(r, slot));

        let next = match &created {
            Some(r) => NextStep::Review(ReviewHandoff {
                reservation_id: r.id.clone(),
                venue_id: r.venue.id.clone(),
                venue_name: r.venue.name.clone(),
                date: r.date.unwrap_or(slot.date),
                start_time: r.start_time.unwrap_or(slot.start_time),
                end_time: r.end_time.unwrap_or(slot.end_time),
            }),
            None => NextStep::ReservationList,
        };

        Ok(Submission {
            reservation: created,
            next,
        })
    }
}

/// Fill fields the create response left out with what was requested
fn fill_from_slot(mut reservation: Reservation, slot: &SlotRequest) -> Reservation {
    reservation.date = reservation.date.or(Some(slot.date));
    reservation.start_time = reservation.start_time.or(Some(slot.start_time));
    reservation.end_time = reservation.end_time.or(Some(slot.end_time));
    if reservation.court.id.is_empty() {
        reservation.court.id = slot.court_id.to_string();
    }
    if reservation.notes.is_none() {
        reservation.notes = slot.note.clone();
    }
    reservation
}
