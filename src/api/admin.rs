use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ApiError, Result};
use crate::models::{Court, Reservation, Venue};
use crate::normalize::{dedupe_by_id, normalize_all};
use crate::session::Session;
use crate::sort::{sort_reservations, SortDirection, SortKey};

use super::venues::records;
use super::ApiClient;

/// Known mounts of the per-court admin listing, tried in order
const ADMIN_COURT_ROUTES: [&str; 2] = ["/reservas/reservas/admin/cancha", "/reservas/admin/cancha"];

/// Everything a venue operator sees in the admin panel
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminOverview {
    pub venues: Vec<Venue>,
    pub courts: Vec<Court>,
    /// Deduplicated, latest reservation first
    pub reservations: Vec<Reservation>,
}

impl ApiClient {
    /// Reservations of one court as seen by its operator.
    ///
    /// A not-found answer from the server on a route moves on to the next
    /// known route; when every route is not-found the court simply has no
    /// listing. Any other failure, including an unreachable server, is
    /// returned as is.
    pub async fn court_reservations_admin(
        &self,
        session: &Session,
        court_id: &str,
    ) -> Result<Vec<Reservation>> {
        let court_id = court_id.trim();
        if court_id.is_empty() {
            return Err(ApiError::MissingField("court id"));
        }
        let court_id = urlencoding::encode(court_id);

        for route in ADMIN_COURT_ROUTES {
            let path = format!("{route}/{court_id}");
            match self.get_json(session, &path).await {
                Ok(body) => return Ok(normalize_all(records(body)?)),
                Err(e) if e.is_not_found() => {
                    debug!("{} not found, trying next route", path);
                }
                Err(e) => return Err(e),
            }
        }

        debug!("No admin listing for court {}", court_id);
        Ok(Vec::new())
    }

    /// Aggregate the operator's venues, their courts and all court reservations.
    ///
    /// Courts are fetched concurrently across venues, then reservations
    /// concurrently across courts. The first failure aborts the aggregate.
    pub async fn admin_overview(&self, session: &Session) -> Result<AdminOverview> {
        let owner_id = match session.user() {
            Some(user) if session.is_authenticated() && user.is_admin_like() => user.id,
            Some(_) => {
                return Err(ApiError::NotPermitted(
                    "admin panel requires an operator role".to_string(),
                ))
            }
            None => return Err(ApiError::NotPermitted("login required".to_string())),
        };

        let venues = self.owner_venues(session, owner_id).await?;

        let courts: Vec<Court> =
            try_join_all(venues.iter().map(|venue| self.courts(session, &venue.id)))
                .await?
                .into_iter()
                .flatten()
                .collect();

        let reservations = try_join_all(
            courts
                .iter()
                .map(|court| self.court_reservations_admin(session, &court.id)),
        )
        .await?;

        let reservations = sort_reservations(
            dedupe_by_id(reservations.into_iter().flatten()),
            SortKey::ReservationTime,
            SortDirection::Descending,
        );

        info!(
            "Admin overview: {} venues, {} courts, {} reservations",
            venues.len(),
            courts.len(),
            reservations.len()
        );

        Ok(AdminOverview {
            venues,
            courts,
            reservations,
        })
    }
}
