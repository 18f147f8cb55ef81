use tracing::{debug, info};

use crate::error::{ApiError, Result};
use crate::models::{Quote, Reservation, ReservationAction, SlotRequest};
use crate::normalize::{normalize_all, normalize_record};
use crate::session::Session;
use crate::wire::{decode_quote, unwrap_object, ListEnvelope, ReservationBody};

use super::ApiClient;

impl ApiClient {
    /// Price a slot with `POST /reservas/cotizar`.
    ///
    /// The slot is validated first; an invalid slot never reaches the network.
    pub async fn request_quote(&self, session: &Session, slot: &SlotRequest) -> Result<Quote> {
        slot.validate()?;

        let body = self
            .post_json(session, "/reservas/cotizar", &ReservationBody::quote(slot))
            .await?;
        let quote = decode_quote(body, slot)?;

        info!(
            "Quoted court {} on {} {}-{}: {} {}",
            slot.court_id,
            slot.date,
            slot.start_time.format("%H:%M"),
            slot.end_time.format("%H:%M"),
            quote.total,
            quote.currency
        );
        Ok(quote)
    }

    /// Create a reservation with `POST /reservas`.
    ///
    /// Returns `None` when the backend answers with no identifiable record.
    pub async fn create_reservation(
        &self,
        session: &Session,
        slot: &SlotRequest,
        quote_id: Option<&str>,
    ) -> Result<Option<Reservation>> {
        slot.validate()?;

        let body = self
            .post_json(session, "/reservas", &ReservationBody::create(slot, quote_id))
            .await?;
        let created = normalize_record(&unwrap_object(body));

        match &created {
            Some(r) => info!("Created reservation {} for court {}", r.id, slot.court_id),
            None => debug!("Reservation created but response carried no id"),
        }
        Ok(created)
    }

    /// The caller's reservations, normalized and deduplicated
    pub async fn my_reservations(&self, session: &Session) -> Result<Vec<Reservation>> {
        let body = self.get_json(session, "/reservas/mias").await?;
        let envelope: ListEnvelope = serde_json::from_value(body)?;
        let reservations = normalize_all(envelope.into_records());

        debug!("Fetched {} reservations", reservations.len());
        Ok(reservations)
    }

    pub async fn reservation(&self, session: &Session, id: &str) -> Result<Reservation> {
        let id = require_id(id)?;
        let body = self
            .get_json(session, &format!("/reservas/{}", urlencoding::encode(id)))
            .await?;

        normalize_record(&unwrap_object(body))
            .ok_or_else(|| ApiError::UnexpectedResponse(format!("reservation {id} has no id")))
    }

    /// Apply `action` to `reservation` after checking the state machine.
    ///
    /// The returned reservation is the server's record when it sends one,
    /// otherwise the input with its status advanced.
    pub async fn transition(
        &self,
        session: &Session,
        reservation: &Reservation,
        action: ReservationAction,
    ) -> Result<Reservation> {
        let next = reservation.status.apply(action)?;
        let id = require_id(&reservation.id)?;

        let path = format!("/reservas/{}/{}", urlencoding::encode(id), action.endpoint());
        let body = self.post_empty(session, &path).await?;

        info!("Reservation {}: {} -> {}", id, reservation.status, next);

        let updated = normalize_record(&unwrap_object(body))
            .filter(|r| r.id == reservation.id)
            .unwrap_or_else(|| Reservation {
                status: next,
                ..reservation.clone()
            });
        Ok(updated)
    }

    pub async fn confirm(&self, session: &Session, reservation: &Reservation) -> Result<Reservation> {
        self.transition(session, reservation, ReservationAction::Confirm)
            .await
    }

    pub async fn cancel(&self, session: &Session, reservation: &Reservation) -> Result<Reservation> {
        self.transition(session, reservation, ReservationAction::Cancel)
            .await
    }
}

fn require_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::MissingField("reservation id"));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::models::ReservationStatus;

    fn slot(start: &str, end: &str) -> SlotRequest {
        SlotRequest::parse("42", "2025-10-20", start, end).unwrap()
    }

    #[tokio::test]
    async fn test_quote_rejected_locally_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 1})))
            .expect(0)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let err = api
            .request_quote(&Session::anonymous(), &slot("19:00", "18:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTimeWindow { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quote_sends_snake_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reservas/cotizar"))
            .and(body_json(json!({
                "id_cancha": 42,
                "fecha": "2025-10-20",
                "inicio": "18:00",
                "fin": "19:00"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"total": 12000, "currency": "CLP"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let quote = api
            .request_quote(&Session::anonymous(), &slot("18:00", "19:00"))
            .await
            .unwrap();
        assert_eq!(quote.total, 12000);
        assert_eq!(quote.price_per_hour, 12000);
    }

    #[tokio::test]
    async fn test_create_surfaces_detail_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reservas"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "Horario no disponible"})),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let err = api
            .create_reservation(&Session::with_token("t"), &slot("18:00", "19:00"), None)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Horario no disponible");
    }

    #[tokio::test]
    async fn test_create_with_quote_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reservas"))
            .and(body_json(json!({
                "id_cancha": 42,
                "fecha": "2025-10-20",
                "inicio": "18:00",
                "fin": "19:00",
                "quote_id": "q-1"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"id_reserva": 77, "estado": "pendiente", "fecha_reserva": "2025-10-20"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let created = api
            .create_reservation(&Session::anonymous(), &slot("18:00", "19:00"), Some("q-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.id, "77");
        assert_eq!(created.status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn test_my_reservations_envelopes() {
        for body in [
            json!([{"id": "1", "estado": "CONFIRMADA"}, {"id": "1", "status": "confirmed"}]),
            json!({"data": [{"id": "1", "estado": "CONFIRMADA"}]}),
            json!({"items": [{"id": "1", "estado": "CONFIRMADA"}]}),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/reservas/mias"))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;

            let api = ApiClient::new(&server.uri());
            let list = api.my_reservations(&Session::anonymous()).await.unwrap();
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].status, ReservationStatus::Confirmed);
        }
    }

    #[tokio::test]
    async fn test_cancel_posts_and_advances_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reservas/9/cancelar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let reservation = normalize_record(&json!({"id": 9, "estado": "confirmada"})).unwrap();
        let updated = api
            .cancel(&Session::anonymous(), &reservation)
            .await
            .unwrap();
        assert_eq!(updated.status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_forbidden_transition_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let reservation = normalize_record(&json!({"id": 9, "estado": "cancelada"})).unwrap();
        let err = api
            .confirm(&Session::anonymous(), &reservation)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_reservation_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reservas/15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id_reserva": 15, "estado": "confirmada", "hora_inicio": "18:00", "hora_fin": "19:00"
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri());
        let r = api.reservation(&Session::anonymous(), "15").await.unwrap();
        assert_eq!(r.time_range(), "18:00-19:00");

        assert!(matches!(
            api.reservation(&Session::anonymous(), " ").await,
            Err(ApiError::MissingField(_))
        ));
    }
}
