use serde::Serialize;

use crate::models::{Registration, ReviewDraft, SlotRequest};

use super::datetime::{format_date, format_time};

/// Body of `POST /reservas/cotizar` and `POST /reservas`.
///
/// Both endpoints share the backend's snake_case slot contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationBody {
    pub id_cancha: i64,
    pub fecha: String,
    pub inicio: String,
    pub fin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cupon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
}

impl ReservationBody {
    pub fn quote(slot: &SlotRequest) -> Self {
        Self::from_slot(slot, None)
    }

    pub fn create(slot: &SlotRequest, quote_id: Option<&str>) -> Self {
        Self::from_slot(slot, quote_id.map(str::to_string))
    }

    fn from_slot(slot: &SlotRequest, quote_id: Option<String>) -> Self {
        Self {
            id_cancha: slot.court_id,
            fecha: format_date(slot.date),
            inicio: format_time(slot.start_time),
            fin: format_time(slot.end_time),
            notas: slot.note.clone(),
            cupon: slot.coupon.clone(),
            quote_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewBody<'a> {
    pub id_reserva: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_cancha: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_complejo: Option<i64>,
    pub calificacion: u8,
    pub comentario: &'a str,
}

impl<'a> From<&'a ReviewDraft> for ReviewBody<'a> {
    fn from(draft: &'a ReviewDraft) -> Self {
        Self {
            id_reserva: draft.reservation_id,
            id_cancha: draft.court_id,
            id_complejo: draft.venue_id,
            calificacion: draft.rating,
            comentario: draft.comment.trim(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewPatchBody<'a> {
    pub calificacion: u8,
    pub comentario: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterBody<'a> {
    pub nombre: &'a str,
    pub apellido: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Registration> for RegisterBody<'a> {
    fn from(form: &'a Registration) -> Self {
        Self {
            nombre: form.name.trim(),
            apellido: form.last_name.trim(),
            email: form.email.trim(),
            password: &form.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_quote_body_shape() {
        let slot = SlotRequest::parse("42", "2025-10-20", "18:00", "19:00")
            .unwrap()
            .with_coupon("OCT-10");
        assert_eq!(
            serde_json::to_value(ReservationBody::quote(&slot)).unwrap(),
            json!({
                "id_cancha": 42,
                "fecha": "2025-10-20",
                "inicio": "18:00",
                "fin": "19:00",
                "cupon": "OCT-10"
            })
        );
    }

    #[test]
    fn test_create_body_carries_quote_and_note() {
        let slot = SlotRequest::parse("42", "2025-10-20", "18:00", "19:00")
            .unwrap()
            .with_note("Partido amistoso");
        let body = serde_json::to_value(ReservationBody::create(&slot, Some("q-1"))).unwrap();
        assert_eq!(body["quote_id"], "q-1");
        assert_eq!(body["notas"], "Partido amistoso");
        assert!(body.get("cupon").is_none());
    }
}
