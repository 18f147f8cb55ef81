use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::models::{Availability, Court, Quote, Review, SlotRequest, TimeSlot, User, Venue};

use super::datetime::{parse_date, parse_expiry, parse_time, parse_timestamp};
use super::envelope::{unwrap_object, ListEnvelope};
use super::fields::{pick, pick_bool, pick_clp, pick_f64, pick_i64, pick_id, pick_str};

/// Decode a quote response for `slot`.
///
/// Only `total` is required. Missing breakdown fields are derived from the
/// slot length and the total.
pub fn decode_quote(body: Value, slot: &SlotRequest) -> Result<Quote> {
    let body = unwrap_object(body);

    let total = pick_clp(&body, &["total", "monto_total", "totalPrice", "total_monto"])
        .ok_or_else(|| ApiError::UnexpectedResponse("quote has no total".to_string()))?;
    let discount = pick_clp(&body, &["descuento", "discount"]);
    let subtotal = pick_clp(&body, &["subtotal"])
        .unwrap_or_else(|| total.saturating_add(discount.unwrap_or(0)));
    let hours = pick_f64(&body, &["horas", "hours"]).unwrap_or_else(|| slot.hours());
    let price_per_hour = pick_clp(&body, &["precio_hora", "pricePerHour", "tarifa_hora"])
        .unwrap_or_else(|| {
            if hours > 0.0 {
                (subtotal as f64 / hours).round() as i64
            } else {
                subtotal
            }
        });

    Ok(Quote {
        quote_id: pick_id(&body, &["quoteId", "quote_id", "id_cotizacion", "id"]),
        price_per_hour,
        hours,
        subtotal,
        discount,
        total,
        currency: pick_str(&body, &["moneda", "currency"]).unwrap_or_else(|| "CLP".to_string()),
        applied_promotion: pick_str(&body, &["cupon_aplicado", "appliedPromotion", "promocion"]),
        expires_at: pick_str(&body, &["expiresAt", "expires_at", "expira_en"])
            .and_then(|raw| parse_expiry(&raw)),
        detail: pick_str(&body, &["detalle", "detail"]),
    })
}

pub fn decode_venue(record: &Value) -> Option<Venue> {
    Some(Venue {
        id: pick_id(record, &["id_complejo", "id", "complejo_id"])?,
        name: pick_str(record, &["nombre", "name"]).unwrap_or_else(|| "Complejo".to_string()),
        address: pick_str(record, &["direccion", "address"]),
        comuna: pick_str(record, &["comuna"]),
        latitude: pick_f64(record, &["latitud", "lat"]),
        longitude: pick_f64(record, &["longitud", "lng", "lon"]),
        active: pick_bool(record, &["activo", "esta_activo"]).unwrap_or(true),
        rating: pick_f64(record, &["rating_promedio", "rating"]),
        review_count: pick_i64(record, &["total_resenas"]),
    })
}

/// Court record; `venue_id` fills in when the record omits its venue
pub fn decode_court(record: &Value, venue_id: &str) -> Option<Court> {
    Some(Court {
        id: pick_id(record, &["id_cancha", "id", "cancha_id"])?,
        venue_id: pick_id(record, &["id_complejo", "complejo_id"])
            .unwrap_or_else(|| venue_id.to_string()),
        name: pick_str(record, &["nombre", "tipo"]).unwrap_or_else(|| "Cancha".to_string()),
        sport: pick_str(record, &["deporte"]),
        surface: pick_str(record, &["superficie"]),
        capacity: pick_i64(record, &["capacidad"]),
        lit: pick_bool(record, &["iluminacion"]).unwrap_or(false),
        covered: pick_bool(record, &["techada"]).unwrap_or(false),
        active: pick_bool(record, &["esta_activa"]).unwrap_or(true),
    })
}

pub fn decode_review(record: &Value) -> Option<Review> {
    Some(Review {
        id: pick_i64(record, &["id_resena", "id", "resena_id"])?,
        user_id: pick_i64(record, &["id_usuario", "usuario_id", "user.id"]),
        court_id: pick_i64(record, &["id_cancha"]),
        venue_id: pick_i64(record, &["id_complejo"]),
        rating: pick_i64(record, &["calificacion", "rating"])
            .map(|r| r.clamp(1, 5) as u8)
            .unwrap_or(5),
        comment: pick_str(record, &["comentario", "comment"]),
        created_at: pick_str(record, &["created_at", "createdAt"])
            .and_then(|raw| parse_timestamp(&raw)),
    })
}

/// Decode `GET /disponibilidad`.
///
/// The day's slots come under `slots`, or as a plain list. Slots whose times
/// don't parse or don't move forward are dropped. The requested court and
/// date stand in when the body omits them.
pub fn decode_availability(body: Value, court_id: i64, date: NaiveDate) -> Result<Availability> {
    let body = unwrap_object(body);

    let slots = match body.get("slots") {
        Some(slots) => slots.clone(),
        None => body.clone(),
    };
    let envelope: ListEnvelope = serde_json::from_value(slots)?;
    let slots = envelope
        .into_records()
        .iter()
        .filter_map(decode_slot)
        .collect();

    Ok(Availability {
        court_id: pick_i64(&body, &["id_cancha"]).unwrap_or(court_id),
        date: pick_str(&body, &["fecha"])
            .and_then(|raw| parse_date(&raw).ok())
            .unwrap_or(date),
        slot_minutes: pick_i64(&body, &["slot_min", "slot_minutos"]),
        slots,
    })
}

fn decode_slot(record: &Value) -> Option<TimeSlot> {
    let start = parse_time(&pick_str(record, &["inicio", "hora_inicio", "start"])?).ok()?;
    let end = parse_time(&pick_str(record, &["fin", "hora_fin", "end"])?).ok()?;
    (end > start).then_some(TimeSlot { start, end })
}

/// Normalize the several user shapes the auth endpoints return
pub fn decode_user(record: &Value) -> User {
    let role = pick_str(record, &["rol", "role"]).or_else(|| {
        pick(record, &["roles"])
            .and_then(Value::as_array)
            .and_then(|roles| roles.first())
            .and_then(|first| match first {
                Value::String(s) => Some(s.clone()),
                other => pick_str(other, &["name"]),
            })
    });

    User {
        id: pick_i64(record, &["id_usuario", "id"]).unwrap_or(0),
        name: pick_str(record, &["nombre", "name"]).unwrap_or_default(),
        last_name: pick_str(record, &["apellido", "last_name"]).unwrap_or_default(),
        email: pick_str(record, &["email"]).unwrap_or_default(),
        phone: pick_str(record, &["telefono", "phone"]),
        role: role.unwrap_or_else(|| "user".to_string()).to_lowercase(),
    }
}

/// `POST /auth/login` response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Value,
}
