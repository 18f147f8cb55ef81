use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;
use tracing::debug;

use crate::models::{CourtRef, Holder, Reservation, ReservationStatus, VenueRef};
use crate::wire::datetime::{parse_date, parse_time, parse_timestamp, parse_wall_clock};
use crate::wire::fields::{pick_clp, pick_id, pick_str};

const DEFAULT_VENUE_NAME: &str = "Complejo";

/// Map one backend reservation record to canonical form.
///
/// Returns `None` for records without any identifier.
pub fn normalize_record(record: &Value) -> Option<Reservation> {
    let Some(id) = pick_id(record, &["id", "id_reserva", "reserva_id", "uuid"]) else {
        debug!("Skipping reservation record without id: {}", record);
        return None;
    };

    let status = pick_str(record, &["estado", "status"])
        .map(|raw| ReservationStatus::from(raw.as_str()))
        .unwrap_or_else(|| ReservationStatus::Other(String::new()));

    let holder_name = pick_str(record, &["usuario.nombre", "titular.nombre", "user_name"]);
    let holder_email = pick_str(record, &["usuario.email", "titular.email", "user_email"]);
    let holder = (holder_name.is_some() || holder_email.is_some()).then(|| Holder {
        name: holder_name,
        email: holder_email,
    });

    Some(Reservation {
        id,
        status,
        date: resolve_date(record),
        start_time: resolve_time(record, &["hora_inicio", "startTime", "inicio"]),
        end_time: resolve_time(record, &["hora_fin", "endTime", "fin"]),
        total_price: pick_clp(record, &["monto_total", "precio_total", "totalPrice", "total"]),
        created_at: pick_str(record, &["created_at", "createdAt", "fecha_creacion"])
            .and_then(|raw| parse_timestamp(&raw)),
        notes: pick_str(record, &["notas", "note", "notes"]),
        court: CourtRef {
            id: pick_id(record, &["cancha.id", "cancha_id", "id_cancha", "cancha.uuid"])
                .unwrap_or_default(),
            name: pick_str(record, &["cancha.nombre", "cancha_nombre", "cancha.name", "cancha"])
                .unwrap_or_default(),
        },
        venue: VenueRef {
            id: pick_id(record, &["complejo.id", "complejo_id", "venue.id", "id_complejo"])
                .unwrap_or_default(),
            name: pick_str(
                record,
                &["complejo.nombre", "complejo_nombre", "venue.name", "complejo"],
            )
            .unwrap_or_else(|| DEFAULT_VENUE_NAME.to_string()),
            address: pick_str(record, &["complejo.direccion", "venue.address", "direccion"]),
        },
        holder,
    })
}

/// Explicit date fields first, then the date part of a start timestamp
fn resolve_date(record: &Value) -> Option<NaiveDate> {
    ["fecha_reserva", "fecha", "date"]
        .iter()
        .filter_map(|key| pick_str(record, &[key]))
        .find_map(|raw| parse_date(&raw).ok())
        .or_else(|| {
            ["inicio", "start"]
                .iter()
                .filter_map(|key| pick_str(record, &[key]))
                .find_map(|raw| parse_wall_clock(&raw))
                .map(|dt| dt.date())
        })
}

/// Time-of-day fields may hold "HH:MM" or a full timestamp
fn resolve_time(record: &Value, keys: &[&str]) -> Option<NaiveTime> {
    keys.iter()
        .filter_map(|key| pick_str(record, &[key]))
        .find_map(|raw| {
            parse_time(&raw)
                .ok()
                .or_else(|| parse_wall_clock(&raw).map(|dt| dt.time()))
        })
}

/// Normalize a batch of records, keeping the first record seen for each id
pub fn normalize_all<I>(records: I) -> Vec<Reservation>
where
    I: IntoIterator<Item = Value>,
{
    dedupe_by_id(records.into_iter().filter_map(|r| normalize_record(&r)))
}

/// Drop repeated ids, keeping first occurrences in their original order
pub fn dedupe_by_id<I>(reservations: I) -> Vec<Reservation>
where
    I: IntoIterator<Item = Reservation>,
{
    let mut seen = HashSet::new();
    reservations
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_duplicate_ids_keep_first() {
        let records = vec![
            json!({"id": "1", "estado": "CONFIRMADA", "fecha": "2025-10-20"}),
            json!({"id": "1", "status": "confirmed", "fecha": "2025-10-21"}),
            json!({"id": "2", "status": "pending"}),
        ];
        let out = normalize_all(records);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "1");
        assert_eq!(out[0].status, ReservationStatus::Confirmed);
        assert_eq!(out[0].date, NaiveDate::from_ymd_opt(2025, 10, 20));
    }

    #[test]
    fn test_numeric_and_string_ids_collide() {
        let out = normalize_all(vec![json!({"id_reserva": 7}), json!({"id": "7"})]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_backend_flat_shape() {
        let r = normalize_record(&json!({
            "id_reserva": 15,
            "id_usuario": 3,
            "id_cancha": 42,
            "fecha_reserva": "2025-10-20",
            "hora_inicio": "18:00",
            "hora_fin": "19:00",
            "estado": "pendiente",
            "precio_total": 12000.0,
            "notas": "cumpleaños"
        }))
        .unwrap();

        assert_eq!(r.id, "15");
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.time_range(), "18:00-19:00");
        assert_eq!(r.total_price, Some(12000));
        assert_eq!(r.court.id, "42");
        assert_eq!(r.court.name, "");
        assert_eq!(r.venue.name, "Complejo");
        assert_eq!(r.notes.as_deref(), Some("cumpleaños"));
        assert!(r.holder.is_none());
    }

    #[test]
    fn test_nested_objects_win_over_flat_keys() {
        let r = normalize_record(&json!({
            "id": "a",
            "cancha": {"id": 3, "nombre": "Cancha Techada"},
            "cancha_nombre": "legacy",
            "complejo": {"id": 8, "nombre": "Complejo Norte", "direccion": "Av. 1"},
            "venue": {"id": 99, "name": "otro"},
            "usuario": {"nombre": "Ana", "email": "ana@example.com"}
        }))
        .unwrap();

        assert_eq!(r.court.id, "3");
        assert_eq!(r.court.name, "Cancha Techada");
        assert_eq!(r.venue.id, "8");
        assert_eq!(r.venue.name, "Complejo Norte");
        assert_eq!(r.venue.address.as_deref(), Some("Av. 1"));
        assert_eq!(r.holder.unwrap().email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_legacy_flat_names_and_venue_fallback() {
        let r = normalize_record(&json!({
            "id": "b",
            "cancha_nombre": "Cancha 2",
            "venue": {"id": "v1", "name": "Club Sur", "address": "Calle 2"}
        }))
        .unwrap();
        assert_eq!(r.court.name, "Cancha 2");
        assert_eq!(r.venue.id, "v1");
        assert_eq!(r.venue.name, "Club Sur");
        assert_eq!(r.venue.address.as_deref(), Some("Calle 2"));
    }

    #[test]
    fn test_timestamp_start_derives_date_and_times() {
        let r = normalize_record(&json!({
            "id": 4,
            "estado": "confirmada",
            "inicio": "2025-10-20T18:00:00-03:00",
            "fin": "2025-10-20T19:30:00-03:00"
        }))
        .unwrap();
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 10, 20));
        assert_eq!(r.time_range(), "18:00-19:30");
    }

    #[test]
    fn test_missing_status_and_id() {
        let r = normalize_record(&json!({"id": "x"})).unwrap();
        assert_eq!(r.status, ReservationStatus::Other(String::new()));
        assert!(normalize_record(&json!({"estado": "pendiente"})).is_none());
    }
}
