use crate::models::ReservationStatus;

/// Map a backend status string onto the canonical statuses.
///
/// Matching is case-insensitive over Spanish and English spellings. Unknown
/// values come back as `Other` with the original text so they can still be
/// displayed.
pub fn normalize_status(raw: &str) -> ReservationStatus {
    match raw.trim().to_lowercase().as_str() {
        "confirmed" | "confirmada" => ReservationStatus::Confirmed,
        "pending" | "pendiente" => ReservationStatus::Pending,
        "cancelled" | "canceled" | "cancelada" => ReservationStatus::Cancelled,
        "expired" | "expirada" => ReservationStatus::Expired,
        _ => ReservationStatus::Other(raw.to_string()),
    }
}
