use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Reservation;

/// Timestamp a reservation list is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// `date` + `start_time` as a local timestamp
    #[default]
    ReservationTime,
    /// When the record was created
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortKey {
    fn value(&self, reservation: &Reservation) -> Option<NaiveDateTime> {
        match self {
            SortKey::ReservationTime => reservation.starts_at(),
            SortKey::CreatedAt => reservation.created_at,
        }
    }
}

/// Sort a reservation list for display.
///
/// Cancelled reservations always go after every other reservation. Each of
/// the two partitions is sorted by `key` in `direction`; records without the
/// key's timestamp lead their partition in either direction.
pub fn sort_reservations(
    reservations: Vec<Reservation>,
    key: SortKey,
    direction: SortDirection,
) -> Vec<Reservation> {
    let (mut active, mut cancelled): (Vec<_>, Vec<_>) =
        reservations.into_iter().partition(|r| !r.is_cancelled());

    let compare = |a: &Reservation, b: &Reservation| {
        compare_keys(key.value(a), key.value(b), direction)
    };
    active.sort_by(compare);
    cancelled.sort_by(compare);

    active.extend(cancelled);
    active
}

fn compare_keys(
    a: Option<NaiveDateTime>,
    b: Option<NaiveDateTime>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.cmp(&b),
            SortDirection::Descending => b.cmp(&a),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::normalize::normalize_all;

    fn ids(list: &[Reservation]) -> Vec<&str> {
        list.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_cancelled_after_active_descending() {
        let list = normalize_all(vec![
            json!({"id": "a", "status": "cancelled", "date": "2025-01-01"}),
            json!({"id": "b", "status": "confirmed", "date": "2025-02-01"}),
        ]);
        let sorted = sort_reservations(list, SortKey::ReservationTime, SortDirection::Descending);
        assert_eq!(ids(&sorted), vec!["b", "a"]);
    }

    #[test]
    fn test_partition_holds_in_both_directions() {
        let records = vec![
            json!({"id": "c1", "estado": "cancelada", "fecha": "2025-12-01", "inicio": "10:00"}),
            json!({"id": "p1", "estado": "pendiente", "fecha": "2025-01-01", "inicio": "10:00"}),
            json!({"id": "c2", "estado": "cancelled", "fecha": "2024-06-01", "inicio": "10:00"}),
            json!({"id": "k1", "estado": "confirmada", "fecha": "2025-03-01", "inicio": "09:00"}),
            json!({"id": "e1", "estado": "expired", "fecha": "2025-02-01", "inicio": "09:00"}),
        ];

        let asc = sort_reservations(
            normalize_all(records.clone()),
            SortKey::ReservationTime,
            SortDirection::Ascending,
        );
        assert_eq!(ids(&asc), vec!["p1", "e1", "k1", "c2", "c1"]);

        let desc = sort_reservations(
            normalize_all(records),
            SortKey::ReservationTime,
            SortDirection::Descending,
        );
        assert_eq!(ids(&desc), vec!["k1", "e1", "p1", "c1", "c2"]);
    }

    #[test]
    fn test_start_time_breaks_same_day_ties() {
        let list = normalize_all(vec![
            json!({"id": "late", "fecha": "2025-10-20", "hora_inicio": "21:00"}),
            json!({"id": "early", "fecha": "2025-10-20", "hora_inicio": "08:00"}),
        ]);
        let sorted = sort_reservations(list, SortKey::ReservationTime, SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["early", "late"]);
    }

    #[test]
    fn test_missing_key_sorts_first_either_way() {
        let records = vec![
            json!({"id": "new", "status": "pending", "created_at": "2025-10-02T10:00:00"}),
            json!({"id": "none", "status": "pending"}),
            json!({"id": "old", "status": "pending", "created_at": "2025-10-01T10:00:00"}),
        ];

        let asc = sort_reservations(
            normalize_all(records.clone()),
            SortKey::CreatedAt,
            SortDirection::Ascending,
        );
        assert_eq!(ids(&asc), vec!["none", "old", "new"]);

        let desc = sort_reservations(
            normalize_all(records),
            SortKey::CreatedAt,
            SortDirection::Descending,
        );
        assert_eq!(ids(&desc), vec!["none", "new", "old"]);
    }
}
