//! Ordered field lookup over loosely shaped JSON records.
//!
//! Backend records name the same logical field differently depending on the
//! endpoint (`fecha` / `fecha_reserva`, nested `cancha.nombre` / flat
//! `cancha_nombre`). Each accessor takes the candidate keys in priority order
//! and returns the first one that is present and not null. A key containing a
//! dot is a nested path.

use serde_json::Value;

use super::amount::clp_from_value;

/// First present, non-null value among `keys`
pub fn pick<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| lookup(record, key))
        .find(|v| !v.is_null())
}

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |node, segment| node.get(segment))
}

/// First value that is a non-empty string (numbers are rendered)
pub fn pick_str(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(record, key))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Identifier as a string; accepts numbers and non-empty strings
pub fn pick_id(record: &Value, keys: &[&str]) -> Option<String> {
    pick_str(record, keys)
}

pub fn pick_i64(record: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter()
        .filter_map(|key| lookup(record, key))
        .find_map(|v| match v {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
}

pub fn pick_f64(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| lookup(record, key))
        .find_map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
}

pub fn pick_bool(record: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter()
        .filter_map(|key| lookup(record, key))
        .find_map(Value::as_bool)
}

/// CLP amount (integer pesos) from numbers or numeric strings
pub fn pick_clp(record: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter()
        .filter_map(|key| lookup(record, key))
        .find_map(clp_from_value)
}
