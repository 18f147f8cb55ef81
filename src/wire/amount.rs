use serde_json::Value;

/// Decode a CLP amount.
///
/// The backend serializes money as floats (`12000.0`) or occasionally as
/// numeric strings; pesos have no minor unit so the value is rounded.
/// Negative amounts are rejected.
pub fn clp_from_value(value: &Value) -> Option<i64> {
    let amount = match value {
        Value::Number(n) => n.as_i64().map(|i| i as f64).or_else(|| n.as_f64())?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !amount.is_finite() || amount < 0.0 {
        return None;
    }

    Some(amount.round() as i64)
}
