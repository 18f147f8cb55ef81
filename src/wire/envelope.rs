use serde::Deserialize;
use serde_json::Value;

/// List responses: a bare array, `{"data": [...]}` or `{"items": [...]}`.
///
/// Anything else is read as an empty list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    Bare(Vec<Value>),
    Data { data: Vec<Value> },
    Items { items: Vec<Value> },
    Other(Value),
}

impl ListEnvelope {
    pub fn into_records(self) -> Vec<Value> {
        match self {
            ListEnvelope::Bare(records)
            | ListEnvelope::Data { data: records }
            | ListEnvelope::Items { items: records } => records,
            ListEnvelope::Other(_) => Vec::new(),
        }
    }
}

/// Single-object responses, optionally wrapped as `{"data": {...}}`
pub fn unwrap_object(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
