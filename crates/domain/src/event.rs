use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Default notification lifetime in seconds (24 hours)
pub const DEFAULT_TIME_TO_LIVE: i64 = 86_400;

/// An inbound event as received from an external source through
/// a webhook. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Map<String, Value>,
    pub timestamp: i64,
    pub source: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("Event payload must be a JSON object")]
    NotAnObject,
    #[error("Event payload is missing a `type` field")]
    MissingEventType,
}

impl Event {
    /// Validates the structural shape of a raw webhook payload and turns
    /// it into an `Event`. The payload must be a JSON object with a string
    /// `type` field. A missing `id` gets a generated one and a missing
    /// `timestamp` falls back to the current time.
    pub fn from_payload(
        payload: &Value,
        source: &str,
        now_millis: i64,
    ) -> Result<Self, ClassificationError> {
        let payload = payload
            .as_object()
            .ok_or(ClassificationError::NotAnObject)?;
        let event_type = payload
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ClassificationError::MissingEventType)?;

        let id = payload
            .get("id")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let data = payload
            .get("data")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let timestamp = payload
            .get("timestamp")
            .and_then(Value::as_i64)
            .unwrap_or(now_millis);

        Ok(Self {
            id,
            event_type: event_type.to_string(),
            data,
            timestamp,
            source: source.to_string(),
        })
    }

    /// Looks up a field in the event data, rendering scalar values as
    /// display strings. Used by body templates.
    pub fn data_field(&self, field: &str) -> Option<String> {
        match self.data.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}

/// The outcome of classifying an inbound event. Created once per event,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedEvent {
    pub event: Event,
    pub should_notify: bool,
    pub users_to_notify: Vec<String>,
    /// Explicit title from the payload, overrides the per-type default
    pub title: Option<String>,
    /// Explicit body from the payload, overrides the per-type default
    pub body: Option<String>,
    /// Extra data injected during classification, merged over the event data
    pub data: Option<Map<String, Value>>,
    pub priority: Priority,
    /// Notification lifetime in seconds
    pub time_to_live: i64,
}
