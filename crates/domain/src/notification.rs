use crate::event::{Priority, ProcessedEvent};
use crate::event_rules::EventTypeEntry;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A push notification ready to hand to a delivery transport.
/// Ephemeral, created per recipient per event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Values stay typed here so upstream consumers can work with them,
    /// transports call `sanitized_data` right before sending.
    pub data: Map<String, Value>,
    pub priority: Priority,
    /// Lifetime in seconds
    pub time_to_live: i64,
}

impl Notification {
    /// Builds the notification for one recipient of a processed event.
    /// Pure: applies the per-type defaults when the event carries no
    /// explicit title or body, and merges `eventId` and `eventType` into
    /// the data map together with the event-specific fields.
    pub fn build(processed: &ProcessedEvent, entry: &EventTypeEntry) -> Self {
        let event = &processed.event;

        let title = processed
            .title
            .clone()
            .unwrap_or_else(|| entry.default_title.clone());
        let body = processed
            .body
            .clone()
            .unwrap_or_else(|| entry.default_body(event));

        let mut data = Map::new();
        data.insert("eventId".to_string(), Value::String(event.id.clone()));
        data.insert(
            "eventType".to_string(),
            Value::String(event.event_type.clone()),
        );
        for (key, value) in &event.data {
            data.insert(key.clone(), value.clone());
        }
        if let Some(extra) = &processed.data {
            for (key, value) in extra {
                data.insert(key.clone(), value.clone());
            }
        }

        Self {
            title,
            body,
            data,
            priority: processed.priority,
            time_to_live: processed.time_to_live,
        }
    }

    /// Coerces every data value to a string. This is a transport
    /// constraint (FCM data payloads are string maps), not a business
    /// rule, so it is applied immediately before send.
    pub fn sanitized_data(&self) -> HashMap<String, String> {
        self.data
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }
}
