use crate::event::{
    ClassificationError, Event, Priority, ProcessedEvent, DEFAULT_TIME_TO_LIVE,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Strategy for deriving the recipients of an event. The concrete
/// mapping is integration specific, so every event type can plug in
/// its own resolver.
pub trait RecipientResolver: Send + Sync {
    fn resolve(&self, event: &Event) -> Vec<String>;
}

/// Default strategy: reads explicit recipient fields from the event
/// data, either a single `userId` or a `recipients` array.
pub struct FieldRecipientResolver;

impl RecipientResolver for FieldRecipientResolver {
    fn resolve(&self, event: &Event) -> Vec<String> {
        let mut users: Vec<String> = Vec::new();
        if let Some(Value::String(user_id)) = event.data.get("userId") {
            users.push(user_id.clone());
        }
        if let Some(Value::Array(recipients)) = event.data.get("recipients") {
            for recipient in recipients {
                if let Value::String(user_id) = recipient {
                    if !users.contains(user_id) {
                        users.push(user_id.clone());
                    }
                }
            }
        }
        users
    }
}

type BodyTemplate = Box<dyn Fn(&Event) -> String + Send + Sync>;

/// How one event type maps to a notification: default title, body
/// template, notify policy and recipient resolution.
pub struct EventTypeEntry {
    pub default_title: String,
    body: BodyTemplate,
    pub notify: bool,
    pub resolver: Arc<dyn RecipientResolver>,
}

impl EventTypeEntry {
    pub fn new<F>(default_title: &str, body: F) -> Self
    where
        F: Fn(&Event) -> String + Send + Sync + 'static,
    {
        Self {
            default_title: default_title.to_string(),
            body: Box::new(body),
            notify: true,
            resolver: Arc::new(FieldRecipientResolver),
        }
    }

    /// Informational only event type, classified but never dispatched
    pub fn silent(mut self) -> Self {
        self.notify = false;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn RecipientResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn default_body(&self, event: &Event) -> String {
        (self.body)(event)
    }
}

/// Table mapping event type to its `EventTypeEntry`. Unknown types fall
/// back to a generic entry instead of failing, so new sources can start
/// emitting events before a dedicated entry exists.
pub struct EventTypeRegistry {
    entries: HashMap<String, EventTypeEntry>,
    fallback: EventTypeEntry,
}

impl EventTypeRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: EventTypeEntry::new("Nueva notificación", |_| {
                "Tienes una nueva notificación.".to_string()
            }),
        }
    }

    pub fn register(&mut self, event_type: &str, entry: EventTypeEntry) {
        self.entries.insert(event_type.to_string(), entry);
    }

    pub fn entry(&self, event_type: &str) -> &EventTypeEntry {
        self.entries.get(event_type).unwrap_or(&self.fallback)
    }

    /// The event types known out of the box and their templates
    pub fn with_known_types() -> Self {
        let mut registry = Self::new();
        registry.register(
            "user_action",
            EventTypeEntry::new("User Action", |e| {
                format!(
                    "User {} performed action: {}",
                    e.data_field("user").unwrap_or_else(|| "unknown".into()),
                    e.data_field("action").unwrap_or_else(|| "unknown".into())
                )
            }),
        );
        registry.register(
            "system_alert",
            EventTypeEntry::new("System Alert", |e| {
                format!(
                    "Alert: {}",
                    e.data_field("message").unwrap_or_else(|| "unknown".into())
                )
            }),
        );
        registry.register(
            "data_update",
            EventTypeEntry::new("Data Update", |e| {
                format!(
                    "{} data has been updated",
                    e.data_field("entity").unwrap_or_else(|| "Entity".into())
                )
            }),
        );
        registry.register(
            "payment",
            EventTypeEntry::new("Nuevo pago recibido", |e| {
                format!(
                    "Se ha recibido un pago de {}.",
                    e.data_field("amount")
                        .unwrap_or_else(|| "cantidad no especificada".into())
                )
            }),
        );
        registry.register(
            "order",
            EventTypeEntry::new("Actualización de pedido", |e| {
                format!(
                    "Tu pedido #{} ha sido {}.",
                    e.data_field("orderId").unwrap_or_else(|| "N/A".into()),
                    e.data_field("status").unwrap_or_else(|| "actualizado".into())
                )
            }),
        );
        registry.register(
            "message",
            EventTypeEntry::new("Nuevo mensaje", |e| {
                format!(
                    "Has recibido un nuevo mensaje de {}.",
                    e.data_field("sender").unwrap_or_else(|| "un usuario".into())
                )
            }),
        );
        registry.register(
            "alert",
            EventTypeEntry::new("Alerta importante", |e| {
                e.data_field("message")
                    .unwrap_or_else(|| "Hay una alerta que requiere tu atención.".into())
            }),
        );
        registry.register(
            "reminder",
            EventTypeEntry::new("Recordatorio", |e| {
                format!(
                    "Recordatorio: {}",
                    e.data_field("message")
                        .unwrap_or_else(|| "Tienes un evento pendiente.".into())
                )
            }),
        );
        registry
    }
}

impl Default for EventTypeRegistry {
    fn default() -> Self {
        Self::with_known_types()
    }
}

/// Classifies an inbound event: decides whether it should trigger
/// notifications and who the recipients are.
pub struct EventProcessor {
    registry: Arc<EventTypeRegistry>,
}

impl EventProcessor {
    pub fn new(registry: Arc<EventTypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn process(
        &self,
        payload: &Value,
        source: &str,
        now_millis: i64,
    ) -> Result<ProcessedEvent, ClassificationError> {
        let event = Event::from_payload(payload, source, now_millis)?;
        let entry = self.registry.entry(&event.event_type);
        let users_to_notify = entry.resolver.resolve(&event);

        // Explicit payload fields take precedence over the per-type defaults
        let title = payload
            .get("title")
            .and_then(Value::as_str)
            .map(String::from);
        let body = payload.get("body").and_then(Value::as_str).map(String::from);
        let priority = match payload.get("priority").and_then(Value::as_str) {
            Some("high") => Priority::High,
            _ => Priority::Normal,
        };
        let time_to_live = payload
            .get("timeToLive")
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_TIME_TO_LIVE);

        Ok(ProcessedEvent {
            should_notify: entry.notify,
            users_to_notify,
            title,
            body,
            data: None,
            priority,
            time_to_live,
            event,
        })
    }
}
