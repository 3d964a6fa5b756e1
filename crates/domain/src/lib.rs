mod delivery;
mod dispatch;
mod event;
mod event_rules;
mod notification;
mod push_token;

pub use delivery::{DeliveryFailure, DeliveryOutcome, SendReport};
pub use dispatch::{DispatchReport, UserDispatchResult, NO_TOKENS_AVAILABLE};
pub use event::{ClassificationError, Event, Priority, ProcessedEvent, DEFAULT_TIME_TO_LIVE};
pub use event_rules::{
    EventProcessor, EventTypeEntry, EventTypeRegistry, FieldRecipientResolver, RecipientResolver,
};
pub use notification::Notification;
pub use push_token::{DeviceInfo, PushToken};
