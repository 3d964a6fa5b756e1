mod fcm;
mod inmemory;

pub use fcm::FcmPushSender;
pub use inmemory::{InMemoryPushSender, SentPush};
use pushbridge_domain::{Notification, SendReport};

/// Outbound push transport. Implementations must return one outcome per
/// input token, index-aligned with the token list, and treat an empty
/// token list as a no-op that never reaches the wire.
#[async_trait::async_trait]
pub trait IPushSender: Send + Sync {
    async fn send(&self, notification: &Notification, tokens: &[String])
        -> anyhow::Result<SendReport>;
}
