mod inmemory;
mod postgres;

pub use inmemory::InMemoryPushTokenRepo;
pub use postgres::PostgresPushTokenRepo;
use pushbridge_domain::PushToken;

#[async_trait::async_trait]
pub trait IPushTokenRepo: Send + Sync {
    async fn insert(&self, token: &PushToken) -> anyhow::Result<()>;
    /// Overwrites the record with the matching (user_id, token) pair
    async fn save(&self, token: &PushToken) -> anyhow::Result<()>;
    async fn find(&self, user_id: &str, token: &str) -> Option<PushToken>;
    /// Hard delete. Returns the deleted record, `None` when the pair
    /// was absent.
    async fn delete(&self, user_id: &str, token: &str) -> Option<PushToken>;
    /// Soft delete, keeps the record for audit. Returns false when the
    /// token is unknown.
    async fn mark_inactive(&self, token: &str) -> bool;
    async fn is_active(&self, token: &str) -> bool;
    /// Tokens eligible for delivery: every returned token has
    /// `is_active == true`
    async fn find_active_tokens(&self, user_id: &str) -> anyhow::Result<Vec<String>>;
    /// All records for a user, active and inactive
    async fn find_by_user(&self, user_id: &str) -> Vec<PushToken>;
    /// Hard deletes records whose `last_updated` predates the cutoff.
    /// Returns the number of deleted records.
    async fn purge_older_than(&self, cutoff_millis: i64) -> anyhow::Result<u64>;
}
