use super::IPushTokenRepo;
use pushbridge_domain::PushToken;
use std::sync::Mutex;

pub struct InMemoryPushTokenRepo {
    tokens: Mutex<Vec<PushToken>>,
}

impl InMemoryPushTokenRepo {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPushTokenRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPushTokenRepo for InMemoryPushTokenRepo {
    async fn insert(&self, token: &PushToken) -> anyhow::Result<()> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.push(token.clone());
        Ok(())
    }

    async fn save(&self, token: &PushToken) -> anyhow::Result<()> {
        let mut tokens = self.tokens.lock().unwrap();
        for existing in tokens.iter_mut() {
            if existing.user_id == token.user_id && existing.token == token.token {
                *existing = token.clone();
            }
        }
        Ok(())
    }

    async fn find(&self, user_id: &str, token: &str) -> Option<PushToken> {
        let tokens = self.tokens.lock().unwrap();
        tokens
            .iter()
            .find(|t| t.user_id == user_id && t.token == token)
            .cloned()
    }

    async fn delete(&self, user_id: &str, token: &str) -> Option<PushToken> {
        let mut tokens = self.tokens.lock().unwrap();
        let pos = tokens
            .iter()
            .position(|t| t.user_id == user_id && t.token == token)?;
        Some(tokens.remove(pos))
    }

    async fn mark_inactive(&self, token: &str) -> bool {
        let mut tokens = self.tokens.lock().unwrap();
        let mut found = false;
        for existing in tokens.iter_mut() {
            if existing.token == token {
                existing.is_active = false;
                found = true;
            }
        }
        found
    }

    async fn is_active(&self, token: &str) -> bool {
        let tokens = self.tokens.lock().unwrap();
        tokens.iter().any(|t| t.token == token && t.is_active)
    }

    async fn find_active_tokens(&self, user_id: &str) -> anyhow::Result<Vec<String>> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens
            .iter()
            .filter(|t| t.user_id == user_id && t.is_active)
            .map(|t| t.token.clone())
            .collect())
    }

    async fn find_by_user(&self, user_id: &str) -> Vec<PushToken> {
        let tokens = self.tokens.lock().unwrap();
        tokens
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    async fn purge_older_than(&self, cutoff_millis: i64) -> anyhow::Result<u64> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.last_updated >= cutoff_millis);
        Ok((before - tokens.len()) as u64)
    }
}
