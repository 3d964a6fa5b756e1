use super::IPushSender;
use anyhow::anyhow;
use pushbridge_domain::{DeliveryFailure, DeliveryOutcome, Notification, SendReport};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A push the inmemory sender accepted, with the data map as the
/// transport saw it (sanitized)
#[derive(Debug, Clone)]
pub struct SentPush {
    pub notification: Notification,
    pub data: HashMap<String, String>,
    pub tokens: Vec<String>,
}

/// Push sender used by tests and credential-less environments. Per-token
/// failures and whole-send transport errors can be scripted.
pub struct InMemoryPushSender {
    sent: Mutex<Vec<SentPush>>,
    failures: Mutex<HashMap<String, DeliveryFailure>>,
    broken_tokens: Mutex<HashSet<String>>,
}

impl InMemoryPushSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            broken_tokens: Mutex::new(HashSet::new()),
        }
    }

    /// Report the given failure for this token on every send
    pub fn fail_token(&self, token: &str, failure: DeliveryFailure) {
        self.failures.lock().unwrap().insert(token.to_string(), failure);
    }

    /// Make any send that includes this token fail as a whole, as a
    /// transport level error
    pub fn break_token(&self, token: &str) {
        self.broken_tokens.lock().unwrap().insert(token.to_string());
    }

    pub fn sent(&self) -> Vec<SentPush> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryPushSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPushSender for InMemoryPushSender {
    async fn send(
        &self,
        notification: &Notification,
        tokens: &[String],
    ) -> anyhow::Result<SendReport> {
        if tokens.is_empty() {
            return Ok(SendReport::empty());
        }

        {
            let broken = self.broken_tokens.lock().unwrap();
            if tokens.iter().any(|token| broken.contains(token)) {
                return Err(anyhow!("push transport error"));
            }
        }

        self.sent.lock().unwrap().push(SentPush {
            notification: notification.clone(),
            data: notification.sanitized_data(),
            tokens: tokens.to_vec(),
        });

        let failures = self.failures.lock().unwrap();
        let outcomes = tokens
            .iter()
            .map(|token| match failures.get(token) {
                Some(failure) => DeliveryOutcome::failure(token, *failure),
                None => DeliveryOutcome::success(token),
            })
            .collect();

        Ok(SendReport::from_outcomes(outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushbridge_domain::Priority;
    use serde_json::Map;

    fn notification() -> Notification {
        Notification {
            title: "title".to_string(),
            body: "body".to_string(),
            data: Map::new(),
            priority: Priority::Normal,
            time_to_live: 60,
        }
    }

    #[tokio::test]
    async fn sending_with_zero_tokens_is_a_noop() {
        let sender = InMemoryPushSender::new();
        let report = sender.send(&notification(), &[]).await.unwrap();
        assert_eq!(report.success_count, 0);
        assert_eq!(report.failure_count, 0);
        assert!(report.outcomes.is_empty());
        // The transport was never invoked
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn scripted_failures_show_up_in_the_report() {
        let sender = InMemoryPushSender::new();
        sender.fail_token("t2", DeliveryFailure::Transient);

        let tokens = vec!["t1".to_string(), "t2".to_string()];
        let report = sender.send(&notification(), &tokens).await.unwrap();
        assert_eq!(report.success_count, 1);
        assert_eq!(report.failure_count, 1);
        assert_eq!(report.outcomes[1].failure, Some(DeliveryFailure::Transient));
    }
}
