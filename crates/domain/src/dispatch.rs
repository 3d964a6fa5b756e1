use crate::delivery::{DeliveryOutcome, SendReport};
use crate::event::ProcessedEvent;
use serde::Serialize;

pub const NO_TOKENS_AVAILABLE: &str = "No tokens available";

/// The per-recipient slice of a dispatch result. Every recipient of an
/// event gets exactly one of these, whatever happened to its pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDispatchResult {
    pub user_id: String,
    /// Partial delivery counts: true when at least one device got it
    pub success: bool,
    pub tokens_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub failed_tokens: Vec<DeliveryOutcome>,
}

impl UserDispatchResult {
    pub fn no_tokens(user_id: &str) -> Self {
        Self::failed(user_id, NO_TOKENS_AVAILABLE)
    }

    pub fn failed(user_id: &str, reason: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            success: false,
            tokens_count: 0,
            success_count: 0,
            failure_count: 0,
            reason: Some(reason.to_string()),
            failed_tokens: Vec::new(),
        }
    }

    pub fn from_report(user_id: &str, tokens_count: usize, report: SendReport) -> Self {
        Self {
            user_id: user_id.to_string(),
            success: report.success_count > 0,
            tokens_count,
            success_count: report.success_count,
            failure_count: report.failure_count,
            reason: None,
            failed_tokens: report
                .outcomes
                .into_iter()
                .filter(|outcome| !outcome.success)
                .collect(),
        }
    }
}

/// What a single dispatch run did, returned to the inbound transport
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    /// True when at least one recipient got at least one delivery
    pub notified: bool,
    pub user_results: Vec<UserDispatchResult>,
    pub processed_event: ProcessedEvent,
}
