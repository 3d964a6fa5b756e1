use serde::{Deserialize, Serialize};

/// How a single token delivery failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryFailure {
    /// The token is permanently invalid, safe to prune
    Unregistered,
    /// Temporary transport failure, the token must be retained
    Transient,
    Unknown,
}

/// The result of one send attempt for one token. Never persisted,
/// consumed immediately by the dispatcher to decide pruning.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    pub token: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<DeliveryFailure>,
}

impl DeliveryOutcome {
    pub fn success(token: &str) -> Self {
        Self {
            token: token.to_string(),
            success: true,
            failure: None,
        }
    }

    pub fn failure(token: &str, failure: DeliveryFailure) -> Self {
        Self {
            token: token.to_string(),
            success: false,
            failure: Some(failure),
        }
    }
}

/// Aggregate result of a multi-token send. `outcomes` is index-aligned
/// with the token list that was handed to the sender.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReport {
    pub success_count: usize,
    pub failure_count: usize,
    pub outcomes: Vec<DeliveryOutcome>,
}

impl SendReport {
    /// The report for a send that was skipped because there was nothing
    /// to deliver to
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_outcomes(outcomes: Vec<DeliveryOutcome>) -> Self {
        let success_count = outcomes.iter().filter(|o| o.success).count();
        Self {
            success_count,
            failure_count: outcomes.len() - success_count,
            outcomes,
        }
    }
}
