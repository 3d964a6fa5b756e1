use pushbridge_domain::{DeliveryOutcome, UserDispatchResult};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDispatchResultDTO {
    pub user_id: String,
    pub success: bool,
    pub tokens_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub failed_tokens: Vec<DeliveryOutcome>,
}

impl UserDispatchResultDTO {
    pub fn new(result: UserDispatchResult) -> Self {
        Self {
            user_id: result.user_id,
            success: result.success,
            tokens_count: result.tokens_count,
            success_count: result.success_count,
            failure_count: result.failure_count,
            reason: result.reason,
            failed_tokens: result.failed_tokens,
        }
    }
}
