use pushbridge_domain::{DeviceInfo, PushToken};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushTokenDTO {
    pub user_id: String,
    pub token: String,
    pub device_info: DeviceInfo,
    pub created_at: i64,
    pub last_updated: i64,
    pub is_active: bool,
}

impl PushTokenDTO {
    pub fn new(push_token: PushToken) -> Self {
        Self {
            user_id: push_token.user_id,
            token: push_token.token,
            device_info: push_token.device_info,
            created_at: push_token.created_at,
            last_updated: push_token.last_updated,
            is_active: push_token.is_active,
        }
    }
}
