use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Free-form device metadata provided at registration time
pub type DeviceInfo = HashMap<String, String>;

/// A registered delivery token for one device of one user.
/// Identity is the (user_id, token) pair, at most one active record
/// per pair. Records are soft-deleted (`is_active = false`) when the
/// push transport reports the token permanently invalid and hard
/// deleted on explicit removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushToken {
    pub user_id: String,
    pub token: String,
    pub device_info: DeviceInfo,
    pub created_at: i64,
    pub last_updated: i64,
    pub is_active: bool,
}

impl PushToken {
    pub fn new(user_id: &str, token: &str, device_info: DeviceInfo, now_millis: i64) -> Self {
        Self {
            user_id: user_id.to_string(),
            token: token.to_string(),
            device_info,
            created_at: now_millis,
            last_updated: now_millis,
            is_active: true,
        }
    }
}
