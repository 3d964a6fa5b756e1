use crate::dtos::UserDispatchResultDTO;
use pushbridge_domain::DispatchReport;
use serde::{Deserialize, Serialize};

pub mod dispatch_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub source: String,
    }

    /// The raw event payload as the external system posted it
    pub type RequestBody = serde_json::Value;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub success: bool,
        pub notified: bool,
        pub notified_users: usize,
        pub successful_notifications: usize,
        pub user_results: Vec<UserDispatchResultDTO>,
    }

    impl APIResponse {
        pub fn new(report: DispatchReport) -> Self {
            let successful_notifications = report
                .user_results
                .iter()
                .filter(|result| result.success)
                .count();
            Self {
                success: true,
                notified: report.notified,
                notified_users: report.user_results.len(),
                successful_notifications,
                user_results: report
                    .user_results
                    .into_iter()
                    .map(UserDispatchResultDTO::new)
                    .collect(),
            }
        }
    }
}
