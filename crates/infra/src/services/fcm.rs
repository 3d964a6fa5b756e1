use super::IPushSender;
use pushbridge_domain::{
    DeliveryFailure, DeliveryOutcome, Notification, Priority, SendReport,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Push delivery through the FCM legacy HTTP API. One multicast request
/// per send, the response `results` array is index-aligned with the
/// submitted `registration_ids`.
pub struct FcmPushSender {
    client: reqwest::Client,
    server_key: String,
    api_url: String,
}

impl FcmPushSender {
    pub fn new(server_key: String, api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            server_key,
            api_url,
        }
    }
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    registration_ids: &'a [String],
    notification: FcmNotification<'a>,
    data: HashMap<String, String>,
    priority: &'static str,
    time_to_live: i64,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    results: Vec<FcmResult>,
}

#[derive(Debug, Default, Deserialize)]
struct FcmResult {
    message_id: Option<String>,
    error: Option<String>,
}

/// FCM error codes that mean the token is gone for good
const UNREGISTERED_CODES: [&str; 3] =
    ["NotRegistered", "InvalidRegistration", "MismatchSenderId"];
/// FCM error codes worth retrying later
const TRANSIENT_CODES: [&str; 3] = [
    "Unavailable",
    "InternalServerError",
    "DeviceMessageRateExceeded",
];

fn classify_error(code: &str) -> DeliveryFailure {
    if UNREGISTERED_CODES.contains(&code) {
        DeliveryFailure::Unregistered
    } else if TRANSIENT_CODES.contains(&code) {
        DeliveryFailure::Transient
    } else {
        DeliveryFailure::Unknown
    }
}

fn report_from_results(tokens: &[String], results: &[FcmResult]) -> SendReport {
    if results.len() != tokens.len() {
        warn!(
            "FCM returned {} results for {} tokens",
            results.len(),
            tokens.len()
        );
    }

    let outcomes = tokens
        .iter()
        .enumerate()
        .map(|(idx, token)| match results.get(idx) {
            Some(result) => match &result.error {
                Some(code) => DeliveryOutcome::failure(token, classify_error(code)),
                None if result.message_id.is_some() => DeliveryOutcome::success(token),
                None => DeliveryOutcome::failure(token, DeliveryFailure::Unknown),
            },
            // Missing entry in a short response still has to produce an
            // outcome for this token
            None => DeliveryOutcome::failure(token, DeliveryFailure::Unknown),
        })
        .collect();

    SendReport::from_outcomes(outcomes)
}

#[async_trait::async_trait]
impl IPushSender for FcmPushSender {
    async fn send(
        &self,
        notification: &Notification,
        tokens: &[String],
    ) -> anyhow::Result<SendReport> {
        if tokens.is_empty() {
            return Ok(SendReport::empty());
        }

        let message = FcmMessage {
            registration_ids: tokens,
            notification: FcmNotification {
                title: &notification.title,
                body: &notification.body,
            },
            data: notification.sanitized_data(),
            priority: match notification.priority {
                Priority::High => "high",
                Priority::Normal => "normal",
            },
            time_to_live: notification.time_to_live,
        };

        let res = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&message)
            .send()
            .await?
            .error_for_status()?;

        let fcm_response: FcmResponse = res.json().await?;
        Ok(report_from_results(tokens, &fcm_response.results))
    }
}
