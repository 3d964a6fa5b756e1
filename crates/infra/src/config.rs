use pushbridge_utils::create_random_secret;
use tracing::{info, warn};

const DEFAULT_FCM_API_URL: &str = "https://fcm.googleapis.com/fcm/send";

#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret inbound webhooks must present in the
    /// `x-webhook-token` header
    pub webhook_secret: String,
    /// Port for the application to run on
    pub port: usize,
    /// FCM legacy server key. Without it push delivery falls back to the
    /// inmemory sender.
    pub fcm_server_key: Option<String>,
    /// FCM endpoint, overridable for local development
    pub fcm_api_url: String,
    /// Token records not updated for this many days are eligible for the
    /// stale purge
    pub token_retention_days: i64,
}

impl Config {
    pub fn new() -> Self {
        let webhook_secret = match std::env::var("WEBHOOK_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find WEBHOOK_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(16);
                info!(
                    "Webhook secret was generated and set to: {}",
                    secret
                );
                secret
            }
        };

        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                5000
            }
        };

        let fcm_server_key = std::env::var("FCM_SERVER_KEY").ok();
        let fcm_api_url =
            std::env::var("FCM_API_URL").unwrap_or_else(|_| DEFAULT_FCM_API_URL.into());

        let default_retention_days = 90;
        let token_retention_days = match std::env::var("TOKEN_RETENTION_DAYS") {
            Ok(days) => match days.parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    warn!(
                        "The given TOKEN_RETENTION_DAYS: {} is not valid, falling back to the default: {}.",
                        days, default_retention_days
                    );
                    default_retention_days
                }
            },
            Err(_) => default_retention_days,
        };

        Self {
            webhook_secret,
            port,
            fcm_server_key,
            fcm_api_url,
            token_retention_days,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
