mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
use pushbridge_domain::EventTypeRegistry;
pub use repos::Repos;
pub use repos::{IPushTokenRepo, InMemoryPushTokenRepo, PostgresPushTokenRepo};
pub use services::{FcmPushSender, IPushSender, InMemoryPushSender, SentPush};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::{info, warn};

#[derive(Clone)]
pub struct Context {
    pub repos: Repos,
    pub push_sender: Arc<dyn IPushSender>,
    pub event_types: Arc<EventTypeRegistry>,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl Context {
    fn new(repos: Repos, push_sender: Arc<dyn IPushSender>, config: Config) -> Self {
        Self {
            repos,
            push_sender,
            event_types: Arc::new(EventTypeRegistry::default()),
            config,
            sys: Arc::new(RealSys {}),
        }
    }

    pub fn create_inmemory() -> Self {
        Self::create_inmemory_with_sender(Arc::new(InMemoryPushSender::new()))
    }

    pub fn create_inmemory_with_sender(push_sender: Arc<dyn IPushSender>) -> Self {
        Self::new(Repos::create_inmemory(), push_sender, Config::new())
    }

    async fn create_postgres(
        connection_string: &str,
        push_sender: Arc<dyn IPushSender>,
        config: Config,
    ) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(connection_string).await?;
        Ok(Self::new(repos, push_sender, config))
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> Context {
    const DATABASE_URL: &str = "DATABASE_URL";

    let config = Config::new();

    let push_sender: Arc<dyn IPushSender> = match &config.fcm_server_key {
        Some(server_key) => Arc::new(FcmPushSender::new(
            server_key.clone(),
            config.fcm_api_url.clone(),
        )),
        None => {
            warn!("FCM_SERVER_KEY env var was not provided. Going to use the inmemory push sender, notifications will not leave the process.");
            Arc::new(InMemoryPushSender::new())
        }
    };

    match std::env::var(DATABASE_URL) {
        Ok(connection_string) => {
            info!("{} env var was provided. Going to use postgres.", DATABASE_URL);
            Context::create_postgres(&connection_string, push_sender, config)
                .await
                .expect("Postgres credentials must be set and valid")
        }
        Err(_) => {
            info!(
                "{} env var was not provided. Going to use inmemory infra.",
                DATABASE_URL
            );
            Context::new(Repos::create_inmemory(), push_sender, config)
        }
    }
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let connection_string =
        std::env::var("DATABASE_URL").expect("DATABASE_URL env var to be present.");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
