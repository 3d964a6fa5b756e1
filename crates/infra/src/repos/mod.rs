mod push_token;

pub use push_token::{IPushTokenRepo, InMemoryPushTokenRepo, PostgresPushTokenRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub push_tokens: Arc<dyn IPushTokenRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        Ok(Self {
            push_tokens: Arc::new(PostgresPushTokenRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            push_tokens: Arc::new(InMemoryPushTokenRepo::new()),
        }
    }
}
