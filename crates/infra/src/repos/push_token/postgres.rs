use super::IPushTokenRepo;
use pushbridge_domain::{DeviceInfo, PushToken};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Row};

pub struct PostgresPushTokenRepo {
    pool: PgPool,
}

impl PostgresPushTokenRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PushTokenRaw {
    user_id: String,
    token: String,
    device_info: Json<DeviceInfo>,
    created_at: i64,
    last_updated: i64,
    is_active: bool,
}

impl From<PushTokenRaw> for PushToken {
    fn from(raw: PushTokenRaw) -> Self {
        Self {
            user_id: raw.user_id,
            token: raw.token,
            device_info: raw.device_info.0,
            created_at: raw.created_at,
            last_updated: raw.last_updated,
            is_active: raw.is_active,
        }
    }
}

#[async_trait::async_trait]
impl IPushTokenRepo for PostgresPushTokenRepo {
    async fn insert(&self, token: &PushToken) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO push_tokens(user_id, token, device_info, created_at, last_updated, is_active)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&token.user_id)
        .bind(&token.token)
        .bind(Json(&token.device_info))
        .bind(token.created_at)
        .bind(token.last_updated)
        .bind(token.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, token: &PushToken) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE push_tokens
            SET device_info = $3,
            last_updated = $4,
            is_active = $5
            WHERE user_id = $1 AND token = $2
            "#,
        )
        .bind(&token.user_id)
        .bind(&token.token)
        .bind(Json(&token.device_info))
        .bind(token.last_updated)
        .bind(token.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, user_id: &str, token: &str) -> Option<PushToken> {
        sqlx::query_as::<_, PushTokenRaw>(
            r#"
            SELECT * FROM push_tokens
            WHERE user_id = $1 AND token = $2
            "#,
        )
        .bind(user_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(PushToken::from)
    }

    async fn delete(&self, user_id: &str, token: &str) -> Option<PushToken> {
        match sqlx::query_as::<_, PushTokenRaw>(
            r#"
            DELETE FROM push_tokens
            WHERE user_id = $1 AND token = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await
        {
            Ok(deleted) => Some(deleted.into()),
            Err(_) => None,
        }
    }

    async fn mark_inactive(&self, token: &str) -> bool {
        sqlx::query(
            r#"
            UPDATE push_tokens
            SET is_active = FALSE
            WHERE token = $1
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map(|res| res.rows_affected() > 0)
        .unwrap_or(false)
    }

    async fn is_active(&self, token: &str) -> bool {
        sqlx::query(
            r#"
            SELECT 1 AS one FROM push_tokens
            WHERE token = $1 AND is_active = TRUE
            LIMIT 1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.is_some())
        .unwrap_or(false)
    }

    async fn find_active_tokens(&self, user_id: &str) -> anyhow::Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT token FROM push_tokens
            WHERE user_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get("token")).collect())
    }

    async fn find_by_user(&self, user_id: &str) -> Vec<PushToken> {
        sqlx::query_as::<_, PushTokenRaw>(
            r#"
            SELECT * FROM push_tokens
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(PushToken::from)
        .collect()
    }

    async fn purge_older_than(&self, cutoff_millis: i64) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            DELETE FROM push_tokens
            WHERE last_updated < $1
            "#,
        )
        .bind(cutoff_millis)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected())
    }
}
