use crate::error::ApiError;
use crate::shared::{
    auth::protect_webhook_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use pushbridge_api_structs::purge_stale_tokens::*;
use pushbridge_infra::Context;
use tracing::info;

pub async fn purge_stale_tokens_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    protect_webhook_route(&http_req, &ctx)?;

    let usecase = PurgeStaleTokensUseCase {
        days: query_params.0.days,
    };

    execute(usecase, &ctx)
        .await
        .map(|purged| HttpResponse::Ok().json(APIResponse { purged }))
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct PurgeStaleTokensUseCase {
    /// Retention window override, falls back to the configured default
    pub days: Option<i64>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidRetention(i64),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidRetention(days) => Self::BadClientData(format!(
                "{} is not a usable retention window in days",
                days
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for PurgeStaleTokensUseCase {
    type Response = u64;

    type Error = UseCaseError;

    const NAME: &'static str = "PurgeStaleTokens";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let days = self.days.unwrap_or(ctx.config.token_retention_days);
        if days <= 0 {
            return Err(UseCaseError::InvalidRetention(days));
        }

        // The window is caller-controlled, an oversized value must not
        // wrap the cutoff past "now" and wipe fresh records
        let cutoff = days
            .checked_mul(24 * 60 * 60 * 1000)
            .and_then(|window| ctx.sys.get_timestamp_millis().checked_sub(window))
            .ok_or(UseCaseError::InvalidRetention(days))?;
        let purged = ctx
            .repos
            .push_tokens
            .purge_older_than(cutoff)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!("Purged {} token records older than {} days", purged, days);
        Ok(purged)
    }
}
