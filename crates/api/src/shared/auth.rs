use crate::error::ApiError;
use actix_web::HttpRequest;
use pushbridge_infra::Context;

/// Guards webhook intake and admin routes with the shared webhook
/// secret. The secret is carried in the `x-webhook-token` header.
pub fn protect_webhook_route(req: &HttpRequest, ctx: &Context) -> Result<(), ApiError> {
    let token = match req.headers().get("x-webhook-token") {
        Some(token) => match token.to_str() {
            Ok(token) => token,
            Err(_) => {
                return Err(ApiError::Unauthorized(
                    "Malformed `x-webhook-token` header".into(),
                ))
            }
        },
        None => {
            return Err(ApiError::Unauthorized(
                "Missing `x-webhook-token` header".into(),
            ))
        }
    };

    if token != ctx.config.webhook_secret {
        return Err(ApiError::Unauthorized("Invalid webhook token".into()));
    }

    Ok(())
}
