use crate::error::ApiError;
use crate::shared::{
    auth::protect_webhook_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use futures::future::join_all;
use pushbridge_api_structs::dispatch_event::*;
use pushbridge_domain::{
    ClassificationError, DeliveryFailure, DispatchReport, EventProcessor, Notification,
    ProcessedEvent, UserDispatchResult,
};
use pushbridge_infra::Context;
use tracing::{info, warn};

pub async fn dispatch_event_default_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    protect_webhook_route(&http_req, &ctx)?;

    let usecase = DispatchEventUseCase {
        payload: body.0,
        source: "default".to_string(),
    };

    execute(usecase, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::new(report)))
        .map_err(ApiError::from)
}

pub async fn dispatch_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    protect_webhook_route(&http_req, &ctx)?;

    let usecase = DispatchEventUseCase {
        payload: body.0,
        source: path_params.source.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::new(report)))
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct DispatchEventUseCase {
    pub payload: serde_json::Value,
    pub source: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidEvent(ClassificationError),
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidEvent(e) => Self::UnprocessableEvent(e.to_string()),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchEventUseCase {
    type Response = DispatchReport;

    type Error = UseCaseError;

    const NAME: &'static str = "DispatchEvent";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let processor = EventProcessor::new(ctx.event_types.clone());
        let processed = processor
            .process(&self.payload, &self.source, ctx.sys.get_timestamp_millis())
            .map_err(UseCaseError::InvalidEvent)?;

        if !processed.should_notify {
            info!(
                "Event {} of type {} is silent, skipping dispatch",
                processed.event.id, processed.event.event_type
            );
            return Ok(DispatchReport {
                notified: false,
                user_results: Vec::new(),
                processed_event: processed,
            });
        }
        if processed.users_to_notify.is_empty() {
            info!(
                "Event {} of type {} resolved no recipients",
                processed.event.id, processed.event.event_type
            );
            return Ok(DispatchReport {
                notified: false,
                user_results: Vec::new(),
                processed_event: processed,
            });
        }

        let user_results = join_all(
            processed
                .users_to_notify
                .iter()
                .map(|user_id| notify_user(user_id, &processed, ctx)),
        )
        .await;

        let notified = user_results.iter().any(|result| result.success);
        Ok(DispatchReport {
            notified,
            user_results,
            processed_event: processed,
        })
    }
}

/// Runs the delivery pipeline for one recipient. Always resolves to a
/// result entry, a failure here never fails the dispatch as a whole.
async fn notify_user(user_id: &str, processed: &ProcessedEvent, ctx: &Context) -> UserDispatchResult {
    let tokens = match ctx.repos.push_tokens.find_active_tokens(user_id).await {
        Ok(tokens) => tokens,
        Err(e) => {
            warn!("Token lookup for user {} failed: {:?}", user_id, e);
            return UserDispatchResult::failed(user_id, "Token lookup failed");
        }
    };
    if tokens.is_empty() {
        return UserDispatchResult::no_tokens(user_id);
    }

    let entry = ctx.event_types.entry(&processed.event.event_type);
    let notification = Notification::build(processed, entry);

    let report = match ctx.push_sender.send(&notification, &tokens).await {
        Ok(report) => report,
        Err(e) => {
            warn!("Push delivery for user {} failed: {:?}", user_id, e);
            return UserDispatchResult::failed(user_id, "Push delivery failed");
        }
    };

    // Permanently dead tokens are retired right away so the next
    // dispatch does not retry them
    for outcome in &report.outcomes {
        if outcome.failure == Some(DeliveryFailure::Unregistered)
            && !ctx.repos.push_tokens.mark_inactive(&outcome.token).await
        {
            warn!("Unable to deactivate unknown token {}", outcome.token);
        }
    }

    UserDispatchResult::from_report(user_id, tokens.len(), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushbridge_domain::{DeviceInfo, EventTypeEntry, EventTypeRegistry, PushToken, NO_TOKENS_AVAILABLE};
    use pushbridge_infra::InMemoryPushSender;
    use serde_json::json;
    use std::sync::Arc;

    fn ctx_with_sender() -> (Context, Arc<InMemoryPushSender>) {
        let sender = Arc::new(InMemoryPushSender::new());
        let ctx = Context::create_inmemory_with_sender(sender.clone());
        (ctx, sender)
    }

    async fn register(ctx: &Context, user_id: &str, token: &str) {
        ctx.repos
            .push_tokens
            .insert(&PushToken::new(user_id, token, DeviceInfo::new(), 0))
            .await
            .unwrap();
    }

    async fn dispatch(ctx: &Context, payload: serde_json::Value) -> DispatchReport {
        let usecase = DispatchEventUseCase {
            payload,
            source: "default".to_string(),
        };
        execute(usecase, ctx).await.unwrap()
    }

    #[actix_web::main]
    #[test]
    async fn silent_event_types_are_never_dispatched() {
        let (mut ctx, sender) = ctx_with_sender();
        let mut registry = EventTypeRegistry::default();
        registry.register(
            "audit_log",
            EventTypeEntry::new("Audit", |_| "audit".to_string()).silent(),
        );
        ctx.event_types = Arc::new(registry);
        register(&ctx, "u1", "t1").await;

        let report = dispatch(
            &ctx,
            json!({ "type": "audit_log", "data": { "userId": "u1" } }),
        )
        .await;

        assert!(!report.notified);
        assert!(report.user_results.is_empty());
        assert!(sender.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn event_without_recipients_is_a_noop() {
        let (ctx, sender) = ctx_with_sender();

        let report = dispatch(&ctx, json!({ "type": "payment", "data": {} })).await;

        assert!(!report.notified);
        assert!(report.user_results.is_empty());
        assert!(sender.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn recipient_without_tokens_gets_a_result_entry_and_no_send() {
        let (ctx, sender) = ctx_with_sender();

        let report = dispatch(
            &ctx,
            json!({ "type": "payment", "data": { "userId": "u1" } }),
        )
        .await;

        assert!(!report.notified);
        assert_eq!(report.user_results.len(), 1);
        let result = &report.user_results[0];
        assert_eq!(result.user_id, "u1");
        assert!(!result.success);
        assert_eq!(result.reason.as_deref(), Some(NO_TOKENS_AVAILABLE));
        assert!(sender.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn unregistered_tokens_are_retired_and_transient_ones_kept() {
        let (ctx, sender) = ctx_with_sender();
        register(&ctx, "u1", "t1").await;
        register(&ctx, "u1", "t2").await;
        register(&ctx, "u1", "t3").await;
        sender.fail_token("t2", DeliveryFailure::Unregistered);
        sender.fail_token("t3", DeliveryFailure::Transient);

        let report = dispatch(
            &ctx,
            json!({ "type": "message", "data": { "userId": "u1" } }),
        )
        .await;

        assert!(report.notified);
        let result = &report.user_results[0];
        assert!(result.success);
        assert_eq!(result.tokens_count, 3);
        assert_eq!(result.success_count, 1);
        assert_eq!(result.failure_count, 2);

        assert!(!ctx.repos.push_tokens.is_active("t2").await);
        assert!(ctx.repos.push_tokens.is_active("t3").await);

        // The next dispatch only reaches the live tokens
        let active = ctx.repos.push_tokens.find_active_tokens("u1").await.unwrap();
        assert_eq!(active, vec!["t1".to_string(), "t3".to_string()]);
    }

    #[actix_web::main]
    #[test]
    async fn delivers_a_payment_event_with_sanitized_data() {
        let (ctx, sender) = ctx_with_sender();
        register(&ctx, "u1", "t1").await;
        register(&ctx, "u1", "t2").await;
        sender.fail_token("t2", DeliveryFailure::Unregistered);

        let report = dispatch(
            &ctx,
            json!({
                "id": "evt-1",
                "type": "payment",
                "data": { "userId": "u1", "amount": 42 }
            }),
        )
        .await;

        assert!(report.notified);
        let result = &report.user_results[0];
        assert!(result.success);
        assert_eq!(result.failed_tokens.len(), 1);
        assert_eq!(result.failed_tokens[0].token, "t2");

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].tokens, vec!["t1".to_string(), "t2".to_string()]);
        assert_eq!(sent[0].notification.title, "Nuevo pago recibido");
        assert_eq!(sent[0].notification.body, "Se ha recibido un pago de 42.");
        // Data values reach the transport as strings
        assert_eq!(sent[0].data["amount"], "42");
        assert_eq!(sent[0].data["eventId"], "evt-1");
        assert_eq!(sent[0].data["eventType"], "payment");
    }

    #[actix_web::main]
    #[test]
    async fn transport_errors_are_isolated_per_recipient() {
        let (ctx, sender) = ctx_with_sender();
        register(&ctx, "u1", "t1").await;
        register(&ctx, "u2", "t2").await;
        sender.break_token("t1");

        let report = dispatch(
            &ctx,
            json!({ "type": "message", "data": { "recipients": ["u1", "u2"] } }),
        )
        .await;

        // u2 still got its delivery
        assert!(report.notified);
        assert_eq!(report.user_results.len(), 2);

        let u1 = &report.user_results[0];
        assert_eq!(u1.user_id, "u1");
        assert!(!u1.success);
        assert_eq!(u1.reason.as_deref(), Some("Push delivery failed"));

        let u2 = &report.user_results[1];
        assert_eq!(u2.user_id, "u2");
        assert!(u2.success);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_payloads_that_cannot_be_classified() {
        let (ctx, _) = ctx_with_sender();

        let usecase = DispatchEventUseCase {
            payload: json!({ "data": { "userId": "u1" } }),
            source: "default".to_string(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await.unwrap_err(),
            UseCaseError::InvalidEvent(ClassificationError::MissingEventType)
        ));

        let usecase = DispatchEventUseCase {
            payload: json!("not an object"),
            source: "default".to_string(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await.unwrap_err(),
            UseCaseError::InvalidEvent(ClassificationError::NotAnObject)
        ));
    }

    #[actix_web::main]
    #[test]
    async fn unknown_event_types_use_the_fallback_template() {
        let (ctx, sender) = ctx_with_sender();
        register(&ctx, "u1", "t1").await;

        let report = dispatch(
            &ctx,
            json!({ "type": "something_new", "data": { "userId": "u1" } }),
        )
        .await;

        assert!(report.notified);
        let sent = sender.sent();
        assert_eq!(sent[0].notification.title, "Nueva notificación");
        assert_eq!(sent[0].notification.body, "Tienes una nueva notificación.");
    }
}
