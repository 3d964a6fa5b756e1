use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use pushbridge_api_structs::register_token::*;
use pushbridge_domain::{DeviceInfo, PushToken};
use pushbridge_infra::Context;

pub async fn register_token_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    let body = body.0;
    let usecase = RegisterTokenUseCase {
        user_id: body.user_id,
        token: body.token,
        device_info: body.device_info.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|registration| {
            let response = APIResponse {
                success: true,
                created: registration.created,
                user_id: registration.push_token.user_id,
                token: registration.push_token.token,
            };
            if registration.created {
                HttpResponse::Created().json(response)
            } else {
                HttpResponse::Ok().json(response)
            }
        })
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct RegisterTokenUseCase {
    pub user_id: String,
    pub token: String,
    pub device_info: DeviceInfo,
}

#[derive(Debug)]
pub struct TokenRegistration {
    pub push_token: PushToken,
    pub created: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidInput(&'static str),
    StorageError,
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidInput(field) => {
                Self::BadClientData(format!("A non-empty `{}` field is required", field))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RegisterTokenUseCase {
    type Response = TokenRegistration;

    type Error = UseCaseError;

    const NAME: &'static str = "RegisterToken";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.user_id.trim().is_empty() {
            return Err(UseCaseError::InvalidInput("userId"));
        }
        if self.token.trim().is_empty() {
            return Err(UseCaseError::InvalidInput("token"));
        }

        let now = ctx.sys.get_timestamp_millis();
        match ctx.repos.push_tokens.find(&self.user_id, &self.token).await {
            Some(mut existing) => {
                // Re-registration refreshes the record and revives a
                // previously deactivated token
                for (key, value) in self.device_info.drain() {
                    existing.device_info.insert(key, value);
                }
                existing.last_updated = now;
                existing.is_active = true;
                ctx.repos
                    .push_tokens
                    .save(&existing)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                Ok(TokenRegistration {
                    push_token: existing,
                    created: false,
                })
            }
            None => {
                let push_token = PushToken::new(
                    &self.user_id,
                    &self.token,
                    std::mem::take(&mut self.device_info),
                    now,
                );
                ctx.repos
                    .push_tokens
                    .insert(&push_token)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                Ok(TokenRegistration {
                    push_token,
                    created: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usecase(user_id: &str, token: &str) -> RegisterTokenUseCase {
        RegisterTokenUseCase {
            user_id: user_id.to_string(),
            token: token.to_string(),
            device_info: DeviceInfo::new(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn registers_a_new_token() {
        let ctx = Context::create_inmemory();

        let registration = execute(usecase("u1", "t1"), &ctx).await.unwrap();
        assert!(registration.created);
        assert!(registration.push_token.is_active);

        let stored = ctx.repos.push_tokens.find("u1", "t1").await.unwrap();
        assert_eq!(stored.user_id, "u1");
        assert_eq!(stored.created_at, stored.last_updated);
    }

    #[actix_web::main]
    #[test]
    async fn re_registration_updates_instead_of_duplicating() {
        let ctx = Context::create_inmemory();

        execute(usecase("u1", "t1"), &ctx).await.unwrap();

        let mut device_info = DeviceInfo::new();
        device_info.insert("platform".to_string(), "android".to_string());
        let second = RegisterTokenUseCase {
            user_id: "u1".to_string(),
            token: "t1".to_string(),
            device_info,
        };
        let registration = execute(second, &ctx).await.unwrap();
        assert!(!registration.created);

        let records = ctx.repos.push_tokens.find_by_user("u1").await;
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].device_info.get("platform").map(String::as_str),
            Some("android")
        );
    }

    #[actix_web::main]
    #[test]
    async fn re_registration_reactivates_a_retired_token() {
        let ctx = Context::create_inmemory();

        execute(usecase("u1", "t1"), &ctx).await.unwrap();
        assert!(ctx.repos.push_tokens.mark_inactive("t1").await);
        assert!(!ctx.repos.push_tokens.is_active("t1").await);

        let registration = execute(usecase("u1", "t1"), &ctx).await.unwrap();
        assert!(!registration.created);
        assert!(ctx.repos.push_tokens.is_active("t1").await);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_blank_fields_without_writing() {
        let ctx = Context::create_inmemory();

        assert!(matches!(
            execute(usecase("", "t1"), &ctx).await.unwrap_err(),
            UseCaseError::InvalidInput("userId")
        ));
        assert!(matches!(
            execute(usecase("u1", "  "), &ctx).await.unwrap_err(),
            UseCaseError::InvalidInput("token")
        ));
        assert!(ctx.repos.push_tokens.find_by_user("u1").await.is_empty());
    }
}
