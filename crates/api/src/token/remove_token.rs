use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use pushbridge_api_structs::remove_token::*;
use pushbridge_infra::Context;

pub async fn remove_token_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    let body = body.0;
    let usecase = RemoveTokenUseCase {
        user_id: body.user_id,
        token: body.token,
    };

    execute(usecase, &ctx)
        .await
        .map(|removed| {
            HttpResponse::Ok().json(APIResponse {
                success: true,
                removed,
            })
        })
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct RemoveTokenUseCase {
    pub user_id: String,
    pub token: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidInput(&'static str),
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidInput(field) => {
                Self::BadClientData(format!("A non-empty `{}` field is required", field))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RemoveTokenUseCase {
    /// True when a record was actually deleted
    type Response = bool;

    type Error = UseCaseError;

    const NAME: &'static str = "RemoveToken";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.user_id.trim().is_empty() {
            return Err(UseCaseError::InvalidInput("userId"));
        }
        if self.token.trim().is_empty() {
            return Err(UseCaseError::InvalidInput("token"));
        }

        // Removal is idempotent, deleting an absent pair is not an error
        let deleted = ctx.repos.push_tokens.delete(&self.user_id, &self.token).await;
        Ok(deleted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushbridge_domain::{DeviceInfo, PushToken};

    #[actix_web::main]
    #[test]
    async fn removes_a_registered_token() {
        let ctx = Context::create_inmemory();
        ctx.repos
            .push_tokens
            .insert(&PushToken::new("u1", "t1", DeviceInfo::new(), 0))
            .await
            .unwrap();

        let usecase = RemoveTokenUseCase {
            user_id: "u1".to_string(),
            token: "t1".to_string(),
        };
        assert!(execute(usecase, &ctx).await.unwrap());
        assert!(ctx.repos.push_tokens.find("u1", "t1").await.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn removing_an_unknown_pair_is_a_noop() {
        let ctx = Context::create_inmemory();

        let usecase = RemoveTokenUseCase {
            user_id: "u1".to_string(),
            token: "missing".to_string(),
        };
        assert!(!execute(usecase, &ctx).await.unwrap());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_blank_fields() {
        let ctx = Context::create_inmemory();

        let usecase = RemoveTokenUseCase {
            user_id: "u1".to_string(),
            token: String::new(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await.unwrap_err(),
            UseCaseError::InvalidInput("token")
        ));
    }
}
