use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use pushbridge_api_structs::dtos::PushTokenDTO;
use pushbridge_api_structs::get_user_tokens::*;
use pushbridge_domain::PushToken;
use pushbridge_infra::Context;

pub async fn get_user_tokens_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, ApiError> {
    let usecase = GetUserTokensUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|tokens| {
            HttpResponse::Ok().json(APIResponse {
                user_id: path_params.user_id.clone(),
                tokens: tokens.into_iter().map(PushTokenDTO::new).collect(),
            })
        })
        .map_err(ApiError::from)
}

#[derive(Debug)]
pub struct GetUserTokensUseCase {
    pub user_id: String,
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
impl UseCase for GetUserTokensUseCase {
    type Response = Vec<PushToken>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetUserTokens";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.user_id.trim().is_empty() {
            return Err(UseCaseError::InvalidInput("userId"));
        }
        Ok(ctx.repos.push_tokens.find_by_user(&self.user_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushbridge_domain::{DeviceInfo, PushToken};

    #[actix_web::main]
    #[test]
    async fn lists_active_and_inactive_records() {
        let ctx = Context::create_inmemory();
        ctx.repos
            .push_tokens
            .insert(&PushToken::new("u1", "t1", DeviceInfo::new(), 0))
            .await
            .unwrap();
        ctx.repos
            .push_tokens
            .insert(&PushToken::new("u1", "t2", DeviceInfo::new(), 0))
            .await
            .unwrap();
        ctx.repos.push_tokens.mark_inactive("t2").await;

        let usecase = GetUserTokensUseCase {
            user_id: "u1".to_string(),
        };
        let tokens = execute(usecase, &ctx).await.unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().any(|t| !t.is_active));
    }

    #[actix_web::main]
    #[test]
    async fn unknown_user_gets_an_empty_list() {
        let ctx = Context::create_inmemory();

        let usecase = GetUserTokensUseCase {
            user_id: "nobody".to_string(),
        };
        assert!(execute(usecase, &ctx).await.unwrap().is_empty());
    }
}
