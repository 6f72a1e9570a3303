use actix_web::{HttpResponse, Result, web};

use crate::AppState;
use crate::database::models::{LoginInput, UserInfo};
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    let response = state.auth_service.login(request.into_inner()).await?;

    Ok(ApiResponse::ok(response))
}

pub async fn me(state: web::Data<AppState>, claims: Claims) -> Result<HttpResponse> {
    let user = state.auth_service.current_user(&claims).await?;

    Ok(ApiResponse::ok(UserInfo::from(user)))
}
