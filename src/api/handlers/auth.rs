use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    auth::AuthService,
    domain::CreateUserRequest,
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub name: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    request.validate()?;

    let ctx = &state.service_context;
    if ctx.user_repo.find_by_email(&request.email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = AuthService::hash_password(&request.password).await?;
    let user = ctx.user_repo.create(request, password_hash).await?;
    let token = ctx.auth_service.issue_token(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user_id: user.id,
            name: user.name,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let ctx = &state.service_context;
    let user = ctx
        .user_repo
        .find_by_email(&request.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !AuthService::verify_password(&request.password, &user.password_hash).await? {
        return Err(AppError::Unauthorized);
    }

    let token = ctx.auth_service.issue_token(&user)?;

    Ok(Json(AuthResponse {
        token,
        user_id: user.id,
        name: user.name,
    }))
}
