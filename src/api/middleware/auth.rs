use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    api::state::AppState,
    domain::{User, UserRole},
    error::AppError,
};

#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
}

// Owned token so nothing borrowed from the request body crosses an await.
fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
        .ok_or(AppError::Unauthorized)
}

async fn authenticate(state: &AppState, token: &str) -> Result<User, AppError> {
    let claims = state.service_context.auth_service.verify_token(token)?;

    let user = state
        .service_context
        .user_repo
        .find_by_id(claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !user.is_active {
        return Err(AppError::Forbidden);
    }

    Ok(user)
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let user = authenticate(&state, &token).await?;
    request.extensions_mut().insert(CurrentUser { user });
    Ok(next.run(request).await)
}

/// Gates payment creation and status updates: admins holding the
/// manage-payments permission only.
pub async fn require_payment_manager(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let user = authenticate(&state, &token).await?;

    if user.role != UserRole::Admin || !user.can_manage_payments {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentUser { user });
    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let user = authenticate(&state, &token).await?;

    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentUser { user });
    Ok(next.run(request).await)
}
