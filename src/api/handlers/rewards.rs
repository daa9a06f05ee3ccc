use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{CreateRewardRequest, Reward},
    error::Result,
};

pub async fn list_catalog(State(state): State<AppState>) -> Result<Json<Vec<Reward>>> {
    let rewards = state.service_context.reward_service.list_catalog().await?;
    Ok(Json(rewards))
}

pub async fn list_mine(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<Reward>>> {
    let rewards = state
        .service_context
        .reward_service
        .rewards_for_user(current.user.id)
        .await?;

    Ok(Json(rewards))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateRewardRequest>,
) -> Result<(StatusCode, Json<Reward>)> {
    let reward = state
        .service_context
        .reward_service
        .create_reward(request)
        .await?;

    Ok((StatusCode::CREATED, Json(reward)))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<Reward>> {
    let reward = state
        .service_context
        .reward_service
        .set_active(id, request.is_active)
        .await?;

    Ok(Json(reward))
}
