use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::{CreateTopicRequest, Topic},
    error::Result,
};

pub async fn list_active(State(state): State<AppState>) -> Result<Json<Vec<Topic>>> {
    let topics = state.service_context.topic_repo.list_active().await?;
    Ok(Json(topics))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<Topic>)> {
    request.validate()?;
    let topic = state.service_context.topic_repo.create(request).await?;
    Ok((StatusCode::CREATED, Json(topic)))
}
