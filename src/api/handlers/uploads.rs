use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Reward, UploadRequest, Video},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub video_id: Uuid,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub total_videos: i64,
    pub new_rewards: Vec<Reward>,
}

/// Called once the media pipeline has validated and stored the video file.
/// Only the qualifying-event metadata reaches this point.
pub async fn upload(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UploadRequest>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    request.validate()?;

    let outcome = state
        .service_context
        .streak_service
        .record_upload(current.user.id, request, Utc::now())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            video_id: outcome.video_id,
            current_streak: outcome.user.current_streak,
            longest_streak: outcome.user.longest_streak,
            total_videos: outcome.user.total_videos,
            new_rewards: outcome.new_rewards,
        }),
    ))
}

pub async fn list_mine(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<Video>>> {
    let videos = state
        .service_context
        .video_repo
        .list_for_user(current.user.id, 50)
        .await?;

    Ok(Json(videos))
}
