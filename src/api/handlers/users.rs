use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{PayoutDetails, PayoutDisplayInfo, User},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub total_videos: i64,
    pub last_upload_date: Option<String>,
    pub rewards: Vec<Uuid>,
    pub payout_complete: bool,
    pub payout_display: Option<PayoutDisplayInfo>,
}

impl From<User> for ProfileDto {
    fn from(user: User) -> Self {
        let payout_display = user.payout.as_ref().map(|p| p.display_info());
        let payout_complete = user.payout_complete();
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            current_streak: user.current_streak,
            longest_streak: user.longest_streak,
            total_videos: user.total_videos,
            last_upload_date: user.last_upload_date.map(|dt| dt.to_rfc3339()),
            rewards: user.rewards,
            payout_complete,
            payout_display,
        }
    }
}

pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<ProfileDto> {
    Json(current.user.into())
}

pub async fn update_payout_details(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payout): Json<PayoutDetails>,
) -> Result<Json<ProfileDto>> {
    let user = state
        .service_context
        .user_repo
        .update_payout_details(current.user.id, payout)
        .await?;

    Ok(Json(user.into()))
}
