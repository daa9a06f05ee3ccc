use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{CreateRewardRequest, Reward, RewardKind, StreakUpdate},
    error::Result,
    repository::RewardRepository,
};

/// Minimum distinct upload days inside the trailing 7-day window for the
/// consecutive-weeks kind.
pub const WEEK_WINDOW_MIN_DAYS: i64 = 5;

/// Evaluates the active catalog against the user's post-upload stats and
/// returns the ids of rewards earned just now, in catalog order.
///
/// Entries already in `granted` are skipped, so running this twice on
/// unchanged state returns nothing the second time.
pub fn newly_earned(
    update: &StreakUpdate,
    granted: &[Uuid],
    catalog: &[Reward],
    week_upload_days: i64,
) -> Vec<Uuid> {
    catalog
        .iter()
        .filter(|reward| reward.is_active && !granted.contains(&reward.id))
        .filter(|reward| match reward.kind {
            RewardKind::StreakDays => update.current_streak >= reward.threshold,
            RewardKind::TotalVideos => update.total_videos >= reward.threshold,
            RewardKind::ConsecutiveWeeks => week_upload_days >= WEEK_WINDOW_MIN_DAYS,
        })
        .map(|reward| reward.id)
        .collect()
}

pub struct RewardService {
    rewards: Arc<dyn RewardRepository>,
}

impl RewardService {
    pub fn new(rewards: Arc<dyn RewardRepository>) -> Self {
        Self { rewards }
    }

    pub async fn create_reward(&self, request: CreateRewardRequest) -> Result<Reward> {
        request.validate()?;
        self.rewards.create(request).await
    }

    pub async fn list_catalog(&self) -> Result<Vec<Reward>> {
        self.rewards.list().await
    }

    pub async fn rewards_for_user(&self, user_id: Uuid) -> Result<Vec<Reward>> {
        self.rewards.list_for_user(user_id).await
    }

    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Reward> {
        self.rewards.set_active(id, is_active).await
    }
}
