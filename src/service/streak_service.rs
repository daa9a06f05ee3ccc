use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    domain::{NewVideo, Reward, StreakSnapshot, StreakUpdate, UploadRequest, User},
    error::{AppError, Result},
    repository::{RewardRepository, TopicRepository, UploadLedger, UserRepository, VideoRepository},
    service::reward_service,
};

/// Advance the streak counters for one qualifying upload.
///
/// Day difference is floor((event - last) / 1 day): exactly one day continues
/// the streak, more than one breaks it, and a same-day (or out-of-order)
/// event leaves the counter alone while still counting the video. The caller
/// enforces the one-upload-per-day rule; this stays idempotent for the streak
/// either way.
pub fn advance_streak(snapshot: &StreakSnapshot, at: DateTime<Utc>) -> StreakUpdate {
    let current_streak = match snapshot.last_upload_date {
        None => 1,
        Some(last) => {
            let days_diff = (at - last).num_days();
            if days_diff == 1 {
                snapshot.current_streak + 1
            } else if days_diff > 1 {
                1
            } else {
                snapshot.current_streak
            }
        }
    };

    StreakUpdate {
        current_streak,
        longest_streak: snapshot.longest_streak.max(current_streak),
        total_videos: snapshot.total_videos + 1,
        last_upload_date: at,
    }
}

/// Outcome of recording a qualifying upload.
#[derive(Debug)]
pub struct UploadOutcome {
    pub video_id: Uuid,
    pub user: User,
    pub new_rewards: Vec<Reward>,
}

pub struct StreakService {
    users: Arc<dyn UserRepository>,
    videos: Arc<dyn VideoRepository>,
    rewards: Arc<dyn RewardRepository>,
    topics: Arc<dyn TopicRepository>,
    ledger: Arc<dyn UploadLedger>,
}

impl StreakService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        videos: Arc<dyn VideoRepository>,
        rewards: Arc<dyn RewardRepository>,
        topics: Arc<dyn TopicRepository>,
        ledger: Arc<dyn UploadLedger>,
    ) -> Self {
        Self { users, videos, rewards, topics, ledger }
    }

    /// Records one qualifying upload for the user at `at`: advances the
    /// streak, evaluates the reward catalog against the updated stats, and
    /// commits everything in a single transaction.
    pub async fn record_upload(
        &self,
        user_id: Uuid,
        request: UploadRequest,
        at: DateTime<Utc>,
    ) -> Result<UploadOutcome> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(topic_id) = request.topic_id {
            self.topics
                .find_by_id(topic_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Topic not found".to_string()))?;
        }

        let day = at.date_naive();
        if self.videos.exists_for_day(user_id, day).await? {
            return Err(AppError::Conflict(
                "You have already uploaded a video today".to_string(),
            ));
        }

        let update = advance_streak(&user.streak_snapshot(), at);

        // Trailing 7-day window ending at this event; today's upload has not
        // been inserted yet, so it is counted separately.
        let prior_days = self
            .videos
            .count_distinct_days(user_id, day - Duration::days(6), day - Duration::days(1))
            .await?;
        let week_upload_days = prior_days + 1;

        let catalog = self.rewards.list_active().await?;
        let earned_ids =
            reward_service::newly_earned(&update, &user.rewards, &catalog, week_upload_days);

        let video = NewVideo {
            id: Uuid::new_v4(),
            user_id,
            topic_id: request.topic_id,
            title: request.title,
            upload_day: day,
            uploaded_at: at,
        };
        let video_id = video.id;

        let user = self
            .ledger
            .commit_upload(video, user.total_videos, update, &earned_ids)
            .await?;

        let new_rewards = catalog
            .into_iter()
            .filter(|r| earned_ids.contains(&r.id))
            .collect();

        tracing::info!(
            user_id = %user_id,
            current_streak = user.current_streak,
            "Recorded qualifying upload"
        );

        Ok(UploadOutcome { video_id, user, new_rewards })
    }
}
