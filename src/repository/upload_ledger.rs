use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    domain::{NewVideo, StreakUpdate, User},
    error::{AppError, Result},
    repository::{SqliteUserRepository, UploadLedger, UserRepository},
};

/// Commits a qualifying upload as a single SQLite transaction. The video
/// insert, the streak counter update, any reward grants and the topic usage
/// bump either all land or none do.
pub struct SqliteUploadLedger {
    pool: SqlitePool,
}

impl SqliteUploadLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UploadLedger for SqliteUploadLedger {
    async fn commit_upload(
        &self,
        video: NewVideo,
        expected_total_videos: i64,
        update: StreakUpdate,
        new_rewards: &[Uuid],
    ) -> Result<User> {
        let now = Utc::now().naive_utc();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO videos (id, user_id, topic_id, title, upload_day, uploaded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(video.id.to_string())
        .bind(video.user_id.to_string())
        .bind(video.topic_id.map(|id| id.to_string()))
        .bind(&video.title)
        .bind(video.upload_day)
        .bind(video.uploaded_at.naive_utc())
        .execute(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            // idx_videos_user_day: a second upload landed on the same
            // calendar day, including a replay of this one.
            Some(db) if db.is_unique_violation() => {
                AppError::Conflict("You have already uploaded a video today".to_string())
            }
            _ => AppError::Database(e.to_string()),
        })?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET current_streak = ?,
                longest_streak = ?,
                total_videos = ?,
                last_upload_date = ?,
                updated_at = ?
            WHERE id = ? AND total_videos = ?
            "#,
        )
        .bind(update.current_streak)
        .bind(update.longest_streak)
        .bind(update.total_videos)
        .bind(update.last_upload_date.naive_utc())
        .bind(now)
        .bind(video.user_id.to_string())
        .bind(expected_total_videos)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            // The version guard failed: another upload for this user committed
            // between our read and this write. Rolling back keeps the video
            // row out too.
            tx.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::Conflict(
                "Upload conflicts with a concurrent upload for this user".to_string(),
            ));
        }

        for reward_id in new_rewards {
            sqlx::query(
                "INSERT INTO user_rewards (user_id, reward_id, granted_at) VALUES (?, ?, ?)",
            )
            .bind(video.user_id.to_string())
            .bind(reward_id.to_string())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        if let Some(topic_id) = video.topic_id {
            sqlx::query(
                "UPDATE topics SET usage_count = usage_count + 1, updated_at = ? WHERE id = ?",
            )
            .bind(now)
            .bind(topic_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let users = SqliteUserRepository::new(self.pool.clone());
        users
            .find_by_id(video.user_id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated user".to_string()))
    }
}
