use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::Video,
    error::{AppError, Result},
    repository::VideoRepository,
};

#[derive(FromRow)]
struct VideoRow {
    id: String,
    user_id: String,
    topic_id: Option<String>,
    title: String,
    upload_day: NaiveDate,
    uploaded_at: NaiveDateTime,
}

pub struct SqliteVideoRepository {
    pool: SqlitePool,
}

impl SqliteVideoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_video(row: VideoRow) -> Result<Video> {
        Ok(Video {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            user_id: Uuid::parse_str(&row.user_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            topic_id: row
                .topic_id
                .map(|s| Uuid::parse_str(&s).map_err(|e| AppError::Database(e.to_string())))
                .transpose()?,
            title: row.title,
            upload_day: row.upload_day,
            uploaded_at: DateTime::from_naive_utc_and_offset(row.uploaded_at, Utc),
        })
    }
}

#[async_trait]
impl VideoRepository for SqliteVideoRepository {
    async fn exists_for_day(&self, user_id: Uuid, day: NaiveDate) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM videos WHERE user_id = ? AND upload_day = ?",
        )
        .bind(user_id.to_string())
        .bind(day)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn count_distinct_days(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT upload_day)
            FROM videos
            WHERE user_id = ? AND upload_day BETWEEN ? AND ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Video>> {
        let rows = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT id, user_id, topic_id, title, upload_day, uploaded_at
            FROM videos
            WHERE user_id = ?
            ORDER BY uploaded_at DESC
            LIMIT ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_video).collect()
    }
}
