use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateTopicRequest, Topic},
    error::{AppError, Result},
    repository::TopicRepository,
};

#[derive(FromRow)]
struct TopicRow {
    id: String,
    title: String,
    description: String,
    is_active: bool,
    usage_count: i64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteTopicRepository {
    pool: SqlitePool,
}

impl SqliteTopicRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_topic(row: TopicRow) -> Result<Topic> {
        Ok(Topic {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            description: row.description,
            is_active: row.is_active,
            usage_count: row.usage_count,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl TopicRepository for SqliteTopicRepository {
    async fn create(&self, request: CreateTopicRequest) -> Result<Topic> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO topics (id, title, description, is_active, usage_count, created_at, updated_at)
            VALUES (?, ?, ?, 1, 0, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&request.title)
        .bind(&request.description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created topic".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Topic>> {
        let row = sqlx::query_as::<_, TopicRow>(
            r#"
            SELECT id, title, description, is_active, usage_count, created_at, updated_at
            FROM topics
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_topic(r)?)),
            None => Ok(None),
        }
    }

    async fn list_active(&self) -> Result<Vec<Topic>> {
        let rows = sqlx::query_as::<_, TopicRow>(
            r#"
            SELECT id, title, description, is_active, usage_count, created_at, updated_at
            FROM topics
            WHERE is_active = 1
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_topic).collect()
    }
}
