use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateRewardRequest, Reward, RewardKind},
    error::{AppError, Result},
    repository::RewardRepository,
};

#[derive(FromRow)]
struct RewardRow {
    id: String,
    name: String,
    description: String,
    kind: String,
    threshold: i64,
    icon: String,
    points: i64,
    is_active: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const REWARD_COLUMNS: &str =
    "id, name, description, kind, threshold, icon, points, is_active, created_at, updated_at";

pub struct SqliteRewardRepository {
    pool: SqlitePool,
}

impl SqliteRewardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_reward(row: RewardRow) -> Result<Reward> {
        Ok(Reward {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            description: row.description,
            kind: Self::parse_kind(&row.kind)?,
            threshold: row.threshold,
            icon: row.icon,
            points: row.points,
            is_active: row.is_active,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_kind(s: &str) -> Result<RewardKind> {
        match s {
            "streak_days" => Ok(RewardKind::StreakDays),
            "total_videos" => Ok(RewardKind::TotalVideos),
            "consecutive_weeks" => Ok(RewardKind::ConsecutiveWeeks),
            _ => Err(AppError::Database(format!("Invalid reward kind: {}", s))),
        }
    }

    fn kind_to_str(kind: RewardKind) -> &'static str {
        match kind {
            RewardKind::StreakDays => "streak_days",
            RewardKind::TotalVideos => "total_videos",
            RewardKind::ConsecutiveWeeks => "consecutive_weeks",
        }
    }
}

#[async_trait]
impl RewardRepository for SqliteRewardRepository {
    async fn create(&self, request: CreateRewardRequest) -> Result<Reward> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO rewards (
                id, name, description, kind, threshold, icon, points,
                is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.description)
        .bind(Self::kind_to_str(request.kind))
        .bind(request.threshold)
        .bind(&request.icon)
        .bind(request.points)
        .bind(request.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                AppError::Conflict("Reward name already exists".to_string())
            }
            _ => AppError::Database(e.to_string()),
        })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created reward".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reward>> {
        let row = sqlx::query_as::<_, RewardRow>(&format!(
            "SELECT {} FROM rewards WHERE id = ?",
            REWARD_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_reward(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Reward>> {
        let rows = sqlx::query_as::<_, RewardRow>(&format!(
            "SELECT {} FROM rewards ORDER BY created_at",
            REWARD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_reward).collect()
    }

    async fn list_active(&self) -> Result<Vec<Reward>> {
        let rows = sqlx::query_as::<_, RewardRow>(&format!(
            "SELECT {} FROM rewards WHERE is_active = 1 ORDER BY created_at",
            REWARD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_reward).collect()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Reward>> {
        let rows = sqlx::query_as::<_, RewardRow>(
            r#"
            SELECT r.id, r.name, r.description, r.kind, r.threshold, r.icon,
                   r.points, r.is_active, r.created_at, r.updated_at
            FROM rewards r
            JOIN user_rewards ur ON ur.reward_id = r.id
            WHERE ur.user_id = ?
            ORDER BY ur.granted_at
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_reward).collect()
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Reward> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query("UPDATE rewards SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(is_active)
            .bind(now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Reward not found".to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated reward".to_string()))
    }
}
