use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateUserRequest, PayoutDetails, User, UserRole},
    error::{AppError, Result},
    repository::UserRepository,
};

#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    can_manage_payments: bool,
    current_streak: i64,
    longest_streak: i64,
    total_videos: i64,
    last_upload_date: Option<NaiveDateTime>,
    payout_details: Option<String>,
    is_active: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const USER_COLUMNS: &str = r#"
    id, name, email, password_hash, role, can_manage_payments,
    current_streak, longest_streak, total_videos, last_upload_date,
    payout_details, is_active, created_at, updated_at
"#;

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow, rewards: Vec<Uuid>) -> Result<User> {
        let payout = match row.payout_details {
            Some(json) => Some(
                serde_json::from_str::<PayoutDetails>(&json)
                    .map_err(|e| AppError::Database(format!("Invalid payout details: {}", e)))?,
            ),
            None => None,
        };

        Ok(User {
            id: parse_uuid(&row.id)?,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: parse_role(&row.role)?,
            can_manage_payments: row.can_manage_payments,
            current_streak: row.current_streak,
            longest_streak: row.longest_streak,
            total_videos: row.total_videos,
            last_upload_date: row
                .last_upload_date
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            rewards,
            payout,
            is_active: row.is_active,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    async fn reward_ids_for(&self, user_id: &str) -> Result<Vec<Uuid>> {
        let ids: Vec<(String,)> = sqlx::query_as(
            "SELECT reward_id FROM user_rewards WHERE user_id = ? ORDER BY granted_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        ids.iter().map(|(id,)| parse_uuid(id)).collect()
    }

    async fn hydrate(&self, row: UserRow) -> Result<User> {
        let rewards = self.reward_ids_for(&row.id).await?;
        Self::row_to_user(row, rewards)
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| AppError::Database(e.to_string()))
}

fn parse_role(s: &str) -> Result<UserRole> {
    match s {
        "user" => Ok(UserRole::User),
        "admin" => Ok(UserRole::Admin),
        _ => Err(AppError::Database(format!("Invalid user role: {}", s))),
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, request: CreateUserRequest, password_hash: String) -> Result<User> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO users (
                id, name, email, password_hash, role, can_manage_payments,
                current_streak, longest_streak, total_videos,
                is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, 'user', 0, 0, 0, 0, 1, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(request.email.to_lowercase())
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                AppError::Conflict("Email already exists".to_string())
            }
            _ => AppError::Database(e.to_string()),
        })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created user".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(self.hydrate(r).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(self.hydrate(r).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC LIMIT ? OFFSET ?",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(self.hydrate(row).await?);
        }
        Ok(users)
    }

    async fn update_payout_details(&self, id: Uuid, payout: PayoutDetails) -> Result<User> {
        let json = serde_json::to_string(&payout)
            .map_err(|e| AppError::Internal(format!("Failed to serialize payout details: {}", e)))?;
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            "UPDATE users SET payout_details = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&json)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated user".to_string()))
    }

    async fn list_streak_qualified(&self, min_streak: i64) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE current_streak >= ?
              AND is_active = 1
              AND id NOT IN (
                  SELECT DISTINCT user_id FROM payments
                  WHERE status IN ('pending', 'completed')
                    AND payment_reason = 'streak_reward'
              )
            ORDER BY current_streak DESC
            "#,
            USER_COLUMNS
        ))
        .bind(min_streak)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(self.hydrate(row).await?);
        }
        Ok(users)
    }
}
