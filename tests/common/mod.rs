#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use dailyreel::{
    auth::AuthService,
    domain::{CreateUserRequest, PayoutDetails, User},
    repository::{
        SqlitePaymentRepository, SqliteRewardRepository, SqliteTopicRepository,
        SqliteUploadLedger, SqliteUserRepository, SqliteVideoRepository, UserRepository,
    },
    service::ServiceContext,
};

/// In-memory database with a single connection so every query sees the same
/// data, plus a fully wired service context.
pub async fn test_context() -> anyhow::Result<(SqlitePool, Arc<ServiceContext>)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let auth_service = Arc::new(AuthService::new("test-secret", 24));
    let ctx = Arc::new(ServiceContext::new(
        Arc::new(SqliteUserRepository::new(pool.clone())),
        Arc::new(SqliteRewardRepository::new(pool.clone())),
        Arc::new(SqlitePaymentRepository::new(pool.clone())),
        Arc::new(SqliteVideoRepository::new(pool.clone())),
        Arc::new(SqliteTopicRepository::new(pool.clone())),
        Arc::new(SqliteUploadLedger::new(pool.clone())),
        auth_service,
        pool.clone(),
    ));

    Ok((pool, ctx))
}

pub async fn create_user(ctx: &ServiceContext, name: &str, email: &str) -> anyhow::Result<User> {
    let password_hash = AuthService::hash_password("password123").await?;
    let user = ctx
        .user_repo
        .create(
            CreateUserRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: "password123".to_string(),
            },
            password_hash,
        )
        .await?;
    Ok(user)
}

/// Sets the streak counters directly; used to put a user into a known state
/// without replaying uploads.
pub async fn set_streak(
    pool: &SqlitePool,
    user_id: Uuid,
    current: i64,
    longest: i64,
    total: i64,
    last_upload: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET current_streak = ?, longest_streak = ?, total_videos = ?, last_upload_date = ?
        WHERE id = ?
        "#,
    )
    .bind(current)
    .bind(longest)
    .bind(total)
    .bind(last_upload.map(|dt| dt.naive_utc()))
    .bind(user_id.to_string())
    .execute(pool)
    .await?;
    Ok(())
}

pub fn upi_payout() -> PayoutDetails {
    PayoutDetails::Upi {
        upi_id: "alice@upi".to_string(),
        upi_name: "Alice".to_string(),
    }
}
