use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod payment_repository;
pub mod reward_repository;
pub mod topic_repository;
pub mod upload_ledger;
pub mod user_repository;
pub mod video_repository;

pub use payment_repository::SqlitePaymentRepository;
pub use reward_repository::SqliteRewardRepository;
pub use topic_repository::SqliteTopicRepository;
pub use upload_ledger::SqliteUploadLedger;
pub use user_repository::SqliteUserRepository;
pub use video_repository::SqliteVideoRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, request: CreateUserRequest, password_hash: String) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>>;
    async fn update_payout_details(&self, id: Uuid, payout: PayoutDetails) -> Result<User>;
    /// Users at or above the streak threshold who do not already hold an
    /// active streak-reward payment (set difference in SQL).
    async fn list_streak_qualified(&self, min_streak: i64) -> Result<Vec<User>>;
}

#[async_trait]
pub trait RewardRepository: Send + Sync {
    async fn create(&self, request: CreateRewardRequest) -> Result<Reward>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reward>>;
    async fn list(&self) -> Result<Vec<Reward>>;
    async fn list_active(&self) -> Result<Vec<Reward>>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Reward>>;
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Reward>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Inserts a new payment. A partial unique index guards the
    /// one-active-streak-reward-payment-per-user invariant; a violation
    /// surfaces as `Conflict`.
    async fn create(&self, payment: Payment) -> Result<Payment>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>>;
    async fn find_active_streak_reward(&self, user_id: Uuid) -> Result<Option<Payment>>;
    async fn list(
        &self,
        status: Option<PaymentStatus>,
        user_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>>;
    /// Writes status, notes and processing stamps. Only a row still in
    /// `pending` is updated; a settled row yields `InvalidTransition` no
    /// matter how stale the caller's copy is.
    async fn update(&self, id: Uuid, payment: Payment) -> Result<Payment>;
    async fn stats(&self, now: DateTime<Utc>) -> Result<PaymentStats>;
}

#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn exists_for_day(&self, user_id: Uuid, day: NaiveDate) -> Result<bool>;
    /// Distinct calendar days with an upload in [from, to], inclusive.
    async fn count_distinct_days(&self, user_id: Uuid, from: NaiveDate, to: NaiveDate)
        -> Result<i64>;
    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Video>>;
}

#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn create(&self, request: CreateTopicRequest) -> Result<Topic>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Topic>>;
    async fn list_active(&self) -> Result<Vec<Topic>>;
}

/// The one write path for a qualifying upload: video row, streak counters,
/// reward grants and topic usage move together or not at all.
#[async_trait]
pub trait UploadLedger: Send + Sync {
    /// `expected_total_videos` is the version guard: the user row is only
    /// updated if its total_videos still matches, so two concurrent uploads
    /// cannot both take credit.
    async fn commit_upload(
        &self,
        video: NewVideo,
        expected_total_videos: i64,
        update: StreakUpdate,
        new_rewards: &[Uuid],
    ) -> Result<User>;
}
