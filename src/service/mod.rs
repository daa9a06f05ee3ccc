pub mod payment_service;
pub mod reward_service;
pub mod streak_service;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::AuthService;
use crate::repository::*;

pub use payment_service::{EligibleUser, PaymentService};
pub use reward_service::RewardService;
pub use streak_service::{StreakService, UploadOutcome};

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub reward_repo: Arc<dyn RewardRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub video_repo: Arc<dyn VideoRepository>,
    pub topic_repo: Arc<dyn TopicRepository>,
    pub streak_service: Arc<StreakService>,
    pub reward_service: Arc<RewardService>,
    pub payment_service: Arc<PaymentService>,
    pub auth_service: Arc<AuthService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        reward_repo: Arc<dyn RewardRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        video_repo: Arc<dyn VideoRepository>,
        topic_repo: Arc<dyn TopicRepository>,
        upload_ledger: Arc<dyn UploadLedger>,
        auth_service: Arc<AuthService>,
        db_pool: SqlitePool,
    ) -> Self {
        let streak_service = Arc::new(StreakService::new(
            user_repo.clone(),
            video_repo.clone(),
            reward_repo.clone(),
            topic_repo.clone(),
            upload_ledger,
        ));
        let reward_service = Arc::new(RewardService::new(reward_repo.clone()));
        let payment_service = Arc::new(PaymentService::new(
            user_repo.clone(),
            payment_repo.clone(),
        ));

        Self {
            user_repo,
            reward_repo,
            payment_repo,
            video_repo,
            topic_repo,
            streak_service,
            reward_service,
            payment_service,
            auth_service,
            db_pool,
        }
    }
}
