use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayoutDetails;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub can_manage_payments: bool,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub total_videos: i64,
    pub last_upload_date: Option<DateTime<Utc>>,
    /// Reward ids already granted to this user.
    pub rewards: Vec<Uuid>,
    pub payout: Option<PayoutDetails>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Admin,
}

impl User {
    pub fn streak_snapshot(&self) -> StreakSnapshot {
        StreakSnapshot {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            total_videos: self.total_videos,
            last_upload_date: self.last_upload_date,
        }
    }

    pub fn payout_complete(&self) -> bool {
        self.payout.as_ref().map(PayoutDetails::is_complete).unwrap_or(false)
    }
}

/// The slice of the user aggregate the streak tracker reads.
#[derive(Debug, Clone, Copy)]
pub struct StreakSnapshot {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub total_videos: i64,
    pub last_upload_date: Option<DateTime<Utc>>,
}

/// Result of advancing the streak for one qualifying upload. Applied to the
/// user row in the same transaction as the video insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub total_videos: i64,
    pub last_upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}
