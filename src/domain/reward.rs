use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry for an earnable badge. Created and edited by admins only;
/// the engine never invents entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub kind: RewardKind,
    pub threshold: i64,
    pub icon: String,
    pub points: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    StreakDays,
    TotalVideos,
    ConsecutiveWeeks,
}

#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct CreateRewardRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub kind: RewardKind,
    #[validate(range(min = 1))]
    pub threshold: i64,
    pub icon: String,
    #[serde(default = "default_points")]
    pub points: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_points() -> i64 {
    10
}

fn default_true() -> bool {
    true
}
