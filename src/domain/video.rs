use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One qualifying upload. The file itself lives with the media pipeline;
/// only the metadata the streak and reward logic needs is kept here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic_id: Option<Uuid>,
    pub title: String,
    pub upload_day: NaiveDate,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVideo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic_id: Option<Uuid>,
    pub title: String,
    pub upload_day: NaiveDate,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct UploadRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub topic_id: Option<Uuid>,
}
