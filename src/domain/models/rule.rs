use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A standing weekly commitment: every `day_of_week` from `start_time` to `end_time`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct RecurringRule {
    pub id: String,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecurringRule {
    pub fn new(day_of_week: i32, start_time: String, end_time: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            day_of_week,
            start_time,
            end_time,
            created_at: now,
            updated_at: now,
        }
    }
}
