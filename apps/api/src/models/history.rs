use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::text_enum;

/// Sets younger than this are served again instead of asking the backend.
pub const FRESH_FOR_HOURS: i64 = 24;

/// Sets kept per user; older ones are pruned on insert.
pub const HISTORY_LIMIT: i64 = 50;

text_enum! {
    RecommendationKind {
        Course => "course",
        Career => "career",
        Skill => "skill",
    }
}

/// One generated set of recommendations for a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: RecommendationKind,
    pub recommendations: Json<Vec<Value>>,
    pub created_at: DateTime<Utc>,
}

impl RecommendationRecord {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at < Duration::hours(FRESH_FOR_HOURS)
    }
}
