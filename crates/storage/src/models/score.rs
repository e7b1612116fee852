use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One participant's score for one scoring period.
///
/// `total_score` and `x_count` are derived from the score's ends and are only
/// ever written by the rollup in `services::scoring`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Score {
    pub score_id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub period_key: String,
    pub week_number: Option<i32>,
    pub line_time_id: Option<Uuid>,
    pub arrows_per_end: i32,
    pub ends_planned: i32,
    pub max_score: i32,
    pub x_value: i32,
    pub total_score: i32,
    pub x_count: i32,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Score {
    /// Highest value a single arrow may carry.
    pub fn arrow_ceiling(&self) -> i32 {
        self.max_score.max(self.x_value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct End {
    pub end_id: Uuid,
    pub score_id: Uuid,
    pub end_number: i32,
    pub arrows: Vec<Option<i32>>,
    pub end_score: i32,
    pub x_count: i32,
    pub updated_at: chrono::NaiveDateTime,
}
