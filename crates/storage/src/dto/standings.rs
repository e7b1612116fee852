use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One participant's cumulative line in the event standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StandingEntry {
    pub rank: u32,
    pub participant_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub division: Option<String>,
    /// Scoring periods (league weeks or line-times) with a score on record
    pub periods_shot: u32,
    pub total_score: i64,
    pub x_count: i64,
    pub best_period_score: i32,
    pub average_score: Decimal,
}
