use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CheckIn, Score};

/// Request payload for checking a participant in for a scoring period.
/// Exactly one of `week_number` and `line_time_id` must be set.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CheckInRequest {
    pub participant_id: Uuid,

    #[validate(range(min = 1, max = 53, message = "Week number must be between 1 and 53"))]
    pub week_number: Option<i32>,

    pub line_time_id: Option<Uuid>,

    #[validate(range(min = 1, message = "Lane number must be positive"))]
    pub lane_number: Option<i32>,

    #[validate(custom(function = "validate_lane_slot"))]
    pub lane_slot: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInResponse {
    pub check_in: CheckIn,
    pub score: Score,
}

fn validate_lane_slot(slot: &str) -> Result<(), validator::ValidationError> {
    const VALID_SLOTS: &[&str] = &["A", "B", "C", "D"];

    if VALID_SLOTS.contains(&slot) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_lane_slot"))
    }
}
