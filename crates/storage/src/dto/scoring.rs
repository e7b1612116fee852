use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{End, Score};

/// Arrow values for one end. `null` marks an arrow not yet entered.
///
/// Arrays longer than the score's end size are truncated when applied; the
/// length cap only bounds the request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ApplyScoresRequest {
    #[validate(length(max = 1024, message = "At most 1024 arrow values per request"))]
    pub arrows: Vec<Option<i32>>,
}

/// A score with all of its ends, in end order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreCard {
    pub score: Score,
    pub ends: Vec<End>,
}

/// The end that was written and the score after its rollup
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EndScored {
    pub end: End,
    pub score: Score,
}
