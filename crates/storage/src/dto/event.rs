use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{LaneSlot, LineTime};

/// A line-time with configured capacity and current assignments
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineTimeOccupancy {
    #[serde(flatten)]
    pub line_time: LineTime,
    pub lanes: Vec<LaneOccupancy>,
    /// Lane total when lanes are configured, flat capacity otherwise
    pub capacity: u32,
    pub assigned: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LaneOccupancy {
    pub lane_number: i32,
    pub slot: LaneSlot,
    pub capacity: u32,
    pub assigned: u32,
}
