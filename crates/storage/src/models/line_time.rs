use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::UnknownVariant;

/// Sub-position within a lane. `Single` marks a lane that is not subdivided.
///
/// Ordering follows the stored key order (`A` < `B` < `C` < `D` < `single`),
/// which is the order the allocator walks slots in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum LaneSlot {
    A,
    B,
    C,
    D,
    #[serde(rename = "single")]
    Single,
}

impl LaneSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::Single => "single",
        }
    }

    /// The letter stored on a participant, `None` for an undivided lane.
    pub fn letter(&self) -> Option<&'static str> {
        match self {
            Self::Single => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for LaneSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for LaneSlot {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            "D" | "d" => Ok(Self::D),
            "single" | "" => Ok(Self::Single),
            _ => Err(UnknownVariant::new("lane slot", value)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LineTime {
    pub line_time_id: Uuid,
    pub event_id: Uuid,
    pub label: String,
    pub starts_at: chrono::NaiveDateTime,
    pub capacity: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LaneMap {
    pub lane_map_id: Uuid,
    pub line_time_id: Uuid,
    pub lane_number: i32,
    #[sqlx(try_from = "String")]
    pub slot: LaneSlot,
    pub capacity: i32,
}

/// A line-time with its lane maps loaded alongside it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineTimeWithLanes {
    #[serde(flatten)]
    pub line_time: LineTime,
    pub lanes: Vec<LaneMap>,
}
