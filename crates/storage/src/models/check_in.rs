use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// The unit a score is kept for: a league week or an event line-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum ScoringPeriod {
    Week(i32),
    LineTime(Uuid),
}

impl ScoringPeriod {
    /// Stable key stored alongside scores and check-ins; the uniqueness
    /// constraints are declared over it.
    pub fn key(&self) -> String {
        match self {
            Self::Week(week) => format!("week:{week}"),
            Self::LineTime(id) => format!("line-time:{id}"),
        }
    }

    pub fn week_number(&self) -> Option<i32> {
        match self {
            Self::Week(week) => Some(*week),
            Self::LineTime(_) => None,
        }
    }

    pub fn line_time_id(&self) -> Option<Uuid> {
        match self {
            Self::Week(_) => None,
            Self::LineTime(id) => Some(*id),
        }
    }
}

impl fmt::Display for ScoringPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CheckIn {
    pub check_in_id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub period_key: String,
    pub week_number: Option<i32>,
    pub line_time_id: Option<Uuid>,
    pub lane_number: Option<i32>,
    pub lane_slot: Option<String>,
    pub checked_in_at: chrono::NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_keys_are_distinct_per_kind() {
        let id = Uuid::from_u128(7);
        assert_eq!(ScoringPeriod::Week(3).key(), "week:3");
        assert_eq!(
            ScoringPeriod::LineTime(id).key(),
            format!("line-time:{id}")
        );
        assert_ne!(ScoringPeriod::Week(3).key(), ScoringPeriod::Week(4).key());
    }

    #[test]
    fn test_period_columns() {
        let id = Uuid::from_u128(7);
        assert_eq!(ScoringPeriod::Week(2).week_number(), Some(2));
        assert_eq!(ScoringPeriod::Week(2).line_time_id(), None);
        assert_eq!(ScoringPeriod::LineTime(id).line_time_id(), Some(id));
    }
}
