use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::UnknownVariant;

/// How an event is run. Only staged events schedule archers onto line-times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    League,
    Open,
    Staged,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::League => "league",
            Self::Open => "open",
            Self::Staged => "staged",
        }
    }

    pub fn uses_line_time_assignment(&self) -> bool {
        matches!(self, Self::Staged)
    }
}

impl TryFrom<String> for EventKind {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "league" => Ok(Self::League),
            "open" => Ok(Self::Open),
            "staged" => Ok(Self::Staged),
            _ => Err(UnknownVariant::new("event kind", value)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub event_id: Uuid,
    pub name: String,
    pub slug: String,
    #[sqlx(try_from = "String")]
    pub kind: EventKind,
    pub arrows_per_end: Option<i32>,
    pub ends_planned: Option<i32>,
    pub max_score: Option<i32>,
    pub x_value: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_staged_events_use_line_time_assignment() {
        assert!(EventKind::Staged.uses_line_time_assignment());
        assert!(!EventKind::League.uses_line_time_assignment());
        assert!(!EventKind::Open.uses_line_time_assignment());
    }

    #[test]
    fn test_kind_round_trips_through_stored_text() {
        for kind in [EventKind::League, EventKind::Open, EventKind::Staged] {
            assert_eq!(EventKind::try_from(kind.as_str().to_string()).unwrap(), kind);
        }
        assert!(EventKind::try_from("indoor".to_string()).is_err());
    }
}
