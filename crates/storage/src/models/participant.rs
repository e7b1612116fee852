use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Assigned,
    Waitlist,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::Waitlist => "waitlist",
        }
    }
}

impl TryFrom<String> for AssignmentStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "waitlist" => Ok(Self::Waitlist),
            _ => Err(UnknownVariant::new("assignment status", value)),
        }
    }
}

/// An archer registered for one event.
///
/// `assigned_lane_slot` holds the slot letter; it stays `None` for undivided
/// lanes and for line-times without a lane grid.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participant {
    pub participant_id: Uuid,
    pub event_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub division: Option<String>,
    pub preferred_line_time_id: Option<Uuid>,
    pub assigned_line_time_id: Option<Uuid>,
    pub assigned_lane_number: Option<i32>,
    pub assigned_lane_slot: Option<String>,
    #[sqlx(try_from = "String")]
    pub assignment_status: AssignmentStatus,
    pub created_at: chrono::NaiveDateTime,
}

impl Participant {
    pub fn is_assigned(&self) -> bool {
        self.assignment_status == AssignmentStatus::Assigned
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
