//! Participant selection and greedy slot allocation.
//!
//! Everything here is pure: the assignment writer loads rows, hands them to
//! [`plan_assignments`], and persists the resulting plan.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::dto::assignment::AssignmentSummary;
use crate::models::Participant;
use crate::services::capacity::{CapacityModel, LanePosition, held_seat};

/// Participants split into those to place this run and those left as they are.
#[derive(Debug)]
pub struct Selection<'a> {
    pub to_place: Vec<&'a Participant>,
    pub skipped: Vec<&'a Participant>,
}

/// Orders participants by `(created_at, participant_id)` and, unless
/// `reset_existing` is set, skips anyone already assigned.
pub fn select_participants(participants: &[Participant], reset_existing: bool) -> Selection<'_> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });

    let (skipped, to_place): (Vec<&Participant>, Vec<&Participant>) = ordered
        .into_iter()
        .partition(|p| !reset_existing && p.is_assigned());

    Selection { to_place, skipped }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Seated on a line-time; `seat` is `None` when the line-time has no lane grid.
    Assigned {
        line_time_id: Uuid,
        seat: Option<LanePosition>,
    },
    Waitlisted,
}

impl Placement {
    pub fn line_time_id(&self) -> Option<Uuid> {
        match self {
            Self::Assigned { line_time_id, .. } => Some(*line_time_id),
            Self::Waitlisted => None,
        }
    }

    pub fn is_line_time_only(&self) -> bool {
        matches!(self, Self::Assigned { seat: None, .. })
    }
}

/// Places one participant, consuming capacity from `model`.
pub fn allocate(model: &mut CapacityModel, preferred_line_time_id: Option<Uuid>) -> Placement {
    let Some(line_time_id) = model.pick_line_time(preferred_line_time_id) else {
        return Placement::Waitlisted;
    };

    let seat = if model.has_lane_grid(line_time_id) {
        model.take_seat(line_time_id)
    } else {
        None
    };
    model.consume(line_time_id);

    Placement::Assigned { line_time_id, seat }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAssignment {
    pub participant_id: Uuid,
    pub placement: Placement,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentPlan {
    pub placements: Vec<PlannedAssignment>,
    pub skipped: u32,
}

impl AssignmentPlan {
    pub fn assigned(&self) -> u32 {
        self.placements
            .iter()
            .filter(|p| matches!(p.placement, Placement::Assigned { .. }))
            .count() as u32
    }

    pub fn waitlisted(&self) -> u32 {
        self.placements
            .iter()
            .filter(|p| p.placement == Placement::Waitlisted)
            .count() as u32
    }

    pub fn summary(&self) -> AssignmentSummary {
        AssignmentSummary {
            assigned: self.assigned(),
            waitlisted: self.waitlisted(),
            skipped: self.skipped,
            reason: None,
        }
    }
}

/// Runs selection and allocation for one event.
///
/// Skipped participants keep their seats, and those seats are reserved in
/// `model` before anyone new is placed.
pub fn plan_assignments(
    model: &mut CapacityModel,
    participants: &[Participant],
    reset_existing: bool,
) -> AssignmentPlan {
    let selection = select_participants(participants, reset_existing);

    for held in &selection.skipped {
        if let Some(line_time_id) = held.assigned_line_time_id {
            model.reserve(line_time_id, held_seat(held));
        }
    }

    let placements = selection
        .to_place
        .iter()
        .map(|participant| {
            let placement = allocate(model, participant.preferred_line_time_id);
            match placement {
                Placement::Assigned { line_time_id, seat } => debug!(
                    participant_id = %participant.participant_id,
                    %line_time_id,
                    lane = ?seat.map(|s| s.lane_number),
                    slot = ?seat.map(|s| s.slot),
                    "participant placed"
                ),
                Placement::Waitlisted => warn!(
                    participant_id = %participant.participant_id,
                    "no line-time capacity left, participant waitlisted"
                ),
            }

            PlannedAssignment {
                participant_id: participant.participant_id,
                placement,
            }
        })
        .collect();

    AssignmentPlan {
        placements,
        skipped: selection.skipped.len() as u32,
    }
}
