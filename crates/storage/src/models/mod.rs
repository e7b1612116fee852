mod check_in;
mod event;
mod line_time;
mod normalized_name;
mod participant;
mod score;

pub use check_in::{CheckIn, ScoringPeriod};
pub use event::{Event, EventKind};
pub use line_time::{LaneMap, LaneSlot, LineTime, LineTimeWithLanes};
pub use normalized_name::NormalizedArcherName;
pub use participant::{AssignmentStatus, Participant};
pub use score::{End, Score};

/// A stored text value that does not name any variant of the target enum.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: String) -> Self {
        Self { kind, value }
    }
}
