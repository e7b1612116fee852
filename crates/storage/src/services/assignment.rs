use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::assignment::AssignmentSummary;
use crate::error::Result;
use crate::models::Event;
use crate::repository::event::EventRepository;
use crate::repository::participant::ParticipantRepository;
use crate::services::allocation::plan_assignments;
use crate::services::capacity::CapacityModel;

/// Assigns the event's participants to line-times and lanes.
///
/// The whole run is one transaction: reset, capacity snapshot, selection,
/// allocation and every per-participant write commit together or not at all.
/// Runs for the same event are serialized by an advisory lock. Events that do
/// not schedule line-times get a no-op summary carrying the reason.
pub async fn assign(pool: &PgPool, event_id: Uuid, reset_existing: bool) -> Result<AssignmentSummary> {
    let event = EventRepository::new(pool).find_by_id(event_id).await?;
    if let Some(summary) = skip_ineligible(&event) {
        info!(%event_id, kind = event.kind.as_str(), "assignment skipped for event kind");
        return Ok(summary);
    }

    let mut tx = pool.begin().await?;
    EventRepository::lock_for_assignment(&mut tx, event_id).await?;

    if reset_existing {
        let cleared = ParticipantRepository::clear_assignments(&mut tx, event_id).await?;
        info!(%event_id, cleared, "cleared existing assignments");
    }

    let line_times = EventRepository::line_times_with_lanes_tx(&mut tx, event_id).await?;
    let mut model = CapacityModel::build(&line_times);
    let participants = ParticipantRepository::list_for_event_tx(&mut tx, event_id).await?;

    let plan = plan_assignments(&mut model, &participants, reset_existing);
    for planned in &plan.placements {
        ParticipantRepository::write_placement(&mut tx, planned).await?;
    }

    tx.commit().await?;

    let summary = plan.summary();
    info!(
        %event_id,
        reset_existing,
        assigned = summary.assigned,
        waitlisted = summary.waitlisted,
        skipped = summary.skipped,
        "assignment run committed"
    );

    Ok(summary)
}

/// The no-op summary for events that do not schedule line-times, `None` when
/// the run should go ahead.
pub fn skip_ineligible(event: &Event) -> Option<AssignmentSummary> {
    if event.kind.uses_line_time_assignment() {
        return None;
    }

    Some(AssignmentSummary::not_applicable(format!(
        "{} events do not use line-time assignment",
        event.kind.as_str()
    )))
}

/// Returns every participant of the event to `pending`.
pub async fn reset_assignments(pool: &PgPool, event_id: Uuid) -> Result<u64> {
    EventRepository::new(pool).find_by_id(event_id).await?;

    let mut tx = pool.begin().await?;
    EventRepository::lock_for_assignment(&mut tx, event_id).await?;
    let cleared = ParticipantRepository::clear_assignments(&mut tx, event_id).await?;
    tx.commit().await?;

    info!(%event_id, cleared, "assignments reset");
    Ok(cleared)
}
