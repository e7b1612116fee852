use sqlx::PgPool;
use storage::{
    dto::assignment::{AssignmentSummary, ResetAssignmentsResponse},
    error::Result,
    services::assignment,
};
use uuid::Uuid;

/// Run line-time assignment for an event
pub async fn run_assignment(
    pool: &PgPool,
    event_id: Uuid,
    reset_existing: bool,
) -> Result<AssignmentSummary> {
    assignment::assign(pool, event_id, reset_existing).await
}

/// Clear every assignment of an event
pub async fn reset_assignments(pool: &PgPool, event_id: Uuid) -> Result<ResetAssignmentsResponse> {
    let cleared = assignment::reset_assignments(pool, event_id).await?;

    Ok(ResetAssignmentsResponse { cleared })
}
