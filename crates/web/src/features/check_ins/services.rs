use sqlx::PgPool;
use storage::{
    dto::check_in::{CheckInRequest, CheckInResponse},
    error::Result,
    services::check_in::{self, ScoringDefaults},
};
use uuid::Uuid;

/// Record a check-in and make sure the period has a score
pub async fn create_check_in(
    pool: &PgPool,
    event_id: Uuid,
    request: &CheckInRequest,
    defaults: &ScoringDefaults,
) -> Result<CheckInResponse> {
    check_in::record_check_in(pool, event_id, request, defaults).await
}
