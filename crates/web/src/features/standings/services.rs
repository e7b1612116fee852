use sqlx::PgPool;
use storage::{
    dto::standings::StandingEntry, error::Result, repository::event::EventRepository,
    services::standings,
};
use uuid::Uuid;

/// Ranked standings over every scoring period of an event
pub async fn get_standings(pool: &PgPool, event_id: Uuid) -> Result<Vec<StandingEntry>> {
    EventRepository::new(pool).find_by_id(event_id).await?;

    standings::event_standings(pool, event_id).await
}
