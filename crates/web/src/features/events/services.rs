use sqlx::PgPool;
use storage::{
    dto::{common::PaginationParams, event::LineTimeOccupancy},
    error::Result,
    models::{Event, Participant},
    repository::{event::EventRepository, participant::ParticipantRepository},
    services::capacity,
};
use uuid::Uuid;

/// List all events
pub async fn list_events(pool: &PgPool) -> Result<Vec<Event>> {
    EventRepository::new(pool).list().await
}

/// Get event by id
pub async fn get_event(pool: &PgPool, event_id: Uuid) -> Result<Event> {
    EventRepository::new(pool).find_by_id(event_id).await
}

/// Line-times of an event with configured capacity next to current assignments
pub async fn line_time_occupancy(pool: &PgPool, event_id: Uuid) -> Result<Vec<LineTimeOccupancy>> {
    let events = EventRepository::new(pool);
    events.find_by_id(event_id).await?;

    let line_times = events.line_times_with_lanes(event_id).await?;
    let participants = ParticipantRepository::new(pool)
        .list_for_event(event_id)
        .await?;

    Ok(capacity::occupancy(&line_times, &participants))
}

/// One page of an event's participants, in registration order
pub async fn list_participants(
    pool: &PgPool,
    event_id: Uuid,
    pagination: &PaginationParams,
) -> Result<(Vec<Participant>, i64)> {
    EventRepository::new(pool).find_by_id(event_id).await?;

    ParticipantRepository::new(pool)
        .list_page(
            event_id,
            i64::from(pagination.offset()),
            i64::from(pagination.limit()),
        )
        .await
}
