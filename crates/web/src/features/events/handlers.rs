use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        event::LineTimeOccupancy,
    },
    models::{Event, Participant},
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "List all events successfully", body = Vec<Event>)
    ),
    tag = "events"
)]
pub async fn list_events(State(db): State<Database>) -> Result<Json<Vec<Event>>, WebError> {
    let events = services::list_events(db.pool()).await?;

    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let event = services::get_event(db.pool(), event_id).await?;

    Ok(Json(event).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/line-times",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Line-times with lane capacity and current assignments", body = Vec<LineTimeOccupancy>),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn list_line_times(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let occupancy = services::line_time_occupancy(db.pool(), event_id).await?;

    Ok(Json(occupancy).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/participants",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Participants in registration order", body = PaginatedResponse<Participant>),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn list_participants(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (participants, total_items) =
        services::list_participants(db.pool(), event_id, &pagination).await?;

    let response = PaginatedResponse::new(
        participants,
        pagination.page,
        pagination.page_size,
        total_items,
    );

    Ok(Json(response).into_response())
}
