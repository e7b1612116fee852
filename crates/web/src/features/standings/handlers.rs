use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{Database, dto::standings::StandingEntry};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/standings",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Participants ranked by total score, then X count", body = Vec<StandingEntry>),
        (status = 404, description = "Event not found")
    ),
    tag = "standings"
)]
pub async fn get_standings(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let standings = services::get_standings(db.pool(), event_id).await?;

    Ok(Json(standings).into_response())
}
