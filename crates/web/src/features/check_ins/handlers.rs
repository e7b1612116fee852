use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::check_in::{CheckInRequest, CheckInResponse},
    services::check_in::ScoringDefaults,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/check-ins",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    request_body = CheckInRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Check-in recorded; the period's score exists", body = CheckInResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event or participant not found")
    ),
    tag = "check-ins"
)]
pub async fn create_check_in(
    State(db): State<Database>,
    State(defaults): State<ScoringDefaults>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<CheckInRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::create_check_in(db.pool(), event_id, &req, &defaults).await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}
