use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::assignment::{AssignRequest, AssignmentSummary, ResetAssignmentsResponse},
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/assignments",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    request_body = AssignRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Assignment run finished", body = AssignmentSummary),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "assignments"
)]
pub async fn run_assignment(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    body: Bytes,
) -> Result<Response, WebError> {
    let req = parse_assign_request(&body)?;

    let summary = services::run_assignment(db.pool(), event_id, req.reset_existing).await?;

    Ok(Json(summary).into_response())
}

/// An empty body runs without reset; any other body must be a valid request.
fn parse_assign_request(body: &[u8]) -> Result<AssignRequest, WebError> {
    if body.trim_ascii().is_empty() {
        return Ok(AssignRequest::default());
    }

    Json::<AssignRequest>::from_bytes(body)
        .map(|Json(req)| req)
        .map_err(|rejection| WebError::BadRequest(rejection.body_text()))
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_id}/assignments",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Assignments cleared", body = ResetAssignmentsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "assignments"
)]
pub async fn reset_assignments(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let response = services::reset_assignments(db.pool(), event_id).await?;

    Ok(Json(response).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_runs_without_reset() {
        assert!(!parse_assign_request(b"").unwrap().reset_existing);
        assert!(!parse_assign_request(b"  \n").unwrap().reset_existing);
    }

    #[test]
    fn test_reset_flag_is_read() {
        assert!(parse_assign_request(br#"{"reset_existing":true}"#).unwrap().reset_existing);
        assert!(!parse_assign_request(b"{}").unwrap().reset_existing);
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        for body in [&br#"{"reset_existing":"yes"}"#[..], b"reset", b"{"] {
            assert!(matches!(
                parse_assign_request(body),
                Err(WebError::BadRequest(_))
            ));
        }
    }
}
