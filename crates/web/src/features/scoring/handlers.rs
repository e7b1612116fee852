use axum::{
    Json,
    extract::{Path, Query, State},
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use storage::{
    Database,
    dto::scoring::{ApplyScoresRequest, EndScored, ScoreCard},
};
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::live::{LiveScoreEvent, LiveScores};

use super::services;

#[derive(Debug, Deserialize, IntoParams)]
pub struct LiveFilter {
    /// Only forward scores of this event
    pub event_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/scores/{score_id}",
    params(
        ("score_id" = Uuid, Path, description = "Score id")
    ),
    responses(
        (status = 200, description = "Score with every planned end", body = ScoreCard),
        (status = 404, description = "Score not found")
    ),
    tag = "scores"
)]
pub async fn get_score_card(
    State(db): State<Database>,
    Path(score_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let card = services::get_score_card(db.pool(), score_id).await?;

    Ok(Json(card).into_response())
}

#[utoipa::path(
    put,
    path = "/api/scores/{score_id}/ends/{end_number}",
    params(
        ("score_id" = Uuid, Path, description = "Score id"),
        ("end_number" = i32, Path, description = "End number, starting at 1")
    ),
    request_body = ApplyScoresRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "End written and score rolled up", body = EndScored),
        (status = 400, description = "Invalid end number or arrow values"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Score not found")
    ),
    tag = "scores"
)]
pub async fn apply_end_scores(
    State(db): State<Database>,
    State(live): State<LiveScores>,
    Path((score_id, end_number)): Path<(Uuid, i32)>,
    Json(req): Json<ApplyScoresRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let scored =
        services::apply_end_scores(db.pool(), &live, score_id, end_number, &req.arrows).await?;

    Ok(Json(scored).into_response())
}

#[utoipa::path(
    get,
    path = "/api/scores/live",
    params(LiveFilter),
    responses(
        (status = 200, description = "Server-sent stream of scored ends", body = LiveScoreEvent, content_type = "text/event-stream")
    ),
    tag = "scores"
)]
pub async fn live_scores(
    State(live): State<LiveScores>,
    Query(filter): Query<LiveFilter>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    live.sse(filter.event_id)
}
