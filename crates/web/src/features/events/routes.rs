use axum::{Router, routing::get};

use super::handlers::{get_event, list_events, list_line_times, list_participants};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events))
        .route("/:event_id", get(get_event))
        .route("/:event_id/line-times", get(list_line_times))
        .route("/:event_id/participants", get(list_participants))
}
