use axum::{Router, routing::get};

use super::handlers::get_standings;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/:event_id/standings", get(get_standings))
}
