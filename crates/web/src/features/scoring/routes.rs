use axum::{
    Router, middleware,
    routing::{get, put},
};

use super::handlers::{apply_end_scores, get_score_card, live_scores};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/:score_id/ends/:end_number", put(apply_end_scores))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/live", get(live_scores))
        .route("/:score_id", get(get_score_card))
        .merge(protected)
}
