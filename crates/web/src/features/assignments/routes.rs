use axum::{Router, middleware, routing::post};

use super::handlers::{reset_assignments, run_assignment};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route(
            "/:event_id/assignments",
            post(run_assignment).delete(reset_assignments),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
