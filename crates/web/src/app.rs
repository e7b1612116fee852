use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features;
use crate::middleware::auth::ApiKeys;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub fn router(state: AppState, api_keys: ApiKeys) -> Router {
    let events = Router::new()
        .merge(features::events::routes::routes())
        .merge(features::assignments::routes::routes(api_keys.clone()))
        .merge(features::check_ins::routes::routes(api_keys.clone()))
        .merge(features::standings::routes::routes());

    Router::new()
        .nest("/api/events", events)
        .nest("/api/scores", features::scoring::routes::routes(api_keys))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
