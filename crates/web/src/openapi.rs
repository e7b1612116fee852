use utoipa::OpenApi;

use crate::features;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::events::handlers::list_events,
        features::events::handlers::get_event,
        features::events::handlers::list_line_times,
        features::events::handlers::list_participants,
        features::assignments::handlers::run_assignment,
        features::assignments::handlers::reset_assignments,
        features::check_ins::handlers::create_check_in,
        features::scoring::handlers::get_score_card,
        features::scoring::handlers::apply_end_scores,
        features::scoring::handlers::live_scores,
        features::standings::handlers::get_standings,
    ),
    components(
        schemas(
            storage::dto::assignment::AssignRequest,
            storage::dto::assignment::AssignmentSummary,
            storage::dto::assignment::ResetAssignmentsResponse,
            storage::dto::check_in::CheckInRequest,
            storage::dto::check_in::CheckInResponse,
            storage::dto::common::PaginationMeta,
            storage::dto::event::LineTimeOccupancy,
            storage::dto::event::LaneOccupancy,
            storage::dto::scoring::ApplyScoresRequest,
            storage::dto::scoring::ScoreCard,
            storage::dto::scoring::EndScored,
            storage::dto::standings::StandingEntry,
            storage::models::Event,
            storage::models::EventKind,
            storage::models::LineTime,
            storage::models::LaneSlot,
            storage::models::Participant,
            storage::models::AssignmentStatus,
            storage::models::CheckIn,
            storage::models::Score,
            storage::models::End,
            crate::live::LiveScoreEvent,
        )
    ),
    tags(
        (name = "events", description = "Events, line-times and participants"),
        (name = "assignments", description = "Line-time and lane assignment"),
        (name = "check-ins", description = "Check-ins and score materialization"),
        (name = "scores", description = "End scoring and the live score feed"),
        (name = "standings", description = "Cumulative event standings"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}
