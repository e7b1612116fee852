use axum::extract::FromRef;
use storage::{Database, services::check_in::ScoringDefaults};

use crate::live::LiveScores;

/// Shared handler state; handlers extract only the part they need.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub scoring_defaults: ScoringDefaults,
    pub live: LiveScores,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for ScoringDefaults {
    fn from_ref(state: &AppState) -> Self {
        state.scoring_defaults
    }
}

impl FromRef<AppState> for LiveScores {
    fn from_ref(state: &AppState) -> Self {
        state.live.clone()
    }
}
