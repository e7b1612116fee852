use sqlx::PgPool;
use storage::{
    dto::scoring::{EndScored, ScoreCard},
    error::Result,
    services::scoring,
};
use tracing::info;
use uuid::Uuid;

use crate::live::{LiveScoreEvent, LiveScores};

/// Score with all planned ends, creating empty ones on first open
pub async fn get_score_card(pool: &PgPool, score_id: Uuid) -> Result<ScoreCard> {
    scoring::open_score_card(pool, score_id).await
}

/// Write one end, roll the score up, then tell live subscribers
pub async fn apply_end_scores(
    pool: &PgPool,
    live: &LiveScores,
    score_id: Uuid,
    end_number: i32,
    arrows: &[Option<i32>],
) -> Result<EndScored> {
    let scored = scoring::apply_scores(pool, score_id, end_number, arrows).await?;

    let receivers = live.publish(LiveScoreEvent::end_scored(&scored));
    info!(
        %score_id,
        end_number,
        total_score = scored.score.total_score,
        receivers,
        "end scored"
    );

    Ok(scored)
}
