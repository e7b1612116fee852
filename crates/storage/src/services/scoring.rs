//! End and score aggregation.
//!
//! Arrow values only change through [`apply_scores`]. It recomputes the end,
//! then rolls every end of the parent score up into the score with a quiet
//! write. The cascade runs End → Score only.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::dto::scoring::{EndScored, ScoreCard};
use crate::error::{Result, StorageError};
use crate::models::{End, Score};
use crate::repository::score::ScoreRepository;

/// Derived values of a single end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndTotals {
    pub end_score: i32,
    pub x_count: i32,
}

impl EndTotals {
    /// Sum of entered arrows and the number equal to `x_value`. Unset arrows
    /// count for nothing.
    pub fn compute(arrows: &[Option<i32>], x_value: i32) -> Self {
        arrows.iter().flatten().fold(Self::default(), |acc, &value| Self {
            end_score: acc.end_score.saturating_add(value),
            x_count: acc.x_count + i32::from(value == x_value),
        })
    }
}

/// Derived values of a score, always recomputed from the full set of ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTotals {
    pub total_score: i32,
    pub x_count: i32,
}

impl ScoreTotals {
    pub fn from_ends<'e>(ends: impl IntoIterator<Item = &'e End>) -> Self {
        ends.into_iter().fold(Self::default(), |acc, end| Self {
            total_score: acc.total_score.saturating_add(end.end_score),
            x_count: acc.x_count.saturating_add(end.x_count),
        })
    }
}

/// Fits raw keypad input to the score's end size: missing arrows become
/// unset, extra arrows are dropped. Values outside `0..=ceiling` are rejected.
pub fn normalize_arrows(
    raw: &[Option<i32>],
    arrows_per_end: usize,
    ceiling: i32,
) -> Result<Vec<Option<i32>>> {
    let mut arrows: Vec<Option<i32>> = raw.iter().copied().take(arrows_per_end).collect();
    arrows.resize(arrows_per_end, None);

    if let Some(bad) = arrows.iter().flatten().find(|&&v| v < 0 || v > ceiling) {
        return Err(StorageError::InvalidInput(format!(
            "arrow value {bad} is outside 0..={ceiling}"
        )));
    }

    Ok(arrows)
}

fn check_end_number(score: &Score, end_number: i32) -> Result<()> {
    if end_number < 1 || end_number > score.ends_planned {
        return Err(StorageError::InvalidInput(format!(
            "end {end_number} is outside 1..={}",
            score.ends_planned
        )));
    }
    Ok(())
}

/// Replaces an end's arrows and keeps the end and its score consistent.
///
/// Runs in one transaction: the end write and the score rollup commit
/// together or not at all. Applying an all-unset array resets the end.
pub async fn apply_scores(
    pool: &PgPool,
    score_id: Uuid,
    end_number: i32,
    raw: &[Option<i32>],
) -> Result<EndScored> {
    let mut tx = pool.begin().await?;

    let score = ScoreRepository::lock_for_update(&mut tx, score_id).await?;
    check_end_number(&score, end_number)?;

    let arrows_per_end = usize::try_from(score.arrows_per_end).unwrap_or(0);
    let arrows = normalize_arrows(raw, arrows_per_end, score.arrow_ceiling())?;
    let totals = EndTotals::compute(&arrows, score.x_value);

    let end = ScoreRepository::save_end(&mut tx, score_id, end_number, &arrows, totals).await?;
    let score = roll_up(&mut tx, score_id).await?;

    tx.commit().await?;

    Ok(EndScored { end, score })
}

/// Recomputes the score's totals from all of its ends and stores them quietly.
async fn roll_up(tx: &mut Transaction<'_, Postgres>, score_id: Uuid) -> Result<Score> {
    let ends = ScoreRepository::ends_for_score_tx(tx, score_id).await?;
    let totals = ScoreTotals::from_ends(&ends);

    debug!(
        %score_id,
        ends = ends.len(),
        total_score = totals.total_score,
        x_count = totals.x_count,
        "score rolled up"
    );

    ScoreRepository::write_totals_quietly(tx, score_id, totals).await
}

/// Loads a score card, creating any planned ends that do not exist yet.
pub async fn open_score_card(pool: &PgPool, score_id: Uuid) -> Result<ScoreCard> {
    let mut tx = pool.begin().await?;

    let score = ScoreRepository::lock_for_update(&mut tx, score_id).await?;
    let created = ScoreRepository::insert_missing_ends(&mut tx, &score).await?;
    let ends = ScoreRepository::ends_for_score_tx(&mut tx, score_id).await?;

    tx.commit().await?;

    if created > 0 {
        debug!(%score_id, created, "materialized empty ends");
    }

    Ok(ScoreCard { score, ends })
}
