use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{End, Score, ScoringPeriod};
use crate::services::check_in::ScoringDefaults;
use crate::services::scoring::{EndTotals, ScoreTotals};

const SCORE_COLUMNS: &str = r#"
    score_id, event_id, participant_id, period_key, week_number, line_time_id,
    arrows_per_end, ends_planned, max_score, x_value, total_score, x_count,
    created_at, updated_at
"#;

const END_COLUMNS: &str = "end_id, score_id, end_number, arrows, end_score, x_count, updated_at";

/// One score row joined with its participant, the input to standings.
#[derive(Debug, Clone, FromRow)]
pub struct PeriodScoreRow {
    pub participant_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub division: Option<String>,
    pub total_score: i32,
    pub x_count: i32,
}

/// Repository for scores and their ends.
///
/// Writes here are silent: nothing is recomputed or announced. The
/// `services::scoring` functions wrap them with the End → Score rollup.
pub struct ScoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, score_id: Uuid) -> Result<Score> {
        sqlx::query_as::<_, Score>(&format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE score_id = $1"
        ))
        .bind(score_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn find_for_period(
        &self,
        event_id: Uuid,
        participant_id: Uuid,
        period: ScoringPeriod,
    ) -> Result<Option<Score>> {
        let score = sqlx::query_as::<_, Score>(&format!(
            r#"
            SELECT {SCORE_COLUMNS}
            FROM scores
            WHERE event_id = $1 AND participant_id = $2 AND period_key = $3
            "#
        ))
        .bind(event_id)
        .bind(participant_id)
        .bind(period.key())
        .fetch_optional(self.pool)
        .await?;

        Ok(score)
    }

    /// Plain insert; a concurrent insert for the same period surfaces as a
    /// unique violation for the caller to resolve.
    pub async fn create(
        &self,
        event_id: Uuid,
        participant_id: Uuid,
        period: ScoringPeriod,
        defaults: &ScoringDefaults,
    ) -> Result<Score> {
        let score = sqlx::query_as::<_, Score>(&format!(
            r#"
            INSERT INTO scores (
                event_id, participant_id, period_key, week_number, line_time_id,
                arrows_per_end, ends_planned, max_score, x_value
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(participant_id)
        .bind(period.key())
        .bind(period.week_number())
        .bind(period.line_time_id())
        .bind(defaults.arrows_per_end)
        .bind(defaults.ends_planned)
        .bind(defaults.max_score)
        .bind(defaults.x_value)
        .fetch_one(self.pool)
        .await?;

        Ok(score)
    }

    pub async fn period_scores_for_event(&self, event_id: Uuid) -> Result<Vec<PeriodScoreRow>> {
        let rows = sqlx::query_as::<_, PeriodScoreRow>(
            r#"
            SELECT s.participant_id, p.first_name, p.last_name, p.division,
                   s.total_score, s.x_count
            FROM scores s
            INNER JOIN participants p ON p.participant_id = s.participant_id
            WHERE s.event_id = $1
            ORDER BY s.participant_id, s.period_key
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Loads the score and holds its row lock until the transaction ends, so
    /// end writes on the same score roll up one after another.
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        score_id: Uuid,
    ) -> Result<Score> {
        sqlx::query_as::<_, Score>(&format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE score_id = $1 FOR UPDATE"
        ))
        .bind(score_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn ends_for_score_tx(
        tx: &mut Transaction<'_, Postgres>,
        score_id: Uuid,
    ) -> Result<Vec<End>> {
        load_ends(&mut **tx, score_id).await
    }

    /// Creates ends `1..=ends_planned` that do not exist yet, with every arrow
    /// unset.
    pub async fn insert_missing_ends(
        tx: &mut Transaction<'_, Postgres>,
        score: &Score,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO ends (score_id, end_number, arrows)
            SELECT $1, n, array_fill(NULL::integer, ARRAY[$2::integer])
            FROM generate_series(1, $3::integer) AS n
            ON CONFLICT (score_id, end_number) DO NOTHING
            "#,
        )
        .bind(score.score_id)
        .bind(score.arrows_per_end)
        .bind(score.ends_planned)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn save_end(
        tx: &mut Transaction<'_, Postgres>,
        score_id: Uuid,
        end_number: i32,
        arrows: &[Option<i32>],
        totals: EndTotals,
    ) -> Result<End> {
        let end = sqlx::query_as::<_, End>(&format!(
            r#"
            INSERT INTO ends (score_id, end_number, arrows, end_score, x_count)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (score_id, end_number)
            DO UPDATE SET
                arrows = EXCLUDED.arrows,
                end_score = EXCLUDED.end_score,
                x_count = EXCLUDED.x_count,
                updated_at = CURRENT_TIMESTAMP
            RETURNING {END_COLUMNS}
            "#
        ))
        .bind(score_id)
        .bind(end_number)
        .bind(arrows)
        .bind(totals.end_score)
        .bind(totals.x_count)
        .fetch_one(&mut **tx)
        .await?;

        Ok(end)
    }

    /// Stores derived totals on the score without touching its ends.
    pub async fn write_totals_quietly(
        tx: &mut Transaction<'_, Postgres>,
        score_id: Uuid,
        totals: ScoreTotals,
    ) -> Result<Score> {
        sqlx::query_as::<_, Score>(&format!(
            r#"
            UPDATE scores
            SET total_score = $2,
                x_count = $3,
                updated_at = CURRENT_TIMESTAMP
            WHERE score_id = $1
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(score_id)
        .bind(totals.total_score)
        .bind(totals.x_count)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(StorageError::NotFound)
    }
}

async fn load_ends(conn: &mut PgConnection, score_id: Uuid) -> Result<Vec<End>> {
    let ends = sqlx::query_as::<_, End>(&format!(
        "SELECT {END_COLUMNS} FROM ends WHERE score_id = $1 ORDER BY end_number"
    ))
    .bind(score_id)
    .fetch_all(conn)
    .await?;

    Ok(ends)
}
