use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CheckIn, ScoringPeriod};
use crate::services::capacity::LanePosition;

pub struct CheckInRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckInRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Records the check-in, or refreshes the lane and timestamp when the
    /// participant is already checked in for the period.
    pub async fn upsert(
        &self,
        event_id: Uuid,
        participant_id: Uuid,
        period: ScoringPeriod,
        seat: Option<LanePosition>,
    ) -> Result<CheckIn> {
        let check_in = sqlx::query_as::<_, CheckIn>(
            r#"
            INSERT INTO check_ins (
                event_id, participant_id, period_key, week_number, line_time_id,
                lane_number, lane_slot
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (participant_id, period_key)
            DO UPDATE SET
                lane_number = EXCLUDED.lane_number,
                lane_slot = EXCLUDED.lane_slot,
                checked_in_at = CURRENT_TIMESTAMP
            RETURNING check_in_id, event_id, participant_id, period_key, week_number,
                      line_time_id, lane_number, lane_slot, checked_in_at
            "#,
        )
        .bind(event_id)
        .bind(participant_id)
        .bind(period.key())
        .bind(period.week_number())
        .bind(period.line_time_id())
        .bind(seat.map(|s| s.lane_number))
        .bind(seat.and_then(|s| s.slot.letter()))
        .fetch_one(self.pool)
        .await?;

        Ok(check_in)
    }
}
