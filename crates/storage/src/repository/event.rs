use std::collections::HashMap;

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Event, LaneMap, LineTime, LineTimeWithLanes};

const EVENT_COLUMNS: &str = r#"
    event_id, name, slug, kind, arrows_per_end, ends_planned, max_score, x_value, created_at
"#;

/// Repository for events and their line-time schedule
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all events, newest first
    pub async fn list(&self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, event_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    pub async fn find_by_id(&self, event_id: Uuid) -> Result<Event> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1"
        ))
        .bind(event_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Event> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn find_line_time(&self, line_time_id: Uuid) -> Result<LineTime> {
        sqlx::query_as::<_, LineTime>(
            r#"
            SELECT line_time_id, event_id, label, starts_at, capacity, created_at
            FROM line_times
            WHERE line_time_id = $1
            "#,
        )
        .bind(line_time_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Line-times in schedule order with their lane maps
    pub async fn line_times_with_lanes(&self, event_id: Uuid) -> Result<Vec<LineTimeWithLanes>> {
        let mut conn = self.pool.acquire().await?;
        load_line_times_with_lanes(&mut *conn, event_id).await
    }

    /// Serializes assignment runs for one event until the transaction ends.
    pub async fn lock_for_assignment(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
    ) -> Result<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(event_id.to_string())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub async fn line_times_with_lanes_tx(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
    ) -> Result<Vec<LineTimeWithLanes>> {
        load_line_times_with_lanes(&mut **tx, event_id).await
    }
}

async fn load_line_times_with_lanes(
    conn: &mut PgConnection,
    event_id: Uuid,
) -> Result<Vec<LineTimeWithLanes>> {
    let line_times = sqlx::query_as::<_, LineTime>(
        r#"
        SELECT line_time_id, event_id, label, starts_at, capacity, created_at
        FROM line_times
        WHERE event_id = $1
        ORDER BY starts_at, line_time_id
        "#,
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await?;

    let lanes = sqlx::query_as::<_, LaneMap>(
        r#"
        SELECT lm.lane_map_id, lm.line_time_id, lm.lane_number, lm.slot, lm.capacity
        FROM lane_maps lm
        INNER JOIN line_times lt ON lt.line_time_id = lm.line_time_id
        WHERE lt.event_id = $1
        ORDER BY lm.line_time_id, lm.lane_number, lm.slot
        "#,
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(group_lanes(line_times, lanes))
}

fn group_lanes(line_times: Vec<LineTime>, lanes: Vec<LaneMap>) -> Vec<LineTimeWithLanes> {
    let mut by_line_time: HashMap<Uuid, Vec<LaneMap>> = HashMap::new();
    for lane in lanes {
        by_line_time.entry(lane.line_time_id).or_default().push(lane);
    }

    line_times
        .into_iter()
        .map(|line_time| {
            let lanes = by_line_time
                .remove(&line_time.line_time_id)
                .unwrap_or_default();
            LineTimeWithLanes { line_time, lanes }
        })
        .collect()
}
