use chrono::NaiveDateTime;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{AssignmentStatus, Participant};
use crate::services::allocation::{Placement, PlannedAssignment};

const PARTICIPANT_COLUMNS: &str = r#"
    participant_id, event_id, first_name, last_name, email, division,
    preferred_line_time_id, assigned_line_time_id, assigned_lane_number,
    assigned_lane_slot, assignment_status, created_at
"#;

/// Fields an import may set on a participant. Assignment fields are owned by
/// the allocator and are not part of it.
#[derive(Debug, Clone)]
pub struct ParticipantDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub division: Option<String>,
    pub preferred_line_time_id: Option<Uuid>,
}

pub struct ParticipantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, participant_id: Uuid) -> Result<Participant> {
        sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE participant_id = $1"
        ))
        .bind(participant_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// All of an event's participants in allocation order
    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Participant>> {
        let mut conn = self.pool.acquire().await?;
        load_for_event(&mut *conn, event_id).await
    }

    pub async fn list_page(
        &self,
        event_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Participant>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM participants WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(self.pool)
        .await?;

        let participants = sqlx::query_as::<_, Participant>(&format!(
            r#"
            SELECT {PARTICIPANT_COLUMNS}
            FROM participants
            WHERE event_id = $1
            ORDER BY created_at, participant_id
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(event_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok((participants, total))
    }

    /// Clears every assignment of the event back to `pending`.
    pub async fn clear_assignments(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE participants
            SET assigned_line_time_id = NULL,
                assigned_lane_number = NULL,
                assigned_lane_slot = NULL,
                assignment_status = $2
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .bind(AssignmentStatus::Pending.as_str())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_for_event_tx(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
    ) -> Result<Vec<Participant>> {
        load_for_event(&mut **tx, event_id).await
    }

    /// Writes one participant's placement. Waitlisting nulls the assignment
    /// fields.
    pub async fn write_placement(
        tx: &mut Transaction<'_, Postgres>,
        planned: &PlannedAssignment,
    ) -> Result<()> {
        let (line_time_id, lane_number, lane_slot, status) = match planned.placement {
            Placement::Assigned { line_time_id, seat } => (
                Some(line_time_id),
                seat.map(|s| s.lane_number),
                seat.and_then(|s| s.slot.letter()),
                AssignmentStatus::Assigned,
            ),
            Placement::Waitlisted => (None, None, None, AssignmentStatus::Waitlist),
        };

        let result = sqlx::query(
            r#"
            UPDATE participants
            SET assigned_line_time_id = $2,
                assigned_lane_number = $3,
                assigned_lane_slot = $4,
                assignment_status = $5
            WHERE participant_id = $1
            "#,
        )
        .bind(planned.participant_id)
        .bind(line_time_id)
        .bind(lane_number)
        .bind(lane_slot)
        .bind(status.as_str())
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
        details: &ParticipantDetails,
        created_at: NaiveDateTime,
    ) -> Result<Participant> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            r#"
            INSERT INTO participants
                (event_id, first_name, last_name, email, division, preferred_line_time_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PARTICIPANT_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(&details.email)
        .bind(&details.division)
        .bind(details.preferred_line_time_id)
        .bind(created_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(participant)
    }

    /// Refreshes roster details on an existing participant.
    pub async fn update_details(
        tx: &mut Transaction<'_, Postgres>,
        participant_id: Uuid,
        details: &ParticipantDetails,
    ) -> Result<Participant> {
        sqlx::query_as::<_, Participant>(&format!(
            r#"
            UPDATE participants
            SET first_name = $2,
                last_name = $3,
                email = COALESCE($4, email),
                division = COALESCE($5, division),
                preferred_line_time_id = COALESCE($6, preferred_line_time_id)
            WHERE participant_id = $1
            RETURNING {PARTICIPANT_COLUMNS}
            "#
        ))
        .bind(participant_id)
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(&details.email)
        .bind(&details.division)
        .bind(details.preferred_line_time_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(StorageError::NotFound)
    }
}

async fn load_for_event(conn: &mut PgConnection, event_id: Uuid) -> Result<Vec<Participant>> {
    let participants = sqlx::query_as::<_, Participant>(&format!(
        r#"
        SELECT {PARTICIPANT_COLUMNS}
        FROM participants
        WHERE event_id = $1
        ORDER BY created_at, participant_id
        "#
    ))
    .bind(event_id)
    .fetch_all(conn)
    .await?;

    Ok(participants)
}
