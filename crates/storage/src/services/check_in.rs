use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::check_in::{CheckInRequest, CheckInResponse};
use crate::error::{Result, StorageError};
use crate::models::{Event, LaneSlot, LineTime, Participant, Score, ScoringPeriod};
use crate::repository::check_in::CheckInRepository;
use crate::repository::event::EventRepository;
use crate::repository::participant::ParticipantRepository;
use crate::repository::score::ScoreRepository;
use crate::services::capacity::{LanePosition, held_seat};

/// Shape of a newly created score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoringDefaults {
    pub arrows_per_end: i32,
    pub ends_planned: i32,
    pub max_score: i32,
    pub x_value: i32,
}

impl Default for ScoringDefaults {
    fn default() -> Self {
        Self {
            arrows_per_end: 3,
            ends_planned: 10,
            max_score: 10,
            x_value: 10,
        }
    }
}

impl ScoringDefaults {
    /// These defaults with the event's own settings layered on top.
    pub fn for_event(&self, event: &Event) -> Self {
        Self {
            arrows_per_end: event.arrows_per_end.unwrap_or(self.arrows_per_end),
            ends_planned: event.ends_planned.unwrap_or(self.ends_planned),
            max_score: event.max_score.unwrap_or(self.max_score),
            x_value: event.x_value.unwrap_or(self.x_value),
        }
    }
}

/// Returns the participant's score for the period, creating it from
/// `defaults` on first use. Safe against concurrent check-ins: losing the
/// insert race reads back the winner's row.
pub async fn ensure_score(
    pool: &PgPool,
    participant: &Participant,
    period: ScoringPeriod,
    defaults: &ScoringDefaults,
) -> Result<Score> {
    let repo = ScoreRepository::new(pool);
    let event_id = participant.event_id;
    let participant_id = participant.participant_id;

    if let Some(score) = repo.find_for_period(event_id, participant_id, period).await? {
        return Ok(score);
    }

    match repo.create(event_id, participant_id, period, defaults).await {
        Ok(score) => {
            info!(%participant_id, %period, score_id = %score.score_id, "score materialized");
            Ok(score)
        }
        Err(e) if e.is_unique_violation() => {
            debug!(%participant_id, %period, "score created concurrently, reusing it");
            repo.find_for_period(event_id, participant_id, period)
                .await?
                .ok_or(StorageError::NotFound)
        }
        Err(e) => Err(e),
    }
}

/// Exactly one of week and line-time identifies the period.
pub fn resolve_period(week_number: Option<i32>, line_time_id: Option<Uuid>) -> Result<ScoringPeriod> {
    match (week_number, line_time_id) {
        (Some(week), None) => Ok(ScoringPeriod::Week(week)),
        (None, Some(id)) => Ok(ScoringPeriod::LineTime(id)),
        _ => Err(StorageError::InvalidInput(
            "exactly one of week_number and line_time_id must be given".to_string(),
        )),
    }
}

/// A line-time period must name one of the event's own line-times.
pub fn ensure_line_time_in_event(line_time: &LineTime, event_id: Uuid) -> Result<()> {
    if line_time.event_id != event_id {
        return Err(StorageError::NotFound);
    }
    Ok(())
}

/// An explicit lane wins; otherwise a line-time check-in inherits the seat
/// the allocator gave the participant on that line-time.
pub fn resolve_seat(
    lane_number: Option<i32>,
    lane_slot: Option<&str>,
    participant: &Participant,
    period: ScoringPeriod,
) -> Result<Option<LanePosition>> {
    if let Some(lane_number) = lane_number {
        let slot = match lane_slot {
            Some(letter) => LaneSlot::try_from(letter.to_string())
                .map_err(|e| StorageError::InvalidInput(e.to_string()))?,
            None => LaneSlot::Single,
        };
        return Ok(Some(LanePosition { lane_number, slot }));
    }

    match period {
        ScoringPeriod::LineTime(id)
            if participant.is_assigned() && participant.assigned_line_time_id == Some(id) =>
        {
            Ok(held_seat(participant))
        }
        _ => Ok(None),
    }
}

/// Records a check-in and makes sure a score exists for the period.
pub async fn record_check_in(
    pool: &PgPool,
    event_id: Uuid,
    request: &CheckInRequest,
    defaults: &ScoringDefaults,
) -> Result<CheckInResponse> {
    let events = EventRepository::new(pool);
    let event = events.find_by_id(event_id).await?;
    let participant = ParticipantRepository::new(pool)
        .find_by_id(request.participant_id)
        .await?;
    if participant.event_id != event.event_id {
        return Err(StorageError::NotFound);
    }

    let period = resolve_period(request.week_number, request.line_time_id)?;
    if let ScoringPeriod::LineTime(line_time_id) = period {
        let line_time = events.find_line_time(line_time_id).await?;
        ensure_line_time_in_event(&line_time, event.event_id)?;
    }

    let seat = resolve_seat(
        request.lane_number,
        request.lane_slot.as_deref(),
        &participant,
        period,
    )?;

    let check_in = CheckInRepository::new(pool)
        .upsert(event_id, participant.participant_id, period, seat)
        .await?;
    let score = ensure_score(pool, &participant, period, &defaults.for_event(&event)).await?;

    Ok(CheckInResponse { check_in, score })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentStatus, EventKind};
    use crate::services::fixtures::{EVENT_ID, base_time, line_time, participant};

    fn event(arrows_per_end: Option<i32>, x_value: Option<i32>) -> Event {
        Event {
            event_id: EVENT_ID,
            name: "Winter League".to_string(),
            slug: "winter-league".to_string(),
            kind: EventKind::League,
            arrows_per_end,
            ends_planned: None,
            max_score: None,
            x_value,
            created_at: base_time(),
        }
    }

    #[test]
    fn test_default_max_score_is_ten() {
        assert_eq!(ScoringDefaults::default().max_score, 10);
    }

    #[test]
    fn test_event_settings_override_defaults() {
        let defaults = ScoringDefaults::default();
        let resolved = defaults.for_event(&event(Some(5), Some(11)));

        assert_eq!(resolved.arrows_per_end, 5);
        assert_eq!(resolved.x_value, 11);
        assert_eq!(resolved.ends_planned, defaults.ends_planned);
        assert_eq!(resolved.max_score, 10);
    }

    #[test]
    fn test_event_without_settings_keeps_defaults() {
        let defaults = ScoringDefaults {
            arrows_per_end: 6,
            ends_planned: 12,
            max_score: 10,
            x_value: 10,
        };
        assert_eq!(defaults.for_event(&event(None, None)), defaults);
    }

    #[test]
    fn test_resolve_period_requires_exactly_one() {
        let id = Uuid::from_u128(9);
        assert_eq!(resolve_period(Some(4), None).unwrap(), ScoringPeriod::Week(4));
        assert_eq!(
            resolve_period(None, Some(id)).unwrap(),
            ScoringPeriod::LineTime(id)
        );
        assert!(resolve_period(None, None).is_err());
        assert!(resolve_period(Some(1), Some(id)).is_err());
    }

    #[test]
    fn test_line_time_of_another_event_is_not_found() {
        let own = line_time(1, Some(10), Vec::new()).line_time;
        assert!(ensure_line_time_in_event(&own, EVENT_ID).is_ok());

        let mut foreign = line_time(2, Some(10), Vec::new()).line_time;
        foreign.event_id = Uuid::from_u128(0xE1);
        assert!(matches!(
            ensure_line_time_in_event(&foreign, EVENT_ID),
            Err(StorageError::NotFound)
        ));
    }

    #[test]
    fn test_explicit_lane_wins() {
        let p = participant(1, 0, None);
        let seat = resolve_seat(Some(7), Some("C"), &p, ScoringPeriod::Week(1)).unwrap();
        assert_eq!(
            seat,
            Some(LanePosition {
                lane_number: 7,
                slot: LaneSlot::C
            })
        );
    }

    #[test]
    fn test_line_time_check_in_inherits_assigned_seat() {
        let line_time_id = Uuid::from_u128(50);
        let mut p = participant(1, 0, None);
        p.assignment_status = AssignmentStatus::Assigned;
        p.assigned_line_time_id = Some(line_time_id);
        p.assigned_lane_number = Some(3);
        p.assigned_lane_slot = Some("A".to_string());

        let seat = resolve_seat(None, None, &p, ScoringPeriod::LineTime(line_time_id)).unwrap();
        assert_eq!(
            seat,
            Some(LanePosition {
                lane_number: 3,
                slot: LaneSlot::A
            })
        );

        let other = resolve_seat(None, None, &p, ScoringPeriod::LineTime(Uuid::from_u128(51)))
            .unwrap();
        assert_eq!(other, None);
    }
}
