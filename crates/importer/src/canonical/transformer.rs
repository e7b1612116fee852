use super::models::{CanonicalRoster, RosterEntry, email_key};
use crate::{ImporterError, Result};
use chrono::{NaiveDateTime, TimeDelta, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use storage::{
    error::StorageError,
    models::{LineTimeWithLanes, NormalizedArcherName, Participant},
    repository::{
        event::EventRepository,
        participant::{ParticipantDetails, ParticipantRepository},
    },
};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: u32,
    pub updated: u32,
}

/// Finds the participant a roster row refers to: same email first, then
/// same normalized name.
#[derive(Debug, Default)]
pub struct RosterMatcher {
    by_email: HashMap<String, Uuid>,
    by_name: HashMap<NormalizedArcherName, Uuid>,
}

impl RosterMatcher {
    /// Indexes existing participants; on duplicates the earliest registration wins.
    pub fn new(existing: &[Participant]) -> Self {
        let mut matcher = Self::default();
        for participant in existing {
            matcher.index(
                email_key(participant.email.as_deref()),
                NormalizedArcherName::new(&participant.first_name, &participant.last_name),
                participant.participant_id,
            );
        }
        matcher
    }

    pub fn find(&self, entry: &RosterEntry) -> Option<Uuid> {
        if let Some(id) = entry.email_key().and_then(|email| self.by_email.get(&email)) {
            return Some(*id);
        }

        let name = NormalizedArcherName::new(&entry.first_name, &entry.last_name);
        if name.is_empty() {
            return None;
        }
        self.by_name.get(&name).copied()
    }

    /// Makes a just-written row visible to later rows of the same roster.
    pub fn record(&mut self, entry: &RosterEntry, participant_id: Uuid) {
        self.index(
            entry.email_key(),
            NormalizedArcherName::new(&entry.first_name, &entry.last_name),
            participant_id,
        );
    }

    fn index(&mut self, email: Option<String>, name: NormalizedArcherName, id: Uuid) {
        if let Some(email) = email {
            self.by_email.entry(email).or_insert(id);
        }
        if !name.is_empty() {
            self.by_name.entry(name).or_insert(id);
        }
    }
}

/// Line-time id for a preferred label, compared trimmed and case-insensitively.
/// Hands out strictly increasing registration times so rows created in one
/// transaction keep their roster order.
#[derive(Debug)]
pub struct RegistrationClock {
    next: NaiveDateTime,
}

impl RegistrationClock {
    pub fn starting_at(start: NaiveDateTime) -> Self {
        Self { next: start }
    }

    pub fn tick(&mut self) -> NaiveDateTime {
        let current = self.next;
        self.next = current + TimeDelta::microseconds(1);
        current
    }
}

pub fn resolve_line_time(line_times: &[LineTimeWithLanes], label: &str) -> Option<Uuid> {
    let wanted = label.trim().to_lowercase();
    line_times
        .iter()
        .find(|entry| entry.line_time.label.trim().to_lowercase() == wanted)
        .map(|entry| entry.line_time.line_time_id)
}

pub struct CanonicalTransformer<'a> {
    pool: &'a PgPool,
}

impl<'a> CanonicalTransformer<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upserts the roster's participants into their event. Assignment fields
    /// are left alone; the allocator owns them.
    pub async fn import_to_database(&self, roster: &CanonicalRoster) -> Result<ImportSummary> {
        let event = EventRepository::new(self.pool)
            .find_by_slug(roster.event_slug.trim())
            .await
            .map_err(|e| match e {
                StorageError::NotFound => {
                    ImporterError::ImportError(format!("Unknown event slug: '{}'", roster.event_slug))
                }
                other => other.into(),
            })?;
        let event_id = event.event_id;

        let mut tx = self.pool.begin().await?;
        EventRepository::lock_for_assignment(&mut tx, event_id).await?;

        let line_times = EventRepository::line_times_with_lanes_tx(&mut tx, event_id).await?;
        let existing = ParticipantRepository::list_for_event_tx(&mut tx, event_id).await?;
        let mut matcher = RosterMatcher::new(&existing);
        let mut summary = ImportSummary::default();
        let mut clock = RegistrationClock::starting_at(Utc::now().naive_utc());

        for entry in &roster.participants {
            let preferred_line_time_id = match entry.preferred_line_time.as_deref() {
                Some(label) => {
                    let resolved = resolve_line_time(&line_times, label);
                    if resolved.is_none() {
                        warn!("'{}' prefers unknown line-time '{}'; ignoring", entry.label(), label);
                    }
                    resolved
                }
                None => None,
            };

            let details = ParticipantDetails {
                first_name: entry.first_name.trim().to_string(),
                last_name: entry.last_name.trim().to_string(),
                email: entry.email.as_deref().map(str::trim).map(String::from),
                division: entry.division.clone(),
                preferred_line_time_id,
            };

            let participant = match matcher.find(entry) {
                Some(participant_id) => {
                    summary.updated += 1;
                    debug!(%participant_id, "updating '{}'", entry.label());
                    ParticipantRepository::update_details(&mut tx, participant_id, &details).await?
                }
                None => {
                    summary.created += 1;
                    debug!("creating '{}'", entry.label());
                    ParticipantRepository::insert(&mut tx, event_id, &details, clock.tick()).await?
                }
            };
            matcher.record(entry, participant.participant_id);
        }

        tx.commit().await?;

        info!(
            event = %event.slug,
            created = summary.created,
            updated = summary.updated,
            "roster imported"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::{AssignmentStatus, LineTime};

    fn existing(id: u128, first: &str, last: &str, email: Option<&str>) -> Participant {
        Participant {
            participant_id: Uuid::from_u128(id),
            event_id: Uuid::from_u128(0xE0),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.map(String::from),
            division: None,
            preferred_line_time_id: None,
            assigned_line_time_id: None,
            assigned_lane_number: None,
            assigned_lane_slot: None,
            assignment_status: AssignmentStatus::Pending,
            created_at: NaiveDateTime::default(),
        }
    }

    fn row(first: &str, last: &str, email: Option<&str>) -> RosterEntry {
        RosterEntry {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.map(String::from),
            division: None,
            preferred_line_time: None,
        }
    }

    #[test]
    fn test_matches_email_case_insensitively() {
        let matcher = RosterMatcher::new(&[existing(1, "Jane", "Doe", Some("jane@example.org"))]);

        assert_eq!(
            matcher.find(&row("Janet", "Smith", Some(" JANE@Example.org"))),
            Some(Uuid::from_u128(1))
        );
    }

    #[test]
    fn test_email_match_wins_over_name_match() {
        let matcher = RosterMatcher::new(&[
            existing(1, "Jane", "Doe", None),
            existing(2, "Sam", "Lee", Some("sam@example.org")),
        ]);

        assert_eq!(
            matcher.find(&row("Jane", "Doe", Some("sam@example.org"))),
            Some(Uuid::from_u128(2))
        );
    }

    #[test]
    fn test_falls_back_to_normalized_name() {
        let matcher = RosterMatcher::new(&[existing(1, "Mary Ann", "Smith", None)]);

        assert_eq!(
            matcher.find(&row("smith", "  mary   ann ", Some("new@example.org"))),
            Some(Uuid::from_u128(1))
        );
        assert_eq!(matcher.find(&row("Mary", "Smith", None)), None);
    }

    #[test]
    fn test_earliest_registration_wins_on_duplicate_names() {
        let matcher = RosterMatcher::new(&[
            existing(1, "Jane", "Doe", None),
            existing(2, "Jane", "Doe", None),
        ]);

        assert_eq!(matcher.find(&row("Jane", "Doe", None)), Some(Uuid::from_u128(1)));
    }

    #[test]
    fn test_recorded_rows_match_later_rows() {
        let mut matcher = RosterMatcher::new(&[]);
        let first = row("Jane", "Doe", Some("jane@example.org"));
        assert_eq!(matcher.find(&first), None);

        matcher.record(&first, Uuid::from_u128(9));

        assert_eq!(
            matcher.find(&row("Doe", "Jane", None)),
            Some(Uuid::from_u128(9))
        );
    }

    #[test]
    fn test_resolves_line_time_label() {
        let line_time = LineTime {
            line_time_id: Uuid::from_u128(7),
            event_id: Uuid::from_u128(0xE0),
            label: "Saturday AM".to_string(),
            starts_at: NaiveDateTime::default(),
            capacity: Some(20),
            created_at: NaiveDateTime::default(),
        };
        let line_times = vec![LineTimeWithLanes {
            line_time,
            lanes: Vec::new(),
        }];

        assert_eq!(
            resolve_line_time(&line_times, " saturday am "),
            Some(Uuid::from_u128(7))
        );
        assert_eq!(resolve_line_time(&line_times, "Sunday"), None);
    }

    #[test]
    fn test_registration_clock_keeps_roster_order() {
        let mut clock = RegistrationClock::starting_at(NaiveDateTime::default());
        // Ids sort against roster order, so only created_at can keep it.
        let mut rows: Vec<(NaiveDateTime, Uuid, &str)> = ["Ada", "Ben", "Cy", "Dee"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| (clock.tick(), Uuid::from_u128(100 - i as u128), name))
            .collect();

        assert!(rows.windows(2).all(|pair| pair[0].0 < pair[1].0));

        rows.sort_by_key(|(created_at, id, _)| (*created_at, *id));
        let names: Vec<&str> = rows.iter().map(|(_, _, name)| *name).collect();
        assert_eq!(names, ["Ada", "Ben", "Cy", "Dee"]);
    }
}
