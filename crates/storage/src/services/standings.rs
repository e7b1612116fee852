use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::standings::StandingEntry;
use crate::error::Result;
use crate::repository::score::{PeriodScoreRow, ScoreRepository};

/// Cumulative standings for an event from its stored score totals.
pub async fn event_standings(pool: &PgPool, event_id: Uuid) -> Result<Vec<StandingEntry>> {
    let rows = ScoreRepository::new(pool)
        .period_scores_for_event(event_id)
        .await?;

    Ok(build_standings(&rows))
}

/// Folds per-period rows into one line per participant, ordered by total
/// then X count, with tied lines sharing a rank.
pub fn build_standings(rows: &[PeriodScoreRow]) -> Vec<StandingEntry> {
    let mut by_participant: BTreeMap<Uuid, StandingEntry> = BTreeMap::new();

    for row in rows {
        let entry = by_participant
            .entry(row.participant_id)
            .or_insert_with(|| StandingEntry {
                rank: 0,
                participant_id: row.participant_id,
                first_name: row.first_name.clone(),
                last_name: row.last_name.clone(),
                division: row.division.clone(),
                periods_shot: 0,
                total_score: 0,
                x_count: 0,
                best_period_score: 0,
                average_score: Decimal::ZERO,
            });

        entry.periods_shot += 1;
        entry.total_score += i64::from(row.total_score);
        entry.x_count += i64::from(row.x_count);
        entry.best_period_score = entry.best_period_score.max(row.total_score);
    }

    let mut standings: Vec<StandingEntry> = by_participant
        .into_values()
        .map(|mut entry| {
            if entry.periods_shot > 0 {
                entry.average_score = (Decimal::from(entry.total_score)
                    / Decimal::from(entry.periods_shot))
                .round_dp(2);
            }
            entry
        })
        .collect();

    standings.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| b.x_count.cmp(&a.x_count))
            .then_with(|| a.last_name.to_lowercase().cmp(&b.last_name.to_lowercase()))
            .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });

    let mut previous: Option<(i64, i64)> = None;
    let mut rank = 0u32;
    for (position, entry) in standings.iter_mut().enumerate() {
        let key = (entry.total_score, entry.x_count);
        if previous != Some(key) {
            rank = position as u32 + 1;
            previous = Some(key);
        }
        entry.rank = rank;
    }

    standings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u128, last_name: &str, total_score: i32, x_count: i32) -> PeriodScoreRow {
        PeriodScoreRow {
            participant_id: Uuid::from_u128(id),
            first_name: "Pat".to_string(),
            last_name: last_name.to_string(),
            division: Some("Recurve".to_string()),
            total_score,
            x_count,
        }
    }

    #[test]
    fn test_weeks_accumulate_per_participant() {
        let rows = vec![
            row(1, "Archer", 250, 4),
            row(1, "Archer", 270, 6),
            row(2, "Bowman", 280, 2),
        ];

        let standings = build_standings(&rows);

        assert_eq!(standings.len(), 2);
        let first = &standings[0];
        assert_eq!(first.participant_id, Uuid::from_u128(1));
        assert_eq!(first.periods_shot, 2);
        assert_eq!(first.total_score, 520);
        assert_eq!(first.x_count, 10);
        assert_eq!(first.best_period_score, 270);
        assert_eq!(first.average_score, Decimal::from(260));
        assert_eq!(first.rank, 1);
        assert_eq!(standings[1].rank, 2);
    }

    #[test]
    fn test_x_count_breaks_total_ties() {
        let rows = vec![row(1, "Archer", 290, 3), row(2, "Bowman", 290, 7)];

        let standings = build_standings(&rows);

        assert_eq!(standings[0].participant_id, Uuid::from_u128(2));
        assert_eq!(standings[0].rank, 1);
        assert_eq!(standings[1].rank, 2);
    }

    #[test]
    fn test_full_ties_share_rank() {
        let rows = vec![
            row(1, "Zimmer", 290, 5),
            row(2, "Adams", 290, 5),
            row(3, "Moss", 100, 0),
        ];

        let standings = build_standings(&rows);

        assert_eq!(standings[0].last_name, "Adams");
        assert_eq!(standings[0].rank, 1);
        assert_eq!(standings[1].rank, 1);
        assert_eq!(standings[2].rank, 3);
    }

    #[test]
    fn test_average_rounds_to_two_places() {
        let rows = vec![
            row(1, "Archer", 100, 0),
            row(1, "Archer", 100, 0),
            row(1, "Archer", 101, 0),
        ];

        let standings = build_standings(&rows);

        assert_eq!(standings[0].average_score, Decimal::new(10033, 2));
    }

    #[test]
    fn test_no_scores_no_standings() {
        assert!(build_standings(&[]).is_empty());
    }
}
