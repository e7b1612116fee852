use std::collections::BTreeMap;

use uuid::Uuid;

use crate::dto::event::{LaneOccupancy, LineTimeOccupancy};
use crate::models::{LaneSlot, LineTimeWithLanes, Participant};

/// Remaining units per lane number, then per slot. `BTreeMap` keeps both
/// levels in ascending order, which is the order seats are handed out in.
pub type LaneGrid = BTreeMap<i32, BTreeMap<LaneSlot, u32>>;

/// A seat inside a line-time's lane grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanePosition {
    pub lane_number: i32,
    pub slot: LaneSlot,
}

/// Remaining capacity for one allocation run.
///
/// Built fresh from the configured line-times at the start of a run and owned
/// by that run; the allocator only ever borrows it mutably.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityModel {
    remaining_by_line_time: BTreeMap<Uuid, u32>,
    lane_grid: BTreeMap<Uuid, LaneGrid>,
}

impl CapacityModel {
    /// Line-times that own lane maps get a lane grid and a total equal to the
    /// sum of their lanes. The others fall back to their flat `capacity`
    /// (missing or negative counts as zero) and are allocated at line-time
    /// level only.
    pub fn build(line_times: &[LineTimeWithLanes]) -> Self {
        let mut model = Self::default();

        for entry in line_times {
            let line_time_id = entry.line_time.line_time_id;

            if entry.lanes.is_empty() {
                let flat = units(entry.line_time.capacity.unwrap_or(0));
                model.remaining_by_line_time.insert(line_time_id, flat);
                continue;
            }

            let grid = model.lane_grid.entry(line_time_id).or_default();
            let mut total = 0u32;
            for lane in &entry.lanes {
                let capacity = units(lane.capacity);
                *grid
                    .entry(lane.lane_number)
                    .or_default()
                    .entry(lane.slot)
                    .or_insert(0) += capacity;
                total = total.saturating_add(capacity);
            }
            model.remaining_by_line_time.insert(line_time_id, total);
        }

        model
    }

    pub fn remaining(&self, line_time_id: Uuid) -> u32 {
        self.remaining_by_line_time
            .get(&line_time_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_remaining(&self) -> u32 {
        self.remaining_by_line_time.values().sum()
    }

    pub fn has_lane_grid(&self, line_time_id: Uuid) -> bool {
        self.lane_grid.contains_key(&line_time_id)
    }

    pub fn lane_grid(&self, line_time_id: Uuid) -> Option<&LaneGrid> {
        self.lane_grid.get(&line_time_id)
    }

    pub fn remaining_by_line_time(&self) -> &BTreeMap<Uuid, u32> {
        &self.remaining_by_line_time
    }

    /// The preferred line-time while it still has room, otherwise the one with
    /// the most room left. Equal room goes to the lowest line-time id.
    pub fn pick_line_time(&self, preferred: Option<Uuid>) -> Option<Uuid> {
        if let Some(preferred) = preferred
            && self.remaining(preferred) > 0
        {
            return Some(preferred);
        }

        let mut best: Option<(Uuid, u32)> = None;
        for (&line_time_id, &remaining) in &self.remaining_by_line_time {
            if remaining == 0 {
                continue;
            }
            match best {
                Some((_, best_remaining)) if best_remaining >= remaining => {}
                _ => best = Some((line_time_id, remaining)),
            }
        }

        best.map(|(line_time_id, _)| line_time_id)
    }

    /// Takes the first free seat walking lanes then slots in ascending order.
    /// Returns `None` when the line-time has no lane grid or the grid is full.
    pub fn take_seat(&mut self, line_time_id: Uuid) -> Option<LanePosition> {
        let grid = self.lane_grid.get_mut(&line_time_id)?;

        for (&lane_number, slots) in grid.iter_mut() {
            for (&slot, remaining) in slots.iter_mut() {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Some(LanePosition { lane_number, slot });
                }
            }
        }

        None
    }

    /// Consumes one unit of the line-time's aggregate capacity, never going
    /// below zero.
    pub fn consume(&mut self, line_time_id: Uuid) {
        if let Some(remaining) = self.remaining_by_line_time.get_mut(&line_time_id) {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// Accounts for a seat that is already held from an earlier run.
    pub fn reserve(&mut self, line_time_id: Uuid, seat: Option<LanePosition>) {
        if let Some(seat) = seat
            && let Some(remaining) = self
                .lane_grid
                .get_mut(&line_time_id)
                .and_then(|grid| grid.get_mut(&seat.lane_number))
                .and_then(|slots| slots.get_mut(&seat.slot))
        {
            *remaining = remaining.saturating_sub(1);
        }

        self.consume(line_time_id);
    }
}

fn units(capacity: i32) -> u32 {
    u32::try_from(capacity).unwrap_or(0)
}

/// The seat a participant currently holds, read back from its stored fields.
pub fn held_seat(participant: &Participant) -> Option<LanePosition> {
    let lane_number = participant.assigned_lane_number?;
    let slot = match participant.assigned_lane_slot.clone() {
        Some(letter) => LaneSlot::try_from(letter).ok()?,
        None => LaneSlot::Single,
    };

    Some(LanePosition { lane_number, slot })
}

/// Configured capacity next to current assignments, per line-time and lane.
pub fn occupancy(
    line_times: &[LineTimeWithLanes],
    participants: &[Participant],
) -> Vec<LineTimeOccupancy> {
    let configured = CapacityModel::build(line_times);

    line_times
        .iter()
        .map(|entry| {
            let line_time_id = entry.line_time.line_time_id;
            let seated: Vec<&Participant> = participants
                .iter()
                .filter(|p| p.is_assigned() && p.assigned_line_time_id == Some(line_time_id))
                .collect();

            let lanes = entry
                .lanes
                .iter()
                .map(|lane| {
                    let position = LanePosition {
                        lane_number: lane.lane_number,
                        slot: lane.slot,
                    };
                    let assigned = seated
                        .iter()
                        .filter(|p| held_seat(p) == Some(position))
                        .count() as u32;

                    LaneOccupancy {
                        lane_number: lane.lane_number,
                        slot: lane.slot,
                        capacity: units(lane.capacity),
                        assigned,
                    }
                })
                .collect();

            let capacity = configured.remaining(line_time_id);
            let assigned = seated.len() as u32;

            LineTimeOccupancy {
                line_time: entry.line_time.clone(),
                lanes,
                capacity,
                assigned,
                remaining: capacity.saturating_sub(assigned),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssignmentStatus;
    use crate::services::fixtures::{lane, line_time, participant};

    #[test]
    fn test_flat_capacity_without_lanes() {
        let lt = line_time(1, Some(12), vec![]);
        let model = CapacityModel::build(&[lt]);

        assert_eq!(model.remaining(Uuid::from_u128(1)), 12);
        assert!(!model.has_lane_grid(Uuid::from_u128(1)));
    }

    #[test]
    fn test_missing_or_negative_flat_capacity_is_zero() {
        let model = CapacityModel::build(&[
            line_time(1, None, vec![]),
            line_time(2, Some(-4), vec![]),
        ]);

        assert_eq!(model.remaining(Uuid::from_u128(1)), 0);
        assert_eq!(model.remaining(Uuid::from_u128(2)), 0);
        assert_eq!(model.total_remaining(), 0);
    }

    #[test]
    fn test_lane_maps_override_flat_capacity() {
        let lt = line_time(
            1,
            Some(100),
            vec![
                lane(1, 1, LaneSlot::A, 1),
                lane(1, 1, LaneSlot::B, 1),
                lane(1, 2, LaneSlot::Single, 2),
            ],
        );
        let model = CapacityModel::build(&[lt]);
        let id = Uuid::from_u128(1);

        assert_eq!(model.remaining(id), 4);
        let grid = model.lane_grid(id).unwrap();
        assert_eq!(grid[&1][&LaneSlot::A], 1);
        assert_eq!(grid[&1][&LaneSlot::B], 1);
        assert_eq!(grid[&2][&LaneSlot::Single], 2);
    }

    #[test]
    fn test_pick_prefers_preferred_with_room() {
        let model = CapacityModel::build(&[
            line_time(1, Some(1), vec![]),
            line_time(2, Some(9), vec![]),
        ]);

        assert_eq!(
            model.pick_line_time(Some(Uuid::from_u128(1))),
            Some(Uuid::from_u128(1))
        );
        assert_eq!(model.pick_line_time(None), Some(Uuid::from_u128(2)));
    }

    #[test]
    fn test_pick_breaks_ties_by_lowest_id() {
        let model = CapacityModel::build(&[
            line_time(3, Some(5), vec![]),
            line_time(2, Some(5), vec![]),
            line_time(4, Some(1), vec![]),
        ]);

        assert_eq!(model.pick_line_time(None), Some(Uuid::from_u128(2)));
    }

    #[test]
    fn test_pick_returns_none_when_full() {
        let model = CapacityModel::build(&[line_time(1, Some(0), vec![])]);
        assert_eq!(model.pick_line_time(Some(Uuid::from_u128(1))), None);
    }

    #[test]
    fn test_take_seat_walks_lanes_then_slots() {
        let lt = line_time(
            1,
            None,
            vec![
                lane(1, 2, LaneSlot::A, 1),
                lane(1, 1, LaneSlot::B, 1),
                lane(1, 1, LaneSlot::A, 1),
            ],
        );
        let mut model = CapacityModel::build(&[lt]);
        let id = Uuid::from_u128(1);

        let seats: Vec<_> = std::iter::from_fn(|| model.take_seat(id)).collect();
        assert_eq!(
            seats,
            vec![
                LanePosition { lane_number: 1, slot: LaneSlot::A },
                LanePosition { lane_number: 1, slot: LaneSlot::B },
                LanePosition { lane_number: 2, slot: LaneSlot::A },
            ]
        );
    }

    #[test]
    fn test_consume_floors_at_zero() {
        let mut model = CapacityModel::build(&[line_time(1, Some(1), vec![])]);
        let id = Uuid::from_u128(1);

        model.consume(id);
        model.consume(id);
        assert_eq!(model.remaining(id), 0);
    }

    #[test]
    fn test_reserve_holds_existing_seat() {
        let lt = line_time(
            1,
            None,
            vec![lane(1, 1, LaneSlot::Single, 1), lane(1, 2, LaneSlot::Single, 1)],
        );
        let mut model = CapacityModel::build(&[lt]);
        let id = Uuid::from_u128(1);

        model.reserve(
            id,
            Some(LanePosition {
                lane_number: 1,
                slot: LaneSlot::Single,
            }),
        );

        assert_eq!(model.remaining(id), 1);
        assert_eq!(
            model.take_seat(id),
            Some(LanePosition {
                lane_number: 2,
                slot: LaneSlot::Single
            })
        );
    }

    #[test]
    fn test_held_seat_reads_participant_fields() {
        let mut p = participant(1, 0, None);
        assert_eq!(held_seat(&p), None);

        p.assigned_lane_number = Some(4);
        assert_eq!(
            held_seat(&p),
            Some(LanePosition {
                lane_number: 4,
                slot: LaneSlot::Single
            })
        );

        p.assigned_lane_slot = Some("C".to_string());
        assert_eq!(
            held_seat(&p),
            Some(LanePosition {
                lane_number: 4,
                slot: LaneSlot::C
            })
        );
    }

    #[test]
    fn test_occupancy_counts_assigned_participants() {
        let lt = line_time(
            1,
            None,
            vec![lane(1, 1, LaneSlot::A, 1), lane(1, 1, LaneSlot::B, 1)],
        );
        let mut seated = participant(10, 0, None);
        seated.assignment_status = AssignmentStatus::Assigned;
        seated.assigned_line_time_id = Some(Uuid::from_u128(1));
        seated.assigned_lane_number = Some(1);
        seated.assigned_lane_slot = Some("B".to_string());
        let waiting = participant(11, 1, None);

        let report = occupancy(&[lt], &[seated, waiting]);

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].capacity, 2);
        assert_eq!(report[0].assigned, 1);
        assert_eq!(report[0].remaining, 1);
        assert_eq!(report[0].lanes[0].assigned, 0);
        assert_eq!(report[0].lanes[1].assigned, 1);
    }
}
