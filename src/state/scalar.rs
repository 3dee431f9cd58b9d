//! Scalar stop-arrival store: one label per (round, stop), used by the
//! earliest-arrival `STANDARD` and `STANDARD_REVERSE` profiles.

use hashbrown::HashMap;

use super::Leg;
use crate::model::{StopId, Time};

/// One round's best arrival at a stop, plus the leg that produced it and the
/// round its predecessor stop should be looked up in.
#[derive(Debug, Clone, Copy)]
pub struct ScalarLabel {
    pub arrival: Time,
    pub leg: Leg,
    pub pred_round: usize,
}

/// A sparse `[round][stop] -> ScalarLabel` table. Sparse because most stops
/// are never touched in a given round; a dense `Vec<Vec<Time>>` would also
/// lose the leg bookkeeping a path walk needs.
#[derive(Debug, Default)]
pub struct ScalarState {
    rounds: Vec<HashMap<StopId, ScalarLabel>>,
}

impl ScalarState {
    pub fn new() -> Self {
        Self { rounds: Vec::new() }
    }

    fn ensure_round(&mut self, round: usize) {
        while self.rounds.len() <= round {
            self.rounds.push(HashMap::new());
        }
    }

    pub fn set(&mut self, round: usize, stop: StopId, label: ScalarLabel) {
        self.ensure_round(round);
        self.rounds[round].insert(stop, label);
    }

    pub fn get(&self, round: usize, stop: StopId) -> Option<&ScalarLabel> {
        self.rounds.get(round).and_then(|m| m.get(&stop))
    }

    pub fn rounds_recorded(&self) -> usize {
        self.rounds.len()
    }

    pub fn clear(&mut self) {
        self.rounds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TripRef;

    #[test]
    fn labels_are_retrievable_by_round_and_stop() {
        let mut state = ScalarState::new();
        state.set(
            1,
            7,
            ScalarLabel {
                arrival: 500,
                leg: Leg::Transit {
                    board_stop: 3,
                    trip: TripRef {
                        pattern: 0,
                        trip_index: 2,
                    },
                },
                pred_round: 0,
            },
        );
        let label = state.get(1, 7).unwrap();
        assert_eq!(label.arrival, 500);
        assert_eq!(label.leg.predecessor(), Some(3));
        assert!(state.get(1, 8).is_none());
        assert!(state.get(0, 7).is_none());
    }

    #[test]
    fn access_leg_has_no_predecessor() {
        let mut state = ScalarState::new();
        state.set(
            0,
            2,
            ScalarLabel {
                arrival: 100,
                leg: Leg::Access { duration: 100 },
                pred_round: 0,
            },
        );
        assert_eq!(state.get(0, 2).unwrap().leg.predecessor(), None);
    }

    #[test]
    fn rounds_recorded_tracks_highest_round_used() {
        let mut state = ScalarState::new();
        assert_eq!(state.rounds_recorded(), 0);
        state.set(
            2,
            0,
            ScalarLabel {
                arrival: 10,
                leg: Leg::Access { duration: 10 },
                pred_round: 0,
            },
        );
        assert_eq!(state.rounds_recorded(), 3);
    }

    #[test]
    fn clear_empties_all_rounds() {
        let mut state = ScalarState::new();
        state.set(
            0,
            0,
            ScalarLabel {
                arrival: 10,
                leg: Leg::Access { duration: 10 },
                pred_round: 0,
            },
        );
        state.clear();
        assert_eq!(state.rounds_recorded(), 0);
    }
}
