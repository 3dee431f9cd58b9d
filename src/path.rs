//! Path extraction: walk a result's back pointers into an ordered list
//! of legs, for both the round-indexed scalar store and the arena-indexed
//! multi-criteria store.

use crate::model::{StopId, Time};
use crate::state::{Leg, MultiCriteriaState, ScalarState};

/// One leg of a reconstructed journey, in board/alight order after the walk
/// is reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyLeg {
    pub stop: StopId,
    pub arrival: Time,
    pub leg: Leg,
}

/// Walks a scalar store backward from `(arrival_round, arrival_stop)` to the
/// access leg that started the journey, returning legs in travel order.
///
/// Panics if `(arrival_round, arrival_stop)` has no recorded label — callers
/// must only pass coordinates taken from the store's own `set` calls or from
/// a destination arrival's `round`/`egress_stop` fields.
pub fn extract_scalar_path(state: &ScalarState, arrival_round: usize, arrival_stop: StopId) -> Vec<JourneyLeg> {
    let mut legs = Vec::new();
    let mut round = arrival_round;
    let mut stop = arrival_stop;

    loop {
        let label = state
            .get(round, stop)
            .expect("path walk reached a (round, stop) with no recorded label");
        legs.push(JourneyLeg {
            stop,
            arrival: label.arrival,
            leg: label.leg,
        });
        match label.leg.predecessor() {
            Some(prev_stop) => {
                round = label.pred_round;
                stop = prev_stop;
            }
            None => break,
        }
    }

    legs.reverse();
    legs
}

/// Walks a multi-criteria store's arena backward from `idx` to its root
/// label. `arrival_of` pulls an arrival time out of the store's opaque
/// criteria type for display; the walk itself only needs `parent` links.
pub fn extract_multi_criteria_path<T: Clone>(
    state: &MultiCriteriaState<T>,
    mut idx: u32,
    arrival_of: impl Fn(&T) -> Time,
) -> Vec<JourneyLeg> {
    let mut legs = Vec::new();

    loop {
        let stop = state.stop_of(idx);
        let arrival = arrival_of(state.criteria(idx));
        let leg = *state.leg(idx);
        legs.push(JourneyLeg { stop, arrival, leg });
        match state.parent(idx) {
            Some(parent) => idx = parent,
            None => break,
        }
    }

    legs.reverse();
    legs
}
