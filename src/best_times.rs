//! Best-times index: per-stop best arrival time, best arrival-by-transit
//! time, and the touched-stop bitsets that drive which patterns get rescanned.

use fixedbitset::FixedBitSet;

use crate::calculator::Calculator;
use crate::model::{StopId, Time};

/// Two parallel `unreached()`-initialized time arrays plus the four bitsets
/// that drive which stops get rescanned. Owned exclusively by one worker for
/// the duration of one request — never shared, never locked.
pub struct BestTimes {
    best_overall: Vec<Time>,
    best_transit: Vec<Time>,
    /// `best_overall` as of the end of the previous round, frozen by
    /// `prepare_for_next_round()`. Boarding decisions read this rather than
    /// the live array so a pattern's alight earlier in the same round can't
    /// leak into another pattern's boarding check within that same round.
    board_snapshot: Vec<Time>,
    touched_transit_current_round: FixedBitSet,
    touched_overall_last_round: FixedBitSet,
    touched_overall_current_round: FixedBitSet,
    reached_by_access: FixedBitSet,
    unreached: Time,
}

impl BestTimes {
    pub fn new<C: Calculator>(calculator: C, num_stops: usize) -> Self {
        let unreached = calculator.unreached();
        Self {
            best_overall: vec![unreached; num_stops],
            best_transit: vec![unreached; num_stops],
            board_snapshot: vec![unreached; num_stops],
            touched_transit_current_round: FixedBitSet::with_capacity(num_stops),
            touched_overall_last_round: FixedBitSet::with_capacity(num_stops),
            touched_overall_current_round: FixedBitSet::with_capacity(num_stops),
            reached_by_access: FixedBitSet::with_capacity(num_stops),
            unreached,
        }
    }

    pub fn best_overall(&self, stop: StopId) -> Time {
        self.best_overall[stop]
    }

    pub fn best_transit(&self, stop: StopId) -> Time {
        self.best_transit[stop]
    }

    pub fn is_reached(&self, stop: StopId) -> bool {
        self.best_overall[stop] != self.unreached
    }

    pub fn is_reached_by_access(&self, stop: StopId) -> bool {
        self.reached_by_access[stop]
    }

    pub fn touched_transit_current_round(&self) -> &FixedBitSet {
        &self.touched_transit_current_round
    }

    pub fn touched_overall_last_round(&self) -> &FixedBitSet {
        &self.touched_overall_last_round
    }

    /// `best_overall[stop]` as of the end of the previous round. This is
    /// what boarding decisions must use, never the live `best_overall`.
    pub fn best_overall_for_boarding(&self, stop: StopId) -> Time {
        self.board_snapshot[stop]
    }

    pub fn set_access_stop(&mut self, stop: StopId, t: Time) {
        self.best_overall[stop] = t;
        self.reached_by_access.set(stop, true);
        self.touched_overall_current_round.set(stop, true);
    }

    /// Updates `best_overall[stop]` if `t` strictly improves it. Returns
    /// whether an update happened.
    pub fn update_overall<C: Calculator>(&mut self, calculator: C, stop: StopId, t: Time) -> bool {
        if calculator.is_better(t, self.best_overall[stop]) {
            self.best_overall[stop] = t;
            self.touched_overall_current_round.set(stop, true);
            true
        } else {
            false
        }
    }

    /// Updates `best_transit[stop]` if `t` strictly improves it. Returns
    /// whether an update happened.
    pub fn update_transit<C: Calculator>(&mut self, calculator: C, stop: StopId, t: Time) -> bool {
        if calculator.is_better(t, self.best_transit[stop]) {
            self.best_transit[stop] = t;
            self.touched_transit_current_round.set(stop, true);
            true
        } else {
            false
        }
    }

    /// Resets everything at the start of a new Raptor iteration (departure
    /// minute). Destination arrivals are untouched — they persist across
    /// iterations.
    pub fn prepare_for_new_iteration(&mut self) {
        self.best_overall.fill(self.unreached);
        self.best_transit.fill(self.unreached);
        self.board_snapshot.fill(self.unreached);
        self.touched_transit_current_round.clear();
        self.touched_overall_last_round.clear();
        self.touched_overall_current_round.clear();
        self.reached_by_access.clear();
    }

    /// Rolls the per-round touched sets forward: what was touched this round
    /// becomes "last round" for the next round's pattern scan. Also freezes
    /// `board_snapshot` at the current `best_overall` values before the new
    /// round's alights can change them, enforcing round separation for
    /// boarding decisions.
    pub fn prepare_for_next_round(&mut self) {
        self.board_snapshot.copy_from_slice(&self.best_overall);
        std::mem::swap(
            &mut self.touched_overall_last_round,
            &mut self.touched_overall_current_round,
        );
        self.touched_overall_current_round.clear();
        self.touched_transit_current_round.clear();
    }

    pub fn is_current_round_updated(&self) -> bool {
        self.touched_transit_current_round.count_ones(..) > 0
            || self.touched_overall_current_round.count_ones(..) > 0
    }

    pub fn touched_last_round_stops(&self) -> Vec<StopId> {
        self.touched_overall_last_round.ones().collect()
    }

    /// Flags `stop` as touched without writing a value. The multi-criteria
    /// store keeps its own Pareto frontier per `(round, stop)`; it still
    /// needs these bitsets to drive which stops get rescanned next round,
    /// but has no single scalar value for `update_overall`/`update_transit`
    /// to compare against.
    pub fn mark_touched_overall(&mut self, stop: StopId) {
        self.touched_overall_current_round.set(stop, true);
    }

    pub fn mark_touched_transit(&mut self, stop: StopId) {
        self.touched_transit_current_round.set(stop, true);
    }
}
