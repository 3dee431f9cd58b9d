//! Destination arrivals: a Pareto set over egress arrivals that
//! persists across an entire Range Raptor sweep, not just one departure-time
//! iteration. The worker supplies its own dominance function per search mode
//! (see `scalar_journey_dominance`/`mc_journey_dominance` in `worker.rs`); the
//! set itself is agnostic to how many axes that function uses.

use crate::calculator::Calculator;
use crate::model::{StopId, Time};
use crate::pareto::{Dominance, InsertResult, ParetoSet};
use crate::path::JourneyLeg;

/// One candidate arrival at the destination, reached by an egress leg from
/// `egress_stop` in round `round`. `legs` is empty while an arrival is only
/// being tracked as the best-so-far for its round within one iteration; the
/// worker fills it in via `path` at `commit_iteration()` time, while the
/// stop-arrival store that produced it is still alive.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationArrival {
    pub arrival: Time,
    pub transfers: usize,
    pub egress_stop: StopId,
    pub round: usize,
    pub departure_anchor: Time,
    pub legs: Vec<JourneyLeg>,
}

/// Wraps a [`ParetoSet`] with the per-iteration bookkeeping the worker needs
/// to tell [`crate::round_tracker::RoundTracker`] when the destination was
/// reached. The underlying set itself is never cleared between iterations —
/// later departure times only ever add to or prune it, since an arrival
/// found from an earlier departure is still a valid, and still optimal,
/// itinerary for a rider departing later too.
pub struct DestinationArrivals<T> {
    set: ParetoSet<T>,
    improved_this_iteration: bool,
}

impl<T: Clone> DestinationArrivals<T> {
    pub fn new(dominance: Dominance<T>) -> Self {
        Self {
            set: ParetoSet::new(dominance),
            improved_this_iteration: false,
        }
    }

    pub fn begin_iteration(&mut self) {
        self.improved_this_iteration = false;
    }

    /// Offers one candidate arrival. Returns the underlying set's verdict so
    /// a debug channel can report ACCEPT/REJECT/DROP.
    pub fn offer(&mut self, candidate: T) -> InsertResult<T> {
        let result = self.set.insert(candidate);
        if result.was_accepted() {
            self.improved_this_iteration = true;
        }
        result
    }

    pub fn improved_this_iteration(&self) -> bool {
        self.improved_this_iteration
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.set.iter()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// The best time on the `extract` axis across all current members, or
    /// `calculator.unreached()` if the set is empty. Used to prune pattern
    /// scans once no remaining trip can beat the known destination arrival.
    pub fn best_on_axis<C: Calculator>(&self, calculator: C, extract: impl Fn(&T) -> Time) -> Time {
        self.set.iter().map(extract).fold(calculator.unreached(), |best, t| {
            if calculator.is_better(t, best) {
                t
            } else {
                best
            }
        })
    }
}
