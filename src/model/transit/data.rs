//! Read-only transit data provider.
//!
//! Grounded on `ferrobus_core`'s `PublicTransitData`: a flat, CSR-style
//! table of routes/stop-times rather than a graph of owned objects, so a
//! shared `&TransitDataProvider` can serve many concurrent Raptor workers
//! without locks. GTFS/OSM loading into this shape is a host
//! concern; `InMemoryTransitData` here is the one concrete
//! implementation the core ships, built directly from `Pattern`s for tests
//! and benchmarks.

use chrono::NaiveDate;
use hashbrown::HashMap;
use log::warn;

use super::types::{AccessLeg, Pattern, PatternId, ServiceCode, StopId, TransferLeg, TripRef};
use crate::error::RaptorError;

/// Read-only facade over the transit network.
///
/// Implementations must be safe for concurrent readers: many Raptor workers
/// may run in parallel against one shared provider.
pub trait TransitDataProvider {
    /// Total number of stops, `[0, num_stops())`.
    fn num_stops(&self) -> usize;

    /// Every pattern serving at least one of `stops`, each yielded once,
    /// positioned at the earliest stop-position among `stops` that it
    /// serves. Patterns rejected by `Pattern::validate` at construction time
    /// are never yielded. Order among patterns is unspecified. An empty
    /// `stops` slice yields nothing.
    fn patterns_touching(&self, stops: &[StopId]) -> Vec<(PatternId, usize)>;

    /// Transfer legs leaving `stop`, possibly empty.
    fn transfers_from(&self, stop: StopId) -> &[TransferLeg];

    /// The pattern itself, for calculator-driven stop/trip arithmetic.
    fn pattern(&self, id: PatternId) -> &Pattern;

    /// Pure calendar hook; no side effects. Trips whose service code is
    /// absent from the provider's calendar are treated as always running —
    /// fixtures with no calendar data don't need to special-case every trip.
    fn is_trip_running(&self, trip: TripRef, date: NaiveDate) -> bool;
}

/// An in-memory, CSR-flavored [`TransitDataProvider`].
///
/// `stop_patterns[stop]` is precomputed once at construction (mirroring
/// `ferrobus_core`'s `stop_routes` table) so `patterns_touching` never
/// rescans the whole pattern set.
pub struct InMemoryTransitData {
    patterns: Vec<Pattern>,
    stop_patterns: Vec<Vec<(PatternId, usize)>>,
    transfers: Vec<Vec<TransferLeg>>,
    num_stops: usize,
    calendar: HashMap<ServiceCode, HashMap<NaiveDate, bool>>,
    /// Patterns that failed `Pattern::validate` at construction. Excluded
    /// from `patterns_touching`, never panicked on. Inconsistent data is
    /// contained here rather than at scan time, since this provider
    /// validates eagerly at load.
    poisoned: Vec<bool>,
}

impl InMemoryTransitData {
    /// Builds a provider from `patterns` and a `transfers[stop]` table.
    /// Patterns that violate the FIFO/monotonicity invariants are logged
    /// once and excluded from routing rather than aborting construction.
    pub fn new(
        num_stops: usize,
        patterns: Vec<Pattern>,
        transfers: Vec<Vec<TransferLeg>>,
    ) -> Result<Self, RaptorError> {
        if transfers.len() != num_stops {
            return Err(RaptorError::InvalidStop);
        }

        let mut poisoned = vec![false; patterns.len()];
        for (idx, pattern) in patterns.iter().enumerate() {
            if let Err(e) = pattern.validate() {
                warn!("pattern {idx} failed validation and will be skipped: {e}");
                poisoned[idx] = true;
            }
        }

        let mut stop_patterns = vec![Vec::new(); num_stops];
        for (pattern_id, pattern) in patterns.iter().enumerate() {
            if poisoned[pattern_id] {
                continue;
            }
            for (pos, &stop) in pattern.stops.iter().enumerate() {
                if stop >= num_stops {
                    return Err(RaptorError::InvalidStop);
                }
                stop_patterns[stop].push((pattern_id, pos));
            }
        }

        Ok(Self {
            patterns,
            stop_patterns,
            transfers,
            num_stops,
            calendar: HashMap::new(),
            poisoned,
        })
    }

    /// Registers an explicit active/inactive override for `service_code` on
    /// `date`. Absent overrides default to "running" in `is_trip_running`.
    pub fn set_service_active(&mut self, service_code: ServiceCode, date: NaiveDate, active: bool) {
        self.calendar
            .entry(service_code)
            .or_default()
            .insert(date, active);
    }

    /// Whether `pattern` was rejected at construction and is excluded from
    /// routing (used by tests asserting the containment behavior around
    /// inconsistent data).
    pub fn is_poisoned(&self, pattern: PatternId) -> bool {
        self.poisoned.get(pattern).copied().unwrap_or(true)
    }
}

impl TransitDataProvider for InMemoryTransitData {
    fn num_stops(&self) -> usize {
        self.num_stops
    }

    fn patterns_touching(&self, stops: &[StopId]) -> Vec<(PatternId, usize)> {
        if stops.is_empty() {
            return Vec::new();
        }
        // Dedup patterns, keeping the earliest touched position, the way
        // ferrobus_core::routing::raptor::common::state::create_route_queue
        // builds its route queue from marked stops.
        let mut best_pos: HashMap<PatternId, usize> = HashMap::new();
        for &stop in stops {
            if stop >= self.num_stops {
                continue;
            }
            for &(pattern_id, pos) in &self.stop_patterns[stop] {
                best_pos
                    .entry(pattern_id)
                    .and_modify(|existing| *existing = (*existing).min(pos))
                    .or_insert(pos);
            }
        }
        best_pos.into_iter().collect()
    }

    fn transfers_from(&self, stop: StopId) -> &[TransferLeg] {
        self.transfers
            .get(stop)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id]
    }

    fn is_trip_running(&self, trip: TripRef, date: NaiveDate) -> bool {
        let Some(pattern) = self.patterns.get(trip.pattern) else {
            return false;
        };
        let Some(schedule) = pattern.trips.get(trip.trip_index) else {
            return false;
        };
        self.calendar
            .get(&schedule.service_code)
            .and_then(|dates| dates.get(&date))
            .copied()
            .unwrap_or(true)
    }
}

/// Validates the access/egress leg shape shared by both kinds of non-transit
/// connection.
pub fn validate_legs(legs: &[AccessLeg], num_stops: usize) -> Result<(), RaptorError> {
    for leg in legs {
        if leg.stop >= num_stops {
            return Err(RaptorError::InvalidStop);
        }
    }
    Ok(())
}
