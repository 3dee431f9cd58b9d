//! Core value types for the transit network.

use thiserror::Error;

/// Seconds since epoch or since midnight — the calculator treats both the
/// same way. Signed so the reverse calculator's `unreached()`
/// sentinel (`Time::MIN`) and its subtractive arithmetic are representable.
pub type Time = i64;

/// Index into the provider's stop table, `[0, num_stops)`.
pub type StopId = usize;

/// Index into the provider's pattern table.
pub type PatternId = usize;

/// Index of a trip schedule within its pattern.
pub type TripIndex = usize;

/// Opaque calendar key consulted only through `is_trip_running`.
pub type ServiceCode = u32;

/// A boarded/alighted trip, identified by the pattern it belongs to and its
/// position within that pattern's trip table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripRef {
    pub pattern: PatternId,
    pub trip_index: TripIndex,
}

/// Arrival/departure pair at one stop position of one trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTime {
    pub arrival: Time,
    pub departure: Time,
}

/// One scheduled run of a pattern.
///
/// `times[pos]` covers every stop position of the owning pattern; the
/// sequence must be monotonically non-decreasing (`arrivals[pos] <=
/// departures[pos] <= arrivals[pos + 1]`), and across trips of the same
/// pattern, `departures[pos]` must be non-decreasing in trip index (FIFO).
/// Both invariants are checked by `Pattern::validate`.
#[derive(Debug, Clone)]
pub struct TripSchedule {
    pub service_code: ServiceCode,
    pub times: Vec<StopTime>,
}

impl TripSchedule {
    pub fn arrival(&self, pos: usize) -> Time {
        self.times[pos].arrival
    }

    pub fn departure(&self, pos: usize) -> Time {
        self.times[pos].departure
    }
}

/// An immutable tuple of stop positions and the trip schedules that run
/// along them. Patterns never change after a provider is built;
/// the worker only ever reads them.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Ordered stop positions, length >= 2.
    pub stops: Vec<StopId>,
    /// FIFO-ordered trip schedules, each covering every stop position.
    pub trips: Vec<TripSchedule>,
}

/// Why `Pattern::validate` rejected a pattern — surfaces as a contained
/// `DataInconsistency`, never a panic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternValidationError {
    #[error("pattern has fewer than two stop positions")]
    TooFewStops,
    #[error("trip {trip} has {actual} stop times, expected {expected}")]
    WrongStopTimeCount {
        trip: TripIndex,
        actual: usize,
        expected: usize,
    },
    #[error("trip {trip} at position {pos}: arrival {arrival} is after departure {departure}")]
    ArrivalAfterDeparture {
        trip: TripIndex,
        pos: usize,
        arrival: Time,
        departure: Time,
    },
    #[error("trip {trip} at position {pos}: departure {departure} is after next arrival {next_arrival}")]
    NonMonotonePositions {
        trip: TripIndex,
        pos: usize,
        departure: Time,
        next_arrival: Time,
    },
    #[error(
        "trips {earlier} and {later} at position {pos} violate FIFO ordering ({earlier_departure} > {later_departure})"
    )]
    NotFifo {
        earlier: TripIndex,
        later: TripIndex,
        pos: usize,
        earlier_departure: Time,
        later_departure: Time,
    },
}

impl Pattern {
    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }

    pub fn stop_at(&self, pos: usize) -> StopId {
        self.stops[pos]
    }

    pub fn trip(&self, idx: TripIndex) -> &TripSchedule {
        &self.trips[idx]
    }

    /// Checks the two structural invariants a pattern must hold: each
    /// trip's own times are non-decreasing across positions, and trips are
    /// FIFO-ordered at every fixed position. Called once per pattern at
    /// provider construction time.
    pub fn validate(&self) -> Result<(), PatternValidationError> {
        let num_stops = self.num_stops();
        if num_stops < 2 {
            return Err(PatternValidationError::TooFewStops);
        }

        for (trip_idx, trip) in self.trips.iter().enumerate() {
            if trip.times.len() != num_stops {
                return Err(PatternValidationError::WrongStopTimeCount {
                    trip: trip_idx,
                    actual: trip.times.len(),
                    expected: num_stops,
                });
            }
            for pos in 0..num_stops {
                let st = trip.times[pos];
                if st.arrival > st.departure {
                    return Err(PatternValidationError::ArrivalAfterDeparture {
                        trip: trip_idx,
                        pos,
                        arrival: st.arrival,
                        departure: st.departure,
                    });
                }
                if pos + 1 < num_stops && st.departure > trip.times[pos + 1].arrival {
                    return Err(PatternValidationError::NonMonotonePositions {
                        trip: trip_idx,
                        pos,
                        departure: st.departure,
                        next_arrival: trip.times[pos + 1].arrival,
                    });
                }
            }
        }

        for pos in 0..num_stops {
            for idx in 1..self.trips.len() {
                let earlier_departure = self.trips[idx - 1].times[pos].departure;
                let later_departure = self.trips[idx].times[pos].departure;
                if earlier_departure > later_departure {
                    return Err(PatternValidationError::NotFifo {
                        earlier: idx - 1,
                        later: idx,
                        pos,
                        earlier_departure,
                        later_departure,
                    });
                }
            }
        }

        Ok(())
    }
}

/// A non-transitive foot connection between two transit stops, keyed by its
/// origin stop in the provider's transfer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLeg {
    pub to_stop: StopId,
    pub duration: Time,
}

/// An access or egress leg; the core is agnostic to the mode it represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessLeg {
    pub stop: StopId,
    pub duration: Time,
}
