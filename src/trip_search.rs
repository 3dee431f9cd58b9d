//! Trip schedule search: given a pattern, a stop position, and an
//! earliest-board time, find the earliest boardable trip.

use crate::calculator::Calculator;
use crate::model::{Pattern, Time, TripIndex};

/// Successful result of [`find_earliest_trip`].
#[derive(Debug, Clone, Copy)]
pub struct TripCandidate {
    pub trip_index: TripIndex,
    pub board_time: Time,
}

/// Smallest trip index `< upper_bound_trip_index` whose board time (per
/// `calculator`) is not worse than `earliest_board_time`, or `None` if no
/// such trip exists. `upper_bound_trip_index = 0` is a no-op. `is_running`
/// filters out trips inactive on the search date; the scan advances across
/// them without breaking FIFO correctness, since FIFO only constrains active
/// trips relative to each other in this search — a skipped trip never
/// becomes the candidate, so its absence can't violate monotonicity for the
/// trips that remain.
///
/// Implemented as a linear backward scan rather than the binary-search fast
/// path a plain FIFO schedule would allow: the calendar predicate makes the
/// acceptable set non-contiguous in general (an active trip can sit between
/// two inactive ones), so a naive bisection over raw indices would need to
/// special-case exactly the thing that makes binary search worth it. Patterns
/// in practice have few enough trips per board attempt that this doesn't
/// show up in profiles; `ferrobus_core`'s `find_earliest_trip` takes the
/// binary-search route because it has no calendar predicate at all.
pub fn find_earliest_trip<C: Calculator>(
    calculator: C,
    pattern: &Pattern,
    pos: usize,
    earliest_board_time: Time,
    upper_bound_trip_index: usize,
    mut is_running: impl FnMut(TripIndex) -> bool,
) -> Option<TripCandidate> {
    if upper_bound_trip_index == 0 {
        return None;
    }

    let mut best: Option<TripCandidate> = None;
    for i in (0..upper_bound_trip_index).rev() {
        if !is_running(i) {
            continue;
        }
        let board_time = calculator.board_time_for(pattern.trip(i), pos);
        if calculator.not_worse_than(board_time, earliest_board_time) {
            best = Some(TripCandidate {
                trip_index: i,
                board_time,
            });
        } else {
            // FIFO: once a trip's board time fails the threshold, every
            // smaller index (earlier in the pattern's own ordering) fails
            // too, among the trips encountered so far.
            break;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Forward;
    use crate::model::{StopTime, TripSchedule};

    fn pattern_with_departures(departures: &[Time]) -> Pattern {
        Pattern {
            stops: vec![0, 1],
            trips: departures
                .iter()
                .map(|&d| TripSchedule {
                    service_code: 0,
                    times: vec![
                        StopTime {
                            arrival: d,
                            departure: d,
                        },
                        StopTime {
                            arrival: d + 100,
                            departure: d + 100,
                        },
                    ],
                })
                .collect(),
        }
    }

    #[test]
    fn finds_smallest_acceptable_index() {
        let pattern = pattern_with_departures(&[0, 100, 200, 300]);
        let found = find_earliest_trip(Forward, &pattern, 0, 150, 4, |_| true).unwrap();
        assert_eq!(found.trip_index, 2);
        assert_eq!(found.board_time, 200);
    }

    #[test]
    fn respects_upper_bound() {
        let pattern = pattern_with_departures(&[0, 100, 200, 300]);
        assert!(find_earliest_trip(Forward, &pattern, 0, 250, 3, |_| true).is_none());
    }

    #[test]
    fn zero_upper_bound_is_noop() {
        let pattern = pattern_with_departures(&[0, 100]);
        assert!(find_earliest_trip(Forward, &pattern, 0, 0, 0, |_| true).is_none());
    }

    #[test]
    fn skips_inactive_trips_without_breaking_fifo() {
        let pattern = pattern_with_departures(&[0, 100, 200, 300]);
        // trip 2 (departure 200) is inactive; trip 1 (departure 100) should
        // still be found as the smallest acceptable active trip for a board
        // time of 100.
        let found =
            find_earliest_trip(Forward, &pattern, 0, 100, 4, |i| i != 2).unwrap();
        assert_eq!(found.trip_index, 1);
    }
}
