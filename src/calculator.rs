//! The direction-abstraction layer: every time comparison and time-formation
//! in the rest of the core goes through a `Calculator`. Plain Range Raptor
//! and Reverse Range Raptor are the same code driven by the two impls
//! below.

use crate::model::{Time, TripSchedule};

/// Which way a pattern's stop positions are walked during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending stop position (plain Range Raptor).
    Forward,
    /// Descending stop position (Reverse Range Raptor).
    Backward,
}

/// Direction-agnostic time arithmetic. `Forward` and `Backward`
/// are the only implementations the core needs; no other component is
/// allowed to branch on search direction.
pub trait Calculator: Copy {
    fn direction(&self) -> Direction;

    /// `t + d` forward, `t - d` backward.
    fn add(&self, t: Time, d: Time) -> Time;

    /// `t - d` forward, `t + d` backward.
    fn sub(&self, t: Time, d: Time) -> Time;

    /// `a` is strictly preferable to `b`: `a < b` forward, `a > b` backward.
    fn is_better(&self, a: Time, b: Time) -> bool;

    /// Whether `a` is feasible against threshold `b`: `a` is not strictly
    /// worse than `b`, i.e. `a >= b` forward, `a <= b` backward. Used for
    /// board-time feasibility, not for optimality comparisons —
    /// those go through `is_better` directly.
    fn not_worse_than(&self, a: Time, b: Time) -> bool {
        !self.is_better(a, b)
    }

    fn exceeds_limit(&self, t: Time, limit: Time) -> bool;

    /// The "worst possible" time: `Time::MAX` forward, `Time::MIN` backward.
    fn unreached(&self) -> Time;

    /// The time at which a trip can be boarded at `pos`: `departures[pos]`
    /// forward, `arrivals[pos]` backward.
    fn board_time_for(&self, trip: &TripSchedule, pos: usize) -> Time;

    /// The time at which a trip can be alighted at `pos`: `arrivals[pos]`
    /// forward, `departures[pos]` backward.
    fn alight_time_for(&self, trip: &TripSchedule, pos: usize) -> Time;

    /// The earliest time boarding becomes possible after arriving/being
    /// dropped off at `prev` with `board_slack` seconds of required slack:
    /// `prev + slack` forward, `prev - slack` backward.
    fn earliest_board_time(&self, prev: Time, board_slack: Time) -> Time {
        self.add(prev, board_slack)
    }

    /// Stop positions to walk, starting from `first_touched_pos`, in this
    /// calculator's direction, over a pattern of `pattern_len` stops.
    fn walk_positions(&self, first_touched_pos: usize, pattern_len: usize) -> Vec<usize> {
        match self.direction() {
            Direction::Forward => (first_touched_pos..pattern_len).collect(),
            Direction::Backward => (0..=first_touched_pos).rev().collect(),
        }
    }
}

/// Plain Range Raptor: earliest-arrival / fewest-transfers, ascending time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Forward;

impl Calculator for Forward {
    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn add(&self, t: Time, d: Time) -> Time {
        t.saturating_add(d)
    }

    fn sub(&self, t: Time, d: Time) -> Time {
        t.saturating_sub(d)
    }

    fn is_better(&self, a: Time, b: Time) -> bool {
        a < b
    }

    fn exceeds_limit(&self, t: Time, limit: Time) -> bool {
        t > limit
    }

    fn unreached(&self) -> Time {
        Time::MAX
    }

    fn board_time_for(&self, trip: &TripSchedule, pos: usize) -> Time {
        trip.departure(pos)
    }

    fn alight_time_for(&self, trip: &TripSchedule, pos: usize) -> Time {
        trip.arrival(pos)
    }
}

/// Reverse Range Raptor: a symmetric backward search used as a heuristic
/// oracle and to serve `arrived_by` requests directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Backward;

impl Calculator for Backward {
    fn direction(&self) -> Direction {
        Direction::Backward
    }

    fn add(&self, t: Time, d: Time) -> Time {
        t.saturating_sub(d)
    }

    fn sub(&self, t: Time, d: Time) -> Time {
        t.saturating_add(d)
    }

    fn is_better(&self, a: Time, b: Time) -> bool {
        a > b
    }

    fn exceeds_limit(&self, t: Time, limit: Time) -> bool {
        t < limit
    }

    fn unreached(&self) -> Time {
        Time::MIN
    }

    fn board_time_for(&self, trip: &TripSchedule, pos: usize) -> Time {
        trip.arrival(pos)
    }

    fn alight_time_for(&self, trip: &TripSchedule, pos: usize) -> Time {
        trip.departure(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StopTime;

    fn trip() -> TripSchedule {
        TripSchedule {
            service_code: 0,
            times: vec![
                StopTime {
                    arrival: 100,
                    departure: 110,
                },
                StopTime {
                    arrival: 200,
                    departure: 210,
                },
            ],
        }
    }

    #[test]
    fn forward_prefers_earlier() {
        let calc = Forward;
        assert!(calc.is_better(5, 10));
        assert!(!calc.is_better(10, 5));
        assert_eq!(calc.add(100, 30), 130);
        assert_eq!(calc.board_time_for(&trip(), 0), 110);
        assert_eq!(calc.alight_time_for(&trip(), 1), 200);
        assert_eq!(calc.unreached(), Time::MAX);
    }

    #[test]
    fn backward_prefers_later() {
        let calc = Backward;
        assert!(calc.is_better(10, 5));
        assert!(!calc.is_better(5, 10));
        assert_eq!(calc.add(100, 30), 70);
        assert_eq!(calc.board_time_for(&trip(), 0), 100);
        assert_eq!(calc.alight_time_for(&trip(), 1), 210);
        assert_eq!(calc.unreached(), Time::MIN);
    }

    #[test]
    fn walk_positions_respect_direction() {
        assert_eq!(Forward.walk_positions(1, 4), vec![1, 2, 3]);
        assert_eq!(Backward.walk_positions(2, 4), vec![2, 1, 0]);
    }

    #[test]
    fn earliest_board_time_applies_slack_symmetrically() {
        assert_eq!(Forward.earliest_board_time(100, 60), 160);
        assert_eq!(Backward.earliest_board_time(100, 60), 40);
    }
}
