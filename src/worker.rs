//! Range Raptor worker: the top-level loop that iterates a departure
//! window, runs Raptor rounds, scans patterns, and feeds the best-times index,
//! the stop-arrival stores, and the destination arrivals set.
//!
//! Two entry points share this module's scan/transfer machinery: `run_scalar`
//! drives the `STANDARD`/`STANDARD_REVERSE` profiles with the round-indexed
//! store, `run_multi_criteria` drives `MULTI_CRITERIA`/
//! `MULTI_CRITERIA_WITH_HEURISTICS` with the arena store.

use chrono::NaiveDate;
use hashbrown::HashMap;

use crate::best_times::BestTimes;
use crate::calculator::Calculator;
use crate::debug::{DebugEvent, DebugHooks, EventSite};
use crate::destination::{DestinationArrival, DestinationArrivals};
use crate::model::{AccessLeg, StopId, Time, TransitDataProvider, TripIndex, TripRef};
use crate::pareto::{Dominance, DominanceAxis};
use crate::path::{self, JourneyLeg};
use crate::round_tracker::RoundTracker;
use crate::state::{Leg, MultiCriteriaInsert, MultiCriteriaState, ScalarLabel, ScalarState};
use crate::trip_search::find_earliest_trip;

/// Polled between iterations and rounds so a long-running search can be
/// aborted without leaving the worker's own state half-updated.
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;
}

/// The default: a search that never gets cancelled.
pub struct Never;

impl Cancellable for Never {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Per-request counters. Never a global/static — one instance per `route()`
/// call, passed in by the caller.
pub trait RaptorMetrics {
    fn round_started(&mut self) {}
    fn pattern_scanned(&mut self) {}
    fn trip_boarded(&mut self) {}
}

/// The default: counts nothing.
pub struct NoopMetrics;

impl RaptorMetrics for NoopMetrics {}

/// Departure-window and per-round bounds for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub window_start: Time,
    pub window_end: Time,
    pub departure_step: Time,
    pub board_slack: Time,
    pub time_limit: Time,
    pub round_cap: usize,
    pub extra_rounds_after_destination_reached: usize,
}

/// The fractional-reluctance cost factors for multi-criteria search,
/// converted to integer arithmetic via [`COST_PRECISION`].
#[derive(Debug, Clone, Copy)]
pub struct CostFactors {
    pub boarding_cost: i64,
    pub wait_factor: i64,
    pub transit_factor: i64,
    pub walk_factor: i64,
}

impl Default for CostFactors {
    fn default() -> Self {
        Self {
            boarding_cost: 300,
            wait_factor: 2,
            transit_factor: 1,
            walk_factor: 2,
        }
    }
}

pub const COST_PRECISION: i64 = 100;

/// Every departure minute in `[window_start, window_end]`, step
/// `departure_step`, latest first. Each minute is searched from a freshly
/// reset `BestTimes`/store, so the order doesn't affect the final
/// (Pareto-merged) result — only which minute a tie is first discovered
/// from, which this worker does not rely on for correctness since the
/// destination dominance breaks ties on departure time directly.
fn minute_sequence(params: &SearchParams) -> Vec<Time> {
    let mut minutes = Vec::new();
    let mut t = params.window_start;
    while t <= params.window_end {
        minutes.push(t);
        t += params.departure_step;
    }
    minutes.reverse();
    minutes
}

// ---------------------------------------------------------------------
// Scalar search (STANDARD / STANDARD_REVERSE)
// ---------------------------------------------------------------------

/// One fully-reconstructed scalar-search journey.
#[derive(Debug, Clone)]
pub struct ScalarJourney {
    pub arrival: Time,
    pub departure_anchor: Time,
    pub transfers: usize,
    pub legs: Vec<JourneyLeg>,
}

/// Arrival time, direction-aware via `calculator`, plus departure time in the
/// opposite sense: a journey that leaves later for the same arrival (shorter
/// wait, same outcome) dominates one that leaves earlier, which is what
/// collapses same-arrival candidates from different departure minutes down
/// to the single best one, and what keeps distinct-departure, distinct-arrival
/// candidates from a range scan as separate, non-dominated results.
fn scalar_journey_dominance<C: Calculator + Send + Sync + 'static>(calculator: C) -> Dominance<ScalarJourney> {
    Dominance::new(vec![
        DominanceAxis::new(|j: &ScalarJourney| j.arrival, move |a, b| calculator.is_better(a, b)),
        DominanceAxis::minimize(|j: &ScalarJourney| j.transfers as i64),
        DominanceAxis::new(|j: &ScalarJourney| j.departure_anchor, move |a, b| calculator.is_better(b, a)),
    ])
}

/// Runs the earliest-arrival search described by `calculator`'s direction
/// over the whole departure window, returning the (at most one, since the
/// result dominance is single-axis) surviving journey.
#[allow(clippy::too_many_arguments)]
pub fn run_scalar<P, C, Canc, M>(
    provider: &P,
    calculator: C,
    access_legs: &[AccessLeg],
    egress_legs: &[AccessLeg],
    params: SearchParams,
    date: NaiveDate,
    cancellable: &Canc,
    metrics: &mut M,
    mut debug: Option<&mut DebugHooks<'_, Time>>,
) -> Vec<ScalarJourney>
where
    P: TransitDataProvider,
    C: Calculator + Send + Sync + 'static,
    Canc: Cancellable,
    M: RaptorMetrics,
{
    let num_stops = provider.num_stops();
    let egress_by_stop: HashMap<StopId, Time> = egress_legs.iter().map(|l| (l.stop, l.duration)).collect();
    let mut dest: DestinationArrivals<ScalarJourney> = DestinationArrivals::new(scalar_journey_dominance(calculator));

    for minute in minute_sequence(&params) {
        if cancellable.is_cancelled() {
            break;
        }

        let mut best_times = BestTimes::new(calculator, num_stops);
        let mut scalar_state = ScalarState::new();
        let mut round_tracker = RoundTracker::new(params.round_cap, params.extra_rounds_after_destination_reached);
        round_tracker.begin_iteration();
        let mut per_round_best: HashMap<usize, DestinationArrival> = HashMap::new();

        for leg in access_legs {
            let t = calculator.add(minute, leg.duration);
            if calculator.exceeds_limit(t, params.time_limit) {
                continue;
            }
            best_times.set_access_stop(leg.stop, t);
            scalar_state.set(
                0,
                leg.stop,
                ScalarLabel {
                    arrival: t,
                    leg: Leg::Access { duration: leg.duration },
                    pred_round: 0,
                },
            );
        }

        while round_tracker.has_more_rounds() {
            if cancellable.is_cancelled() {
                break;
            }
            round_tracker.next_round();
            best_times.prepare_for_next_round();
            if best_times.touched_overall_last_round().count_ones(..) == 0 {
                break;
            }
            let round = round_tracker.round();
            metrics.round_started();

            scan_patterns_scalar(
                provider,
                calculator,
                round,
                minute,
                params.board_slack,
                params.time_limit,
                date,
                &mut best_times,
                &mut scalar_state,
                &egress_by_stop,
                &mut per_round_best,
                metrics,
                debug.as_deref_mut(),
            );
            apply_transfers_scalar(
                provider,
                calculator,
                round,
                minute,
                params.time_limit,
                &mut best_times,
                &mut scalar_state,
                &egress_by_stop,
                &mut per_round_best,
                debug.as_deref_mut(),
            );

            if per_round_best.contains_key(&round) {
                round_tracker.notify_destination_reached();
            }
        }

        for (round, mut candidate) in per_round_best {
            candidate.legs = path::extract_scalar_path(&scalar_state, round, candidate.egress_stop);
            dest.offer(ScalarJourney {
                arrival: candidate.arrival,
                transfers: candidate.transfers,
                departure_anchor: candidate.departure_anchor,
                legs: candidate.legs,
            });
        }
    }

    dest.iter().cloned().collect()
}

#[allow(clippy::too_many_arguments)]
fn scan_patterns_scalar<P, C, M>(
    provider: &P,
    calculator: C,
    round: usize,
    minute: Time,
    board_slack: Time,
    time_limit: Time,
    date: NaiveDate,
    best_times: &mut BestTimes,
    scalar_state: &mut ScalarState,
    egress_by_stop: &HashMap<StopId, Time>,
    per_round_best: &mut HashMap<usize, DestinationArrival>,
    metrics: &mut M,
    mut debug: Option<&mut DebugHooks<'_, Time>>,
) where
    P: TransitDataProvider,
    C: Calculator,
    M: RaptorMetrics,
{
    let touched_stops = best_times.touched_last_round_stops();
    let patterns = provider.patterns_touching(&touched_stops);

    for (pattern_id, first_pos) in patterns {
        metrics.pattern_scanned();
        let pattern = provider.pattern(pattern_id);
        let mut on_trip: Option<TripIndex> = None;
        let mut board_stop: StopId = 0;
        let mut trip_upper_bound = pattern.num_trips();

        for pos in calculator.walk_positions(first_pos, pattern.num_stops()) {
            let s = pattern.stop_at(pos);

            if let Some(trip_idx) = on_trip {
                let trip = pattern.trip(trip_idx);
                let alight_t = calculator.alight_time_for(trip, pos);
                if calculator.is_better(alight_t, best_times.best_transit(s)) && !calculator.exceeds_limit(alight_t, time_limit) {
                    best_times.update_transit(calculator, s, alight_t);
                    // Record the label and offer the egress candidate whenever the
                    // transit arrival itself improves, not only when it also beats
                    // `best_overall[s]` (an earlier transfer may already sit there):
                    // `apply_transfers_scalar` reads `best_transit(s)` for every stop
                    // this round's transit scan touched, so a label must exist at
                    // `(round, s)` for any such stop a transfer might later point
                    // back to as its predecessor.
                    scalar_state.set(
                        round,
                        s,
                        ScalarLabel {
                            arrival: alight_t,
                            leg: Leg::Transit {
                                board_stop,
                                trip: TripRef {
                                    pattern: pattern_id,
                                    trip_index: trip_idx,
                                },
                            },
                            pred_round: round - 1,
                        },
                    );
                    if let Some(hooks) = debug.as_deref_mut() {
                        hooks.emit(DebugEvent::Accept {
                            site: EventSite::Stop(s),
                            round,
                            arrival: alight_t,
                        });
                    }
                    best_times.update_overall(calculator, s, alight_t);
                    if let Some(&egress_duration) = egress_by_stop.get(&s) {
                        offer_round_candidate(calculator, per_round_best, round, s, alight_t, egress_duration, time_limit, minute);
                    }
                }
            }

            if best_times.touched_overall_last_round().contains(s) {
                let prev_best = best_times.best_overall_for_boarding(s);
                if prev_best != calculator.unreached() {
                    let earliest = calculator.earliest_board_time(prev_best, board_slack);
                    if let Some(candidate) = find_earliest_trip(calculator, pattern, pos, earliest, trip_upper_bound, |i| {
                        provider.is_trip_running(
                            TripRef {
                                pattern: pattern_id,
                                trip_index: i,
                            },
                            date,
                        )
                    }) {
                        metrics.trip_boarded();
                        on_trip = Some(candidate.trip_index);
                        board_stop = s;
                        trip_upper_bound = candidate.trip_index;
                    }
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_transfers_scalar<P, C>(
    provider: &P,
    calculator: C,
    round: usize,
    minute: Time,
    time_limit: Time,
    best_times: &mut BestTimes,
    scalar_state: &mut ScalarState,
    egress_by_stop: &HashMap<StopId, Time>,
    per_round_best: &mut HashMap<usize, DestinationArrival>,
    mut debug: Option<&mut DebugHooks<'_, Time>>,
) where
    P: TransitDataProvider,
    C: Calculator,
{
    let touched: Vec<StopId> = best_times.touched_transit_current_round().ones().collect();

    for s in touched {
        let from_time = best_times.best_transit(s);
        for transfer in provider.transfers_from(s) {
            let arrival_time = calculator.add(from_time, transfer.duration);
            if calculator.exceeds_limit(arrival_time, time_limit) {
                continue;
            }
            if best_times.update_overall(calculator, transfer.to_stop, arrival_time) {
                scalar_state.set(
                    round,
                    transfer.to_stop,
                    ScalarLabel {
                        arrival: arrival_time,
                        leg: Leg::Transfer {
                            from_stop: s,
                            duration: transfer.duration,
                        },
                        pred_round: round,
                    },
                );
                if let Some(hooks) = debug.as_deref_mut() {
                    hooks.emit(DebugEvent::Accept {
                        site: EventSite::Stop(transfer.to_stop),
                        round,
                        arrival: arrival_time,
                    });
                }
                if let Some(&egress_duration) = egress_by_stop.get(&transfer.to_stop) {
                    offer_round_candidate(
                        calculator,
                        per_round_best,
                        round,
                        transfer.to_stop,
                        arrival_time,
                        egress_duration,
                        time_limit,
                        minute,
                    );
                }
            }
        }
    }
}

fn offer_round_candidate<C: Calculator>(
    calculator: C,
    per_round_best: &mut HashMap<usize, DestinationArrival>,
    round: usize,
    egress_stop: StopId,
    stop_arrival: Time,
    egress_duration: Time,
    time_limit: Time,
    minute: Time,
) {
    let arrival = calculator.add(stop_arrival, egress_duration);
    if calculator.exceeds_limit(arrival, time_limit) {
        return;
    }
    let is_better = match per_round_best.get(&round) {
        Some(existing) => calculator.is_better(arrival, existing.arrival),
        None => true,
    };
    if is_better {
        per_round_best.insert(
            round,
            DestinationArrival {
                arrival,
                transfers: round.saturating_sub(1),
                egress_stop,
                round,
                departure_anchor: minute,
                legs: Vec::new(),
            },
        );
    }
}

// ---------------------------------------------------------------------
// Multi-criteria search (MULTI_CRITERIA / MULTI_CRITERIA_WITH_HEURISTICS)
// ---------------------------------------------------------------------

/// One multi-criteria arrival's criteria: arrival time, transfer count, and
/// disutility cost, all minimized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McCriteria {
    pub arrival: Time,
    pub transfers: usize,
    pub cost: i64,
}

fn mc_frontier_dominance<C: Calculator + Send + Sync + 'static>(calculator: C) -> Dominance<McCriteria> {
    Dominance::new(vec![
        DominanceAxis::new(|c: &McCriteria| c.arrival, move |a, b| calculator.is_better(a, b)),
        DominanceAxis::minimize(|c: &McCriteria| c.transfers as i64),
        DominanceAxis::minimize(|c: &McCriteria| c.cost),
    ])
}

/// One fully-reconstructed multi-criteria journey.
#[derive(Debug, Clone)]
pub struct McJourney {
    pub arrival: Time,
    pub departure_anchor: Time,
    pub transfers: usize,
    pub cost: i64,
    pub legs: Vec<JourneyLeg>,
}

/// Arrival, transfers, and cost as usual, plus departure time in the opposite
/// sense of arrival (a later departure for the same outcome dominates an
/// earlier one). Without the departure axis, distinct range-scan departures
/// that happen to tie on arrival/transfers/cost would pile up as separate
/// "non-dominated" results instead of collapsing to the one with the
/// shortest wait; with it, genuinely distinct departures (different arrival,
/// same transfers and cost) correctly survive as separate itineraries.
fn mc_journey_dominance<C: Calculator + Send + Sync + 'static>(calculator: C) -> Dominance<McJourney> {
    Dominance::new(vec![
        DominanceAxis::new(|j: &McJourney| j.arrival, move |a, b| calculator.is_better(a, b)),
        DominanceAxis::minimize(|j: &McJourney| j.transfers as i64),
        DominanceAxis::minimize(|j: &McJourney| j.cost),
        DominanceAxis::new(|j: &McJourney| j.departure_anchor, move |a, b| calculator.is_better(b, a)),
    ])
}

#[derive(Debug, Clone, Copy)]
struct McCandidate {
    arrival: Time,
    idx: u32,
    departure_anchor: Time,
}

/// Runs multi-criteria Range Raptor, accumulating a Pareto-optimal set of
/// destination journeys traded off on arrival time, transfer count, and
/// disutility cost.
#[allow(clippy::too_many_arguments)]
pub fn run_multi_criteria<P, C, Canc, M>(
    provider: &P,
    calculator: C,
    access_legs: &[AccessLeg],
    egress_legs: &[AccessLeg],
    params: SearchParams,
    date: NaiveDate,
    cost_factors: CostFactors,
    cancellable: &Canc,
    metrics: &mut M,
    mut debug: Option<&mut DebugHooks<'_, McCriteria>>,
) -> Vec<McJourney>
where
    P: TransitDataProvider,
    C: Calculator + Send + Sync + 'static,
    Canc: Cancellable,
    M: RaptorMetrics,
{
    let num_stops = provider.num_stops();
    let egress_by_stop: HashMap<StopId, Time> = egress_legs.iter().map(|l| (l.stop, l.duration)).collect();
    let mut dest: DestinationArrivals<McJourney> = DestinationArrivals::new(mc_journey_dominance(calculator));

    for minute in minute_sequence(&params) {
        if cancellable.is_cancelled() {
            break;
        }

        let mut best_times = BestTimes::new(calculator, num_stops);
        let mut mc_state: MultiCriteriaState<McCriteria> = MultiCriteriaState::new(mc_frontier_dominance(calculator));
        let mut round_tracker = RoundTracker::new(params.round_cap, params.extra_rounds_after_destination_reached);
        round_tracker.begin_iteration();
        let mut per_round_best: HashMap<usize, McCandidate> = HashMap::new();

        for leg in access_legs {
            let t = calculator.add(minute, leg.duration);
            if calculator.exceeds_limit(t, params.time_limit) {
                continue;
            }
            best_times.set_access_stop(leg.stop, t);
            mc_state.try_insert(
                0,
                leg.stop,
                McCriteria {
                    arrival: t,
                    transfers: 0,
                    cost: 0,
                },
                Leg::Access { duration: leg.duration },
                None,
            );
        }

        while round_tracker.has_more_rounds() {
            if cancellable.is_cancelled() {
                break;
            }
            round_tracker.next_round();
            best_times.prepare_for_next_round();
            if best_times.touched_overall_last_round().count_ones(..) == 0 {
                break;
            }
            let round = round_tracker.round();
            metrics.round_started();

            scan_patterns_mc(
                provider,
                calculator,
                round,
                minute,
                params.board_slack,
                params.time_limit,
                date,
                cost_factors,
                &mut best_times,
                &mut mc_state,
                &egress_by_stop,
                &mut per_round_best,
                metrics,
                debug.as_deref_mut(),
            );
            apply_transfers_mc(
                provider,
                calculator,
                round,
                minute,
                params.time_limit,
                cost_factors,
                &mut best_times,
                &mut mc_state,
                &egress_by_stop,
                &mut per_round_best,
                debug.as_deref_mut(),
            );

            if per_round_best.contains_key(&round) {
                round_tracker.notify_destination_reached();
            }
        }

        for (_round, candidate) in per_round_best {
            let legs = path::extract_multi_criteria_path(&mc_state, candidate.idx, |c| c.arrival);
            let criteria = *mc_state.criteria(candidate.idx);
            dest.offer(McJourney {
                arrival: criteria.arrival,
                transfers: criteria.transfers,
                cost: criteria.cost,
                departure_anchor: candidate.departure_anchor,
                legs,
            });
        }
    }

    dest.iter().cloned().collect()
}

#[allow(clippy::too_many_arguments)]
fn scan_patterns_mc<P, C, M>(
    provider: &P,
    calculator: C,
    round: usize,
    minute: Time,
    board_slack: Time,
    time_limit: Time,
    date: NaiveDate,
    cost_factors: CostFactors,
    best_times: &mut BestTimes,
    mc_state: &mut MultiCriteriaState<McCriteria>,
    egress_by_stop: &HashMap<StopId, Time>,
    per_round_best: &mut HashMap<usize, McCandidate>,
    metrics: &mut M,
    mut debug: Option<&mut DebugHooks<'_, McCriteria>>,
) where
    P: TransitDataProvider,
    C: Calculator,
    M: RaptorMetrics,
{
    let touched_stops = best_times.touched_last_round_stops();
    let patterns = provider.patterns_touching(&touched_stops);

    // (trip_index, parent arena idx, board_time, cost accumulated as of boarding)
    struct Active {
        trip_index: TripIndex,
        parent: u32,
        board_time: Time,
        cost_at_board: i64,
    }

    for (pattern_id, first_pos) in patterns {
        metrics.pattern_scanned();
        let pattern = provider.pattern(pattern_id);
        let mut active: Vec<Active> = Vec::new();

        for pos in calculator.walk_positions(first_pos, pattern.num_stops()) {
            let s = pattern.stop_at(pos);

            for a in &active {
                let trip = pattern.trip(a.trip_index);
                let alight_t = calculator.alight_time_for(trip, pos);
                if calculator.exceeds_limit(alight_t, time_limit) {
                    continue;
                }
                let in_vehicle = (alight_t - a.board_time).abs();
                let cost = a.cost_at_board + COST_PRECISION * cost_factors.transit_factor * in_vehicle;
                let parent_transfers = mc_state.criteria(a.parent).transfers;
                let candidate = McCriteria {
                    arrival: alight_t,
                    transfers: parent_transfers + 1,
                    cost,
                };
                let leg = Leg::Transit {
                    board_stop: mc_state.stop_of(a.parent),
                    trip: TripRef {
                        pattern: pattern_id,
                        trip_index: a.trip_index,
                    },
                };
                // the boarding stop recorded on the leg is wherever `a.parent`
                // sits, which is correct only when the parent label's own
                // stop equals the stop this trip was boarded at; that holds
                // here because `a.parent` is set from a frontier lookup at
                // the boarding position, never mutated afterward.
                if let MultiCriteriaInsert::Accepted { idx, dropped } = mc_state.try_insert(round, s, candidate, leg, Some(a.parent)) {
                    best_times.mark_touched_transit(s);
                    best_times.mark_touched_overall(s);
                    if let Some(hooks) = debug.as_deref_mut() {
                        hooks.emit(DebugEvent::Accept {
                            site: EventSite::Stop(s),
                            round,
                            arrival: candidate,
                        });
                        for d in dropped {
                            hooks.emit(DebugEvent::Drop {
                                site: EventSite::Stop(s),
                                round,
                                dropped: d,
                                dropped_by: candidate,
                            });
                        }
                    }
                    if let Some(&egress_duration) = egress_by_stop.get(&s) {
                        offer_round_candidate_mc(calculator, per_round_best, round, alight_t, egress_duration, time_limit, idx, minute);
                    }
                } else if let Some(hooks) = debug.as_deref_mut() {
                    hooks.emit(DebugEvent::Reject {
                        site: EventSite::Stop(s),
                        round,
                        candidate,
                        dominated_by: candidate,
                    });
                }
            }

            if best_times.touched_overall_last_round().contains(s) {
                for &parent_idx in mc_state.frontier(round - 1, s) {
                    let parent = *mc_state.criteria(parent_idx);
                    let earliest = calculator.earliest_board_time(parent.arrival, board_slack);
                    if let Some(candidate) = find_earliest_trip(calculator, pattern, pos, earliest, pattern.num_trips(), |i| {
                        provider.is_trip_running(
                            TripRef {
                                pattern: pattern_id,
                                trip_index: i,
                            },
                            date,
                        )
                    }) {
                        metrics.trip_boarded();
                        let wait = (candidate.board_time - parent.arrival).abs();
                        let cost_at_board =
                            parent.cost + COST_PRECISION * cost_factors.boarding_cost + COST_PRECISION * cost_factors.wait_factor * wait;
                        active.push(Active {
                            trip_index: candidate.trip_index,
                            parent: parent_idx,
                            board_time: candidate.board_time,
                            cost_at_board,
                        });
                    }
                }
            }
        }
    }
}

fn offer_round_candidate_mc<C: Calculator>(
    calculator: C,
    per_round_best: &mut HashMap<usize, McCandidate>,
    round: usize,
    stop_arrival: Time,
    egress_duration: Time,
    time_limit: Time,
    idx: u32,
    minute: Time,
) {
    let arrival = calculator.add(stop_arrival, egress_duration);
    if calculator.exceeds_limit(arrival, time_limit) {
        return;
    }
    let is_better = match per_round_best.get(&round) {
        Some(existing) => calculator.is_better(arrival, existing.arrival),
        None => true,
    };
    if is_better {
        per_round_best.insert(round, McCandidate { arrival, idx, departure_anchor: minute });
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_transfers_mc<P, C>(
    provider: &P,
    calculator: C,
    round: usize,
    minute: Time,
    time_limit: Time,
    cost_factors: CostFactors,
    best_times: &mut BestTimes,
    mc_state: &mut MultiCriteriaState<McCriteria>,
    egress_by_stop: &HashMap<StopId, Time>,
    per_round_best: &mut HashMap<usize, McCandidate>,
    mut debug: Option<&mut DebugHooks<'_, McCriteria>>,
) where
    P: TransitDataProvider,
    C: Calculator,
{
    let touched: Vec<StopId> = best_times.touched_transit_current_round().ones().collect();

    for s in touched {
        let labels: Vec<u32> = mc_state.frontier(round, s).to_vec();
        for &label_idx in &labels {
            let label = *mc_state.criteria(label_idx);
            for transfer in provider.transfers_from(s) {
                let arrival_time = calculator.add(label.arrival, transfer.duration);
                if calculator.exceeds_limit(arrival_time, time_limit) {
                    continue;
                }
                let cost = label.cost + COST_PRECISION * cost_factors.walk_factor * transfer.duration.abs();
                let candidate = McCriteria {
                    arrival: arrival_time,
                    transfers: label.transfers,
                    cost,
                };
                let leg = Leg::Transfer {
                    from_stop: s,
                    duration: transfer.duration,
                };
                if let MultiCriteriaInsert::Accepted { idx, .. } = mc_state.try_insert(round, transfer.to_stop, candidate, leg, Some(label_idx)) {
                    best_times.mark_touched_overall(transfer.to_stop);
                    if let Some(hooks) = debug.as_deref_mut() {
                        hooks.emit(DebugEvent::Accept {
                            site: EventSite::Stop(transfer.to_stop),
                            round,
                            arrival: candidate,
                        });
                    }
                    if let Some(&egress_duration) = egress_by_stop.get(&transfer.to_stop) {
                        offer_round_candidate_mc(calculator, per_round_best, round, arrival_time, egress_duration, time_limit, idx, minute);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Forward;
    use crate::model::{InMemoryTransitData, Pattern, StopTime, TripSchedule};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Pattern with stops [0, 1, 2]; one trip boards at stop 0 at 08:00,
    /// arrives at stop 2 at 08:10.
    fn single_pattern_provider() -> InMemoryTransitData {
        let pattern = Pattern {
            stops: vec![0, 1, 2],
            trips: vec![TripSchedule {
                service_code: 0,
                times: vec![
                    StopTime {
                        arrival: 8 * 3600,
                        departure: 8 * 3600,
                    },
                    StopTime {
                        arrival: 8 * 3600 + 300,
                        departure: 8 * 3600 + 300,
                    },
                    StopTime {
                        arrival: 8 * 3600 + 600,
                        departure: 8 * 3600 + 600,
                    },
                ],
            }],
        };
        InMemoryTransitData::new(3, vec![pattern], vec![Vec::new(); 3]).unwrap()
    }

    #[test]
    fn scalar_search_finds_the_direct_trip() {
        let provider = single_pattern_provider();
        let access = vec![AccessLeg { stop: 0, duration: 0 }];
        let egress = vec![AccessLeg { stop: 2, duration: 0 }];
        let params = SearchParams {
            window_start: 7 * 3600,
            window_end: 9 * 3600,
            departure_step: 60,
            board_slack: 0,
            time_limit: 9 * 3600,
            round_cap: 5,
            extra_rounds_after_destination_reached: 3,
        };

        let journeys = run_scalar(
            &provider,
            Forward,
            &access,
            &egress,
            params,
            date(),
            &Never,
            &mut NoopMetrics,
            None,
        );

        assert_eq!(journeys.len(), 1);
        let journey = &journeys[0];
        assert_eq!(journey.arrival, 8 * 3600 + 600);
        assert_eq!(journey.transfers, 0);
        assert_eq!(journey.legs.first().unwrap().stop, 0);
        assert_eq!(journey.legs.last().unwrap().stop, 2);
    }

    #[test]
    fn scalar_search_with_no_connecting_pattern_is_empty() {
        let provider = InMemoryTransitData::new(2, Vec::new(), vec![Vec::new(); 2]).unwrap();
        let access = vec![AccessLeg { stop: 0, duration: 0 }];
        let egress = vec![AccessLeg { stop: 1, duration: 0 }];
        let params = SearchParams {
            window_start: 0,
            window_end: 3600,
            departure_step: 60,
            board_slack: 0,
            time_limit: 7200,
            round_cap: 5,
            extra_rounds_after_destination_reached: 3,
        };

        let journeys = run_scalar(&provider, Forward, &access, &egress, params, date(), &Never, &mut NoopMetrics, None);
        assert!(journeys.is_empty());
    }

    #[test]
    fn multi_criteria_search_finds_the_direct_trip() {
        let provider = single_pattern_provider();
        let access = vec![AccessLeg { stop: 0, duration: 0 }];
        let egress = vec![AccessLeg { stop: 2, duration: 0 }];
        let params = SearchParams {
            window_start: 7 * 3600,
            window_end: 9 * 3600,
            departure_step: 60,
            board_slack: 0,
            time_limit: 9 * 3600,
            round_cap: 5,
            extra_rounds_after_destination_reached: 3,
        };

        let journeys = run_multi_criteria(
            &provider,
            Forward,
            &access,
            &egress,
            params,
            date(),
            CostFactors::default(),
            &Never,
            &mut NoopMetrics,
            None,
        );

        assert_eq!(journeys.len(), 1);
        assert_eq!(journeys[0].arrival, 8 * 3600 + 600);
        assert_eq!(journeys[0].transfers, 1);
    }
}
