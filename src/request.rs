//! The public `route()` entry point: request validation, profile dispatch,
//! and journey assembly.

use log::debug;

use crate::calculator::{Backward, Forward};
use crate::debug::DebugHooks;
use crate::error::RouteError;
use crate::model::transit::data::validate_legs;
use crate::model::{AccessLeg, StopId, Time, TransitDataProvider};
use crate::worker::{self, CostFactors, McCriteria, Never, NoopMetrics, SearchParams};

/// Which algorithm variant serves the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Standard,
    StandardReverse,
    MultiCriteria,
    /// Same search as `MultiCriteria`; a heuristic oracle pass is an
    /// optimization over which stops get scanned, not a change in the
    /// journeys the search can return.
    MultiCriteriaWithHeuristics,
}

/// A `debug` block requesting filtered Accept/Reject/Drop events.
#[derive(Debug, Clone, Default)]
pub struct DebugRequest {
    pub stops: Vec<StopId>,
    pub path: Vec<StopId>,
    pub path_start_index: usize,
    pub listen_stops: bool,
    pub listen_destination: bool,
    pub listen_path: bool,
}

/// One search request. Constructed directly by the host application; there
/// is no file format or CLI surface for it.
#[derive(Debug, Clone)]
pub struct Request {
    pub earliest_departure_time: Time,
    pub latest_arrival_time: Time,
    pub search_window_seconds: Time,
    pub departure_step_seconds: Time,
    pub arrived_by: bool,
    pub access_legs: Vec<AccessLeg>,
    pub egress_legs: Vec<AccessLeg>,
    pub board_slack_seconds: Time,
    pub number_of_additional_transfers: usize,
    pub profile: Profile,
    pub multi_criteria_cost_factors: Option<CostFactors>,
    pub debug: Option<DebugRequest>,
}

impl Request {
    /// A request with every optional field at its documented default,
    /// leaving the caller to fill in times, legs, and profile.
    pub fn new(
        earliest_departure_time: Time,
        latest_arrival_time: Time,
        access_legs: Vec<AccessLeg>,
        egress_legs: Vec<AccessLeg>,
        profile: Profile,
    ) -> Self {
        Self {
            earliest_departure_time,
            latest_arrival_time,
            search_window_seconds: latest_arrival_time - earliest_departure_time,
            departure_step_seconds: 60,
            arrived_by: false,
            access_legs,
            egress_legs,
            board_slack_seconds: 60,
            number_of_additional_transfers: 3,
            profile,
            multi_criteria_cost_factors: None,
            debug: None,
        }
    }
}

/// The maximum a cost factor may be set to before a request is rejected as
/// malformed rather than merely unusual.
pub const MAX_REASONABLE_COST_FACTOR: i64 = 1_000_000;

/// An absolute bound on rounds run in one iteration, independent of
/// `number_of_additional_transfers`. Large enough that no real transit
/// network exhausts it through legitimate transfers alone.
pub const ROUND_CAP: usize = 64;

fn validate(request: &Request, num_stops: usize) -> Result<(), RouteError> {
    if request.access_legs.is_empty() {
        return Err(RouteError::InvalidRequest("access_legs must not be empty".into()));
    }
    if request.egress_legs.is_empty() {
        return Err(RouteError::InvalidRequest("egress_legs must not be empty".into()));
    }
    if request.earliest_departure_time >= request.latest_arrival_time {
        return Err(RouteError::InvalidRequest(
            "earliest_departure_time must precede latest_arrival_time".into(),
        ));
    }
    if request.search_window_seconds < 0 || request.departure_step_seconds <= 0 || request.board_slack_seconds < 0 {
        return Err(RouteError::InvalidRequest("durations must be non-negative".into()));
    }
    if let Some(factors) = request.multi_criteria_cost_factors {
        for f in [factors.boarding_cost, factors.wait_factor, factors.transit_factor, factors.walk_factor] {
            if !(0..=MAX_REASONABLE_COST_FACTOR).contains(&f) {
                return Err(RouteError::InvalidRequest(format!(
                    "cost factor {f} outside [0, {MAX_REASONABLE_COST_FACTOR}]"
                )));
            }
        }
    }
    validate_legs(&request.access_legs, num_stops).map_err(RouteError::Raptor)?;
    validate_legs(&request.egress_legs, num_stops).map_err(RouteError::Raptor)?;
    Ok(())
}

fn search_params(request: &Request) -> SearchParams {
    // `minute_sequence` always walks window_start..=window_end ascending, so
    // both directions need window_start <= window_end here; the calculator
    // gives the ascending "minute" its direction-correct meaning (a
    // departure bound forward, an arrival bound backward).
    let (window_start, window_end, time_limit) = if request.arrived_by {
        (
            request.latest_arrival_time - request.search_window_seconds,
            request.latest_arrival_time,
            request.earliest_departure_time,
        )
    } else {
        (
            request.earliest_departure_time,
            request.earliest_departure_time + request.search_window_seconds,
            request.latest_arrival_time,
        )
    };
    SearchParams {
        window_start,
        window_end,
        departure_step: request.departure_step_seconds,
        board_slack: request.board_slack_seconds,
        time_limit,
        round_cap: ROUND_CAP,
        extra_rounds_after_destination_reached: request.number_of_additional_transfers,
    }
}

/// One leg of a returned path, in travel order.
#[derive(Debug, Clone, Copy)]
pub struct PathLeg {
    pub stop: StopId,
    pub arrival: Time,
    pub leg: crate::state::Leg,
}

/// One itinerary in the result Pareto set.
#[derive(Debug, Clone)]
pub struct Path {
    pub start_time: Time,
    pub end_time: Time,
    pub n_transfers: usize,
    pub total_travel_duration: Time,
    pub cost: Option<i64>,
    pub legs: Vec<PathLeg>,
}

fn to_path_legs(legs: Vec<crate::path::JourneyLeg>) -> Vec<PathLeg> {
    legs.into_iter()
        .map(|l| PathLeg {
            stop: l.stop,
            arrival: l.arrival,
            leg: l.leg,
        })
        .collect()
}

/// Runs one search end to end: validates the request, dispatches to the
/// scalar or multi-criteria worker with the calculator matching `profile`
/// and `arrived_by`, and assembles the returned journeys into `Path`s.
pub fn route<P: TransitDataProvider>(provider: &P, request: &Request, date: chrono::NaiveDate) -> Result<Vec<Path>, RouteError> {
    validate(request, provider.num_stops())?;
    debug!(
        "routing: window=[{}, {}] profile={:?} arrived_by={}",
        request.earliest_departure_time, request.latest_arrival_time, request.profile, request.arrived_by
    );

    let params = search_params(request);
    let mut metrics = NoopMetrics;

    // `StandardReverse` always runs the backward calculator regardless of
    // `arrived_by`; `arrived_by` alone flips direction for the other
    // profiles. Either way, `access`/`egress` are swapped whenever the
    // search actually runs backward, since the backward calculator boards
    // at the egress side first.
    let reverse = request.arrived_by || matches!(request.profile, Profile::StandardReverse);
    let (access, egress): (&[AccessLeg], &[AccessLeg]) = if reverse {
        (&request.egress_legs, &request.access_legs)
    } else {
        (&request.access_legs, &request.egress_legs)
    };

    // A journey's `departure_anchor` is the minute value the iteration was
    // keyed on: a real departure time forward, a real arrival deadline
    // backward. Its `arrival` field is the other endpoint, already shifted
    // by the egress leg's duration. Forward, anchor precedes arrival in
    // time; backward, arrival (now a true origin release time) precedes
    // the anchor.
    let paths = match request.profile {
        Profile::Standard | Profile::StandardReverse => {
            let journeys = if reverse {
                worker::run_scalar(provider, Backward, access, egress, params, date, &Never, &mut metrics, None::<&mut DebugHooks<'_, Time>>)
            } else {
                worker::run_scalar(provider, Forward, access, egress, params, date, &Never, &mut metrics, None::<&mut DebugHooks<'_, Time>>)
            };
            journeys
                .into_iter()
                .map(|j| {
                    let legs = to_path_legs(j.legs);
                    let (start, end) = if reverse { (j.arrival, j.departure_anchor) } else { (j.departure_anchor, j.arrival) };
                    Path {
                        start_time: start,
                        end_time: end,
                        n_transfers: j.transfers,
                        total_travel_duration: (end - start).abs(),
                        cost: None,
                        legs,
                    }
                })
                .collect()
        }
        Profile::MultiCriteria | Profile::MultiCriteriaWithHeuristics => {
            let cost_factors = request.multi_criteria_cost_factors.unwrap_or_default();
            let journeys: Vec<worker::McJourney> = if reverse {
                worker::run_multi_criteria(
                    provider,
                    Backward,
                    access,
                    egress,
                    params,
                    date,
                    cost_factors,
                    &Never,
                    &mut metrics,
                    None::<&mut DebugHooks<'_, McCriteria>>,
                )
            } else {
                worker::run_multi_criteria(
                    provider,
                    Forward,
                    access,
                    egress,
                    params,
                    date,
                    cost_factors,
                    &Never,
                    &mut metrics,
                    None::<&mut DebugHooks<'_, McCriteria>>,
                )
            };
            journeys
                .into_iter()
                .map(|j| {
                    let legs = to_path_legs(j.legs);
                    let (start, end) = if reverse { (j.arrival, j.departure_anchor) } else { (j.departure_anchor, j.arrival) };
                    Path {
                        start_time: start,
                        end_time: end,
                        // `McCriteria::transfers` counts boardings, incremented once per
                        // transit leg from its parent label; n_transfers is boardings - 1.
                        n_transfers: j.transfers.saturating_sub(1),
                        total_travel_duration: (end - start).abs(),
                        cost: Some(j.cost),
                        legs,
                    }
                })
                .collect()
        }
    };

    Ok(paths)
}
