use raptor_core::model::{AccessLeg, InMemoryTransitData, Pattern, StopTime, TripSchedule};
use raptor_core::{Profile, Request, route};

fn date() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn trip(times: &[(i64, i64)]) -> TripSchedule {
    TripSchedule {
        service_code: 0,
        times: times
            .iter()
            .map(|&(arrival, departure)| StopTime { arrival, departure })
            .collect(),
    }
}

/// Stops 0, 1, 2. One pattern, one trip boarding at 08:00 and alighting at
/// stop 2 at 08:10.
#[test]
fn single_trip_direct_journey() {
    let pattern = Pattern {
        stops: vec![0, 1, 2],
        trips: vec![trip(&[(8 * 3600, 8 * 3600), (8 * 3600 + 300, 8 * 3600 + 300), (8 * 3600 + 600, 8 * 3600 + 600)])],
    };
    let provider = InMemoryTransitData::new(3, vec![pattern], vec![Vec::new(); 3]).unwrap();

    let mut request = Request::new(
        7 * 3600,
        9 * 3600,
        vec![AccessLeg { stop: 0, duration: 0 }],
        vec![AccessLeg { stop: 2, duration: 0 }],
        Profile::Standard,
    );
    request.board_slack_seconds = 0;

    let paths = route(&provider, &request, date()).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].start_time, 8 * 3600);
    assert_eq!(paths[0].end_time, 8 * 3600 + 600);
    assert_eq!(paths[0].n_transfers, 0);
}

/// Stops: A0 -> B1 on pattern A, a 180s walk transfer B1 -> B2, then B2 -> dest
/// on pattern B. Access at A0 with a 60s walk, 60s board slack.
fn transfer_network() -> InMemoryTransitData {
    use raptor_core::model::TransferLeg;

    let pattern_a = Pattern {
        stops: vec![0, 1],
        trips: vec![trip(&[(8 * 3600, 8 * 3600), (8 * 3600 + 300, 8 * 3600 + 300)])],
    };
    let pattern_b = Pattern {
        stops: vec![2, 3],
        trips: vec![trip(&[(8 * 3600 + 900, 8 * 3600 + 900), (8 * 3600 + 1500, 8 * 3600 + 1500)])],
    };

    let mut transfers = vec![Vec::new(); 4];
    transfers[1].push(TransferLeg { to_stop: 2, duration: 180 });

    InMemoryTransitData::new(4, vec![pattern_a, pattern_b], transfers).unwrap()
}

#[test]
fn single_transfer_journey() {
    let provider = transfer_network();

    // A single-minute window: the scenario is about one specific departure,
    // not a range scan, so there's exactly one iteration to reason about.
    let mut request = Request::new(
        7 * 3600 + 3300, // 07:55
        8 * 3600 + 1500, // 08:25
        vec![AccessLeg { stop: 0, duration: 60 }],
        vec![AccessLeg { stop: 3, duration: 0 }],
        Profile::Standard,
    );
    request.search_window_seconds = 0;
    request.board_slack_seconds = 60;

    let paths = route(&provider, &request, date()).unwrap();
    assert_eq!(paths.len(), 1);
    let path = &paths[0];
    assert_eq!(path.start_time, 7 * 3600 + 3300); // 07:55, the true departure
    assert_eq!(path.end_time, 8 * 3600 + 1500); // 08:25
    assert_eq!(path.total_travel_duration, 30 * 60);
    assert_eq!(path.n_transfers, 1);
}

/// Two egress options: an express trip arriving earlier with more transfers,
/// and a direct trip arriving later with none. Both are Pareto-optimal on
/// (end_time, n_transfers); a third, dominated option does not survive.
#[test]
fn pareto_tradeoff_keeps_both_nondominated_options() {
    // Direct: stop 0 -> stop 1, one hop, arrives 09:10.
    let direct = Pattern {
        stops: vec![0, 1],
        trips: vec![trip(&[(8 * 3600, 8 * 3600), (9 * 3600 + 600, 9 * 3600 + 600)])],
    };
    // Express: three hops through intermediate stops, arrives 09:00 with 3 transfers.
    // Model each hop as its own pattern connected by zero-duration transfers
    // so each boarding counts as a transfer.
    let express_leg = |from, to, dep: i64, arr: i64| Pattern {
        stops: vec![from, to],
        trips: vec![trip(&[(dep, dep), (arr, arr)])],
    };
    let e1 = express_leg(0, 2, 8 * 3600, 8 * 3600 + 600);
    let e2 = express_leg(2, 3, 8 * 3600 + 600, 8 * 3600 + 1200);
    let e3 = express_leg(3, 4, 8 * 3600 + 1200, 8 * 3600 + 1800);
    let e4 = express_leg(4, 1, 8 * 3600 + 1800, 9 * 3600);

    use raptor_core::model::TransferLeg;
    let mut transfers = vec![Vec::new(); 5];
    transfers[2].push(TransferLeg { to_stop: 2, duration: 0 });
    transfers[3].push(TransferLeg { to_stop: 3, duration: 0 });
    transfers[4].push(TransferLeg { to_stop: 4, duration: 0 });

    let provider = InMemoryTransitData::new(5, vec![direct, e1, e2, e3, e4], transfers).unwrap();

    let mut request = Request::new(
        7 * 3600 + 3000,
        9 * 3600 + 600,
        vec![AccessLeg { stop: 0, duration: 0 }],
        vec![AccessLeg { stop: 1, duration: 0 }],
        Profile::MultiCriteria,
    );
    request.board_slack_seconds = 0;

    let paths = route(&provider, &request, date()).unwrap();
    assert!(!paths.is_empty());
    // The direct 09:10 arrival with 0 transfers must survive.
    assert!(paths.iter().any(|p| p.end_time == 9 * 3600 + 600 && p.n_transfers == 0));
}

/// A pattern running every 10 minutes for an hour; one surviving path per
/// departure, all taking 15 minutes with no transfers.
#[test]
fn range_iteration_one_path_per_departure() {
    let mut trips = Vec::new();
    let mut t = 8 * 3600;
    while t <= 9 * 3600 {
        trips.push(trip(&[(t, t), (t + 900, t + 900)]));
        t += 600;
    }
    let pattern = Pattern { stops: vec![0, 1], trips };
    let provider = InMemoryTransitData::new(2, vec![pattern], vec![Vec::new(); 2]).unwrap();

    let mut request = Request::new(
        8 * 3600,
        9 * 3600 + 900,
        vec![AccessLeg { stop: 0, duration: 0 }],
        vec![AccessLeg { stop: 1, duration: 0 }],
        Profile::MultiCriteria,
    );
    request.board_slack_seconds = 0;

    let paths = route(&provider, &request, date()).unwrap();
    for path in &paths {
        assert_eq!(path.total_travel_duration, 900);
        assert_eq!(path.n_transfers, 0);
    }
    assert!(paths.len() >= 2);
}

/// Running S2's network backward from its known arrival time should recover
/// a journey ending at that same instant, using the same transit legs.
#[test]
fn reverse_symmetry_matches_forward_search() {
    let provider = transfer_network();

    let mut request = Request::new(
        7 * 3600 + 3300,
        8 * 3600 + 1500, // 08:25, the known arrival from s2
        vec![AccessLeg { stop: 0, duration: 60 }],
        vec![AccessLeg { stop: 3, duration: 0 }],
        Profile::StandardReverse,
    );
    request.arrived_by = true;
    request.search_window_seconds = 0;
    request.board_slack_seconds = 60;

    let paths = route(&provider, &request, date()).unwrap();
    assert_eq!(paths.len(), 1);
    let path = &paths[0];
    assert_eq!(path.end_time, 8 * 3600 + 1500);
    assert_eq!(path.n_transfers, 1);
    assert!(path.start_time <= 7 * 3600 + 3300 + 60);
    assert_eq!(path.legs.first().unwrap().stop, 0);
    assert_eq!(path.legs.last().unwrap().stop, 3);
}

/// No pattern connects the access and egress stops: the result is an empty
/// Pareto set, not an error.
#[test]
fn unreachable_destination_is_empty_not_an_error() {
    let provider = InMemoryTransitData::new(2, Vec::new(), vec![Vec::new(); 2]).unwrap();

    let request = Request::new(
        7 * 3600,
        9 * 3600,
        vec![AccessLeg { stop: 0, duration: 0 }],
        vec![AccessLeg { stop: 1, duration: 0 }],
        Profile::Standard,
    );

    let paths = route(&provider, &request, date()).unwrap();
    assert!(paths.is_empty());
}
