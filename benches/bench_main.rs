use criterion::{Criterion, criterion_group, criterion_main};
use raptor_core::model::{AccessLeg, InMemoryTransitData, Pattern, StopTime, TripSchedule};
use raptor_core::{Profile, Request, route};

/// A line of `num_stops` stops served by a pattern repeating every 10
/// minutes across the day, each trip taking 2 minutes per hop.
fn line_network(num_stops: usize, num_trips: usize) -> InMemoryTransitData {
    let stops: Vec<_> = (0..num_stops as u32).collect();
    let trips = (0..num_trips)
        .map(|t| {
            let start = 6 * 3600 + (t as i64) * 600;
            let times = (0..num_stops)
                .map(|i| {
                    let at = start + (i as i64) * 120;
                    StopTime {
                        arrival: at,
                        departure: at,
                    }
                })
                .collect();
            TripSchedule {
                service_code: 0,
                times,
            }
        })
        .collect();

    let pattern = Pattern { stops, trips };
    InMemoryTransitData::new(num_stops, vec![pattern], vec![Vec::new(); num_stops]).unwrap()
}

fn route_across_network(provider: &InMemoryTransitData, last_stop: u32) {
    let request = Request::new(
        6 * 3600,
        10 * 3600,
        vec![AccessLeg { stop: 0, duration: 0 }],
        vec![AccessLeg {
            stop: last_stop,
            duration: 0,
        }],
        Profile::Standard,
    );
    let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let _ = route(provider, &request, date).unwrap();
}

fn bench_scalar_search(c: &mut Criterion) {
    let _ = env_logger::try_init();
    let mut group = c.benchmark_group("scalar_search");
    for &num_stops in &[10usize, 100, 500] {
        let provider = line_network(num_stops, 40);
        let last_stop = (num_stops - 1) as u32;
        group.bench_function(format!("{num_stops}_stops"), |b| {
            b.iter(|| route_across_network(&provider, last_stop));
        });
    }
    group.finish();
}

fn bench_multi_criteria_search(c: &mut Criterion) {
    let provider = line_network(100, 40);
    let request = Request::new(
        6 * 3600,
        10 * 3600,
        vec![AccessLeg { stop: 0, duration: 0 }],
        vec![AccessLeg { stop: 99, duration: 0 }],
        Profile::MultiCriteria,
    );
    let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    c.bench_function("multi_criteria_search_100_stops", |b| {
        b.iter(|| {
            let _ = route(&provider, &request, date).unwrap();
        });
    });
}

criterion_group!(benches, bench_scalar_search, bench_multi_criteria_search);
criterion_main!(benches);
