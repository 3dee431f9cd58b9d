//! Debug/event channel: synchronous, filtered Accept/Reject/Drop
//! events for Pareto-set activity at stops, at the destination, and along
//! paths.

use crate::model::StopId;

/// Where an event originated, matching the request's `listeners` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSite {
    Stop(StopId),
    Destination,
    Path,
}

/// One Pareto-set activity event. `A` is the arrival payload type (scalar or
/// multi-criteria); events carry an owned copy, never a reference, since
/// "the event payload is transient; implementations must copy what they
/// need before returning".
#[derive(Debug, Clone)]
pub enum DebugEvent<A> {
    Accept { site: EventSite, round: usize, arrival: A },
    Reject { site: EventSite, round: usize, candidate: A, dominated_by: A },
    RejectOptimized { site: EventSite, round: usize, candidate: A },
    Drop { site: EventSite, round: usize, dropped: A, dropped_by: A },
}

impl<A> DebugEvent<A> {
    pub fn site(&self) -> EventSite {
        match self {
            DebugEvent::Accept { site, .. }
            | DebugEvent::Reject { site, .. }
            | DebugEvent::RejectOptimized { site, .. }
            | DebugEvent::Drop { site, .. } => *site,
        }
    }
}

/// Selects which events reach the sink.
#[derive(Debug, Clone, Default)]
pub struct DebugFilter {
    pub stops_of_interest: Vec<StopId>,
    /// A stop sequence; an arrival matches when its ancestor chain
    /// (most-recent-first) agrees element-wise with the suffix of this path
    /// starting at `path_start_index`.
    pub path_of_interest: Vec<StopId>,
    pub path_start_index: usize,
    pub listen_stops: bool,
    pub listen_destination: bool,
    pub listen_path: bool,
}

impl DebugFilter {
    pub fn none() -> Self {
        Self::default()
    }

    fn site_enabled(&self, site: EventSite) -> bool {
        match site {
            EventSite::Stop(_) => self.listen_stops,
            EventSite::Destination => self.listen_destination,
            EventSite::Path => self.listen_path,
        }
    }

    fn stop_matches(&self, stop: StopId) -> bool {
        self.stops_of_interest.is_empty() || self.stops_of_interest.contains(&stop)
    }

    /// `ancestor_chain` is most-recent-first (the stop the event concerns,
    /// then its predecessor, and so on).
    pub fn path_matches(&self, ancestor_chain: &[StopId]) -> bool {
        if self.path_of_interest.is_empty() {
            return true;
        }
        let suffix = &self.path_of_interest[self.path_start_index.min(self.path_of_interest.len())..];
        // `suffix` is travel order (oldest first); `ancestor_chain` is
        // most-recent-first, so walk the suffix back to front to line up
        // corresponding stops.
        ancestor_chain
            .iter()
            .zip(suffix.iter().rev())
            .all(|(a, b)| a == b)
    }

    pub fn accepts(&self, site: EventSite) -> bool {
        if !self.site_enabled(site) {
            return false;
        }
        match site {
            EventSite::Stop(stop) => self.stop_matches(stop),
            EventSite::Destination | EventSite::Path => true,
        }
    }
}

/// A side-effect consumer of debug events. Handlers must not mutate Raptor
/// state — the trait only ever hands out `&DebugEvent`.
pub trait DebugSink<A> {
    fn on_event(&mut self, event: &DebugEvent<A>);
}

impl<A, F: FnMut(&DebugEvent<A>)> DebugSink<A> for F {
    fn on_event(&mut self, event: &DebugEvent<A>) {
        self(event)
    }
}

/// Combines a filter with a sink; emission is a no-op with the default
/// (`listen_* = false`) filter, so callers that don't care about debug
/// output pay only the cost of constructing one empty struct.
pub struct DebugChannel<A, S: DebugSink<A>> {
    filter: DebugFilter,
    sink: S,
    _marker: std::marker::PhantomData<A>,
}

impl<A, S: DebugSink<A>> DebugChannel<A, S> {
    pub fn new(filter: DebugFilter, sink: S) -> Self {
        Self {
            filter,
            sink,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn emit(&mut self, event: DebugEvent<A>) {
        if self.filter.accepts(event.site()) {
            self.sink.on_event(&event);
        }
    }

    pub fn filter(&self) -> &DebugFilter {
        &self.filter
    }
}

/// A `DebugSink` that discards every event — the default for requests
/// without a `debug` block.
pub struct NullSink;

impl<A> DebugSink<A> for NullSink {
    fn on_event(&mut self, _event: &DebugEvent<A>) {}
}

/// A dynamic-dispatch filter+sink pair the worker holds by `&mut` across one
/// search. Kept separate from [`DebugChannel`] (which owns its sink and is
/// meant for a caller driving one sink type directly) so `worker.rs` doesn't
/// need to be generic over the sink implementation, only over the event
/// payload type (`Time` for scalar search, a criteria struct for
/// multi-criteria search).
pub struct DebugHooks<'a, A> {
    pub filter: DebugFilter,
    pub sink: &'a mut dyn DebugSink<A>,
}

impl<'a, A> DebugHooks<'a, A> {
    pub fn new(filter: DebugFilter, sink: &'a mut dyn DebugSink<A>) -> Self {
        Self { filter, sink }
    }

    pub fn emit(&mut self, event: DebugEvent<A>) {
        if self.filter.accepts(event.site()) {
            self.sink.on_event(&event);
        }
    }
}
