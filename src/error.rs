//! Error types for the Range Raptor core.
//!
//! Split into a result type for user-level outcomes (`RouteError`), and a
//! lower-level `RaptorError` for programmer mistakes and data-layout
//! problems that the worker either surfaces immediately (invalid indices)
//! or contains to a single pattern (`DataInconsistency`).

use thiserror::Error;

/// Errors raised by the low-level state/data-provider machinery.
///
/// These are invariant violations, not user-facing outcomes: an out-of-range
/// stop id, a round counter past its allocated bound, and so on. A correctly
/// wired worker never triggers most of these; they exist so bugs fail loudly
/// instead of silently corrupting a `(round, stop)` cell.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaptorError {
    #[error("stop id out of range")]
    InvalidStop,
    #[error("pattern id out of range")]
    InvalidPattern,
    #[error("trip index out of range")]
    InvalidTrip,
    #[error("round index exceeds the configured round cap")]
    RoundOutOfBounds,
}

/// Outcome of one `route()` call that prevents a result from being produced.
///
/// An unreachable destination is deliberately absent from this enum: it is
/// not an error, it is an empty result Pareto set returned with `Ok`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Access/egress legs empty, bad time bounds, negative durations, or a
    /// cost factor outside `[0, MAX_REASONABLE]`. Raised before any
    /// iteration starts; no state is mutated.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The transit provider rejected the search date (e.g. no calendar data
    /// loaded for it). Distinct from `DataInconsistency`, which is a
    /// structural problem with one pattern rather than the whole request.
    #[error("transit data unavailable for the requested date")]
    DataUnavailable,

    /// The search was cancelled through the `Cancellable` token. Whatever
    /// destination arrivals had already been committed by completed
    /// iterations are still returned alongside this variant by `route()`.
    #[error("search cancelled")]
    Cancelled,

    /// A lower-level invariant violation propagated up uncontained (e.g. the
    /// request referenced a stop id that does not exist in the provider).
    #[error(transparent)]
    Raptor(#[from] RaptorError),
}
