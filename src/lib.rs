//! Range Raptor: earliest-arrival, reverse, and multi-criteria transit
//! journey search over a timetable network.
//!
//! [`request::route`] is the entry point. Build a [`model::TransitDataProvider`]
//! (or use [`model::InMemoryTransitData`]), describe a search with
//! [`request::Request`], and call `route`.

pub mod best_times;
pub mod calculator;
pub mod debug;
pub mod destination;
pub mod error;
pub mod model;
pub mod pareto;
pub mod path;
pub mod request;
pub mod round_tracker;
pub mod state;
pub mod trip_search;
pub mod worker;

pub use error::{RaptorError, RouteError};
pub use request::{route, DebugRequest, Path, PathLeg, Profile, Request};
