//! The transit network data model.

pub mod data;
pub mod types;

pub use data::{InMemoryTransitData, TransitDataProvider};
pub use types::{
    AccessLeg, Pattern, PatternId, PatternValidationError, ServiceCode, StopId, StopTime, Time,
    TransferLeg, TripIndex, TripRef, TripSchedule,
};
