//! Data model for the transit network the core routes over.

pub mod transit;

pub use transit::data::{InMemoryTransitData, TransitDataProvider};
pub use transit::types::{
    AccessLeg, Pattern, PatternId, PatternValidationError, ServiceCode, StopId, StopTime, Time,
    TransferLeg, TripIndex, TripRef, TripSchedule,
};
