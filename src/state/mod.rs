//! Stop-arrival stores: the scalar variant for plain and reverse Range
//! Raptor, and the multi-criteria variant for Pareto-set search. Both record
//! enough of a back pointer for `path` to walk a result back to its access
//! leg without consulting anything else.

pub mod multi_criteria;
pub mod scalar;

pub use multi_criteria::{MultiCriteriaInsert, MultiCriteriaState};
pub use scalar::{ScalarLabel, ScalarState};

use crate::model::{StopId, Time, TripRef};

/// How a stop was reached on the leg recorded by a label. `Transit` and
/// `Transfer` name the stop the leg departed from so a path walk can look up
/// that stop's own label in the right round; `Access` terminates the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Access { duration: Time },
    Transit { board_stop: StopId, trip: TripRef },
    Transfer { from_stop: StopId, duration: Time },
}

impl Leg {
    /// The predecessor stop a path walk should continue from, or `None` at
    /// an access leg (the walk's base case).
    pub fn predecessor(&self) -> Option<StopId> {
        match *self {
            Leg::Access { .. } => None,
            Leg::Transit { board_stop, .. } => Some(board_stop),
            Leg::Transfer { from_stop, .. } => Some(from_stop),
        }
    }
}
