//! Ids and tensor types shared by the limiter.
//!
//! - [`indices`]: newtypes for the element, limited-plus, limited and extrema
//!   numberings
//! - [`tensor`]: const-generic per-element arrays

mod indices;
mod tensor;

pub use indices::{ElementIndex, ExtremaIndex, LimitedIndex, LimitedPlusIndex};
pub use tensor::{
    DofsDg, DofsSc, DofsSf, Extrema, FluxSolver, RunMask, SubGrid, any_false, empty_extrema,
};
