//! Reference-element operators of the subcell limiter.
//!
//! This module provides:
//! - Subcell scatter/gather and subface operators (`SubcellOps`)
//! - DG face flux matrices (`FluxMatrices`)
//! - Subcell adjacency and flux-solver types (`SubcellConnect`)
//! - A builder for the line element of arbitrary order (`line_reference`)

mod line;
mod subcell;

pub use line::{LINE_FACES, LineReference, line_reference};
pub use subcell::{FluxMatrices, SubcellConnect, SubcellOps};
