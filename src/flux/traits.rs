//! Linear Riemann solvers split into one-sided contributions.
//!
//! For a linear hyperbolic system the upwind flux through a face with
//! outward normal n is a sum of two matrix-vector products,
//! F^*·n = A⁻ u^- + A⁺ u^+, where u^- is the element's own trace and u^+
//! the neighbor's. The limiter consumes A⁻ and A⁺ directly.

use crate::types::FluxSolver;

/// A linear system whose face flux splits into own and neighbor matrices.
///
/// # Example
/// ```
/// use dg_subcell::flux::{Advection, FluxSplitting};
///
/// let adv = Advection::new([1.0]);
/// let [own, neigh] = adv.split(1.0);
/// assert_eq!(own[0][0], 1.0);
/// assert_eq!(neigh[0][0], 0.0);
/// ```
pub trait FluxSplitting<const Q: usize> {
    /// Own (`[0]`) and neighbor (`[1]`) flux matrices for the 1D outward
    /// normal `normal`, not scaled by geometry.
    fn split(&self, normal: f64) -> [FluxSolver<Q>; 2];
}
