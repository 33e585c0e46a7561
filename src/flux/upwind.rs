//! Upwind flux for linear advection.
//!
//! For du/dt + a du/dx = 0 at an interface with outward normal n:
//! F^* · n = (a · n) u^- if a · n > 0  (outflow)
//! F^* · n = (a · n) u^+ if a · n ≤ 0  (inflow)

use crate::types::FluxSolver;

use super::traits::FluxSplitting;

/// Compute the upwind flux F^* · n for scalar advection.
///
/// # Arguments
/// * `u_minus` - Solution value from interior (current element)
/// * `u_plus` - Solution value from exterior (neighbor element or boundary)
/// * `a` - Advection velocity
/// * `normal` - Outward normal direction (-1 for left face, +1 for right face)
pub fn upwind_flux(u_minus: f64, u_plus: f64, a: f64, normal: f64) -> f64 {
    let a_n = a * normal;
    if a_n > 0.0 { a_n * u_minus } else { a_n * u_plus }
}

/// Independent advection of `Q` quantities, each with its own velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Advection<const Q: usize> {
    pub velocities: [f64; Q],
}

impl<const Q: usize> Advection<Q> {
    pub fn new(velocities: [f64; Q]) -> Self {
        Self { velocities }
    }
}

impl<const Q: usize> FluxSplitting<Q> for Advection<Q> {
    /// Diagonal splitting: max(a·n, 0) acts on the own trace,
    /// min(a·n, 0) on the neighbor's.
    fn split(&self, normal: f64) -> [FluxSolver<Q>; 2] {
        let mut own = [[0.0; Q]; Q];
        let mut neigh = [[0.0; Q]; Q];
        for (q, &a) in self.velocities.iter().enumerate() {
            let a_n = a * normal;
            own[q][q] = a_n.max(0.0);
            neigh[q][q] = a_n.min(0.0);
        }
        [own, neigh]
    }
}
