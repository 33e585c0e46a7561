//! Strategy traits of the a-posteriori limiter.
//!
//! The orchestration in [`super::Limiter`] is PDE-agnostic. Two seams carry
//! the physics and the troubled-cell criterion:
//!
//! - [`SubcellSolver`]: one explicit finite-volume step on the subgrid, plus
//!   optional net-updates and super-cell corrections for internal boundaries
//! - [`AdmissibilityOracle`]: the per-run admissibility decision
//!
//! # Extending
//!
//! To add a PDE:
//! 1. Create a (usually zero-sized) struct
//! 2. Implement `SubcellSolver::step`, typically through [`super::fv_step`]
//! 3. Override `net_update`/`super_cell` if the PDE has internal boundaries

use crate::flux::ElementFluxSolvers;
use crate::types::{DofsSc, DofsSf, ElementIndex, Extrema, ExtremaIndex, RunMask, SubGrid};

use super::subcell::SubcellScaling;

/// Everything a subcell solver needs besides the subgrid values.
#[derive(Clone, Copy, Debug)]
pub struct SubcellStep<'a, const F: usize, const SC: usize, const Q: usize> {
    /// Time step.
    pub dt: f64,
    /// Dense id of the limited element.
    pub element: ElementIndex,
    /// Flux and net-update scaling of the element.
    pub scaling: SubcellScaling,
    /// Subgrid id across each subcell face.
    pub sc_sf_sc: &'a [[usize; F]; SC],
    /// Flux-solver type of each subcell face.
    pub sc_ty_sf: &'a [[usize; F]; SC],
    /// Faces whose ghost cells hold net-updates instead of neighbor states.
    pub net_updates: &'a [bool; F],
    /// Flux solvers of the element, addressed by subface type.
    pub solvers: &'a ElementFluxSolvers<Q, F>,
}

/// One-step finite-volume update of an element's subcells.
pub trait SubcellSolver: Send + Sync {
    /// Net-update for face `face` of `element`, an internal boundary.
    ///
    /// `own` and `adjacent` are the subcell values on both sides of the face
    /// in the element's subface order. Writes the time-integrated update of
    /// the element's face subcells to `out` and returns `true`, or returns
    /// `false` to fall back to the regular two-sided flux.
    #[allow(unused_variables)]
    fn net_update<const Q: usize, const SF: usize, const R: usize>(
        &self,
        dt: f64,
        element: ElementIndex,
        face: usize,
        own: &DofsSf<Q, SF, R>,
        adjacent: &DofsSf<Q, SF, R>,
        out: &mut DofsSf<Q, SF, R>,
    ) -> bool {
        false
    }

    /// Advance the subcells by one step.
    ///
    /// `sub_grid` holds the element's subcells followed by the ghost cells of
    /// every face; the result overwrites `dofs_sc`.
    fn step<
        const F: usize,
        const SC: usize,
        const SG: usize,
        const Q: usize,
        const R: usize,
    >(
        &self,
        ctx: &SubcellStep<'_, F, SC, Q>,
        sub_grid: &SubGrid<Q, SG, R>,
        dofs_sc: &mut DofsSc<Q, SC, R>,
    );

    /// Extended-stencil correction after the step, for faces that used
    /// net-updates.
    #[allow(unused_variables)]
    fn super_cell<
        const F: usize,
        const SC: usize,
        const SG: usize,
        const Q: usize,
        const R: usize,
    >(
        &self,
        ctx: &SubcellStep<'_, F, SC, Q>,
        sub_grid: &SubGrid<Q, SG, R>,
        dofs_sc: &mut DofsSc<Q, SC, R>,
    ) {
    }

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Per-run admissibility of a candidate solution.
pub trait AdmissibilityOracle: Send + Sync {
    /// Decide admissibility of `candidate` against the element's own previous
    /// extrema and those of its stencil (`stencil` indexes `prev`).
    fn admissible<const Q: usize, const R: usize>(
        &self,
        candidate: &Extrema<Q, R>,
        own_prev: &Extrema<Q, R>,
        prev: &[Extrema<Q, R>],
        stencil: &[ExtremaIndex],
    ) -> RunMask<R>;
}
