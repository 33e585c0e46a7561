//! A-posteriori subcell limiting.
//!
//! After a DG step, candidates that fail the admissibility check are
//! recomputed with a first-order finite-volume scheme on subcells. The
//! neighbors of those elements roll back the DG fluxes of the shared faces
//! so the update stays conservative.
//!
//! - [`Limiter`]: orchestration of rollback, limiting and re-checks
//! - [`SubcellSolver`], [`AdmissibilityOracle`]: the PDE and criterion seams
//! - [`Dmp`]: relaxed discrete maximum principle
//! - [`LimitedState`]: per-run subcells, admissibility, extrema and counters
//! - [`kernels`]: scatter/gather and face-integral building blocks

mod a_post;
mod detections;
pub mod kernels;
mod rollback;
mod state;
mod subcell;
mod traits;

pub use a_post::{DgDofs, Limiter, LimiterConfig, LimiterStats};
pub use detections::{Dmp, DmpConfig};
pub use rollback::{RollbackFace, surf_int_rb};
pub use state::{LimitedState, RunState};
pub use subcell::{
    AdvectionSubcellSolver, ElasticSubcellSolver, FaceSource, LimitInput, QuantityCoupling,
    SubcellScaling, fv_step, limit,
};
pub use traits::{AdmissibilityOracle, SubcellSolver, SubcellStep};
