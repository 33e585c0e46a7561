//! Limiter stages of the DG solver.
//!
//! # Submodules
//!
//! - [`limiters`]: a-posteriori subcell limiter, its state and kernels

pub mod limiters;

pub use limiters::{
    AdmissibilityOracle, AdvectionSubcellSolver, DgDofs, Dmp, DmpConfig, ElasticSubcellSolver,
    LimitedState, Limiter, LimiterConfig, LimiterStats, RunState, SubcellSolver,
};
