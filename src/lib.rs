//! # dg-subcell
//!
//! A-posteriori subcell finite-volume limiter for discontinuous Galerkin
//! solvers that advance several independent runs ("fused runs") at once.
//!
//! After every DG step the caller flags per run which candidates are
//! admissible. The limiter then
//! - rolls back the DG face integrals of elements next to rejected
//!   neighbors and replaces them with subcell fluxes,
//! - recomputes rejected runs with a first-order subcell scheme and projects
//!   the result back to DG modes,
//! - re-checks the projection and tracks extrema and limiting counters.
//!
//! The crate provides:
//! - Strongly typed ids and const-generic tensors ([`types`])
//! - Mesh adjacency and the limited-plus numbering ([`mesh`])
//! - Legendre polynomials and Gauss-Lobatto quadrature ([`polynomial`])
//! - Subcell reference operators, including the line element ([`operators`])
//! - Flux solvers for advection and 1D elasticity ([`flux`])
//! - The limiter itself ([`solver::limiters`])

pub mod error;
pub mod flux;
pub mod mesh;
pub mod operators;
pub mod polynomial;
pub mod solver;
pub mod types;

pub use error::{LimiterError, Result};
pub use flux::{Advection, ElasticMaterial, ElementFluxSolvers, FluxSplitting, line_mesh_solvers};
pub use mesh::{ElementType, FaceCoupling, LimitedPlusConnect, LineMesh, MeshAdjacency};
pub use operators::{FluxMatrices, LineReference, SubcellConnect, SubcellOps, line_reference};
pub use solver::{
    AdmissibilityOracle, AdvectionSubcellSolver, DgDofs, Dmp, DmpConfig, ElasticSubcellSolver,
    LimitedState, Limiter, LimiterConfig, LimiterStats, RunState, SubcellSolver,
};
pub use types::{DofsDg, DofsSc, ElementIndex, ExtremaIndex, LimitedIndex, LimitedPlusIndex};
