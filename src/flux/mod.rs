//! Flux solvers consumed by the limiter.
//!
//! Provides:
//! - The [`FluxSplitting`] trait for linear systems with one-sided flux matrices
//! - Upwind advection ([`Advection`]) and 1D elasticity ([`ElasticMaterial`])
//! - Per-element DG and subcell solvers and the `4F` subface numbering

mod elastic;
mod solvers;
pub mod traits;
mod upwind;

pub use elastic::ElasticMaterial;
pub use solvers::{
    ElementFluxSolvers, FaceSolvers, flux_sign, fs_id_ad, line_mesh_solvers, line_solvers,
};
pub use traits::FluxSplitting;
pub use upwind::{Advection, upwind_flux};
