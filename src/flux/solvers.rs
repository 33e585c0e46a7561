//! Per-element flux solvers and the subface flux-solver numbering.
//!
//! Subface types index the `4F` flux solvers of an element:
//!
//! | ids         | solver                                       |
//! |-------------|----------------------------------------------|
//! | `[0, F)`    | DG, own side of element face `ty`            |
//! | `[F, 2F)`   | DG, neighbor side of element face `ty - F`   |
//! | `[2F, 3F)`  | subcell, own side, oriented like face `ty - 2F` |
//! | `[3F, 4F)`  | subcell, neighbor side of face `ty - 3F`     |

use crate::mesh::LineMesh;
use crate::types::FluxSolver;

use super::traits::FluxSplitting;

/// Own and neighbor solvers of all faces of one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceSolvers<const Q: usize, const F: usize> {
    pub own: [FluxSolver<Q>; F],
    pub neigh: [FluxSolver<Q>; F],
}

/// DG and subcell solvers of one element, geometry-scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementFluxSolvers<const Q: usize, const F: usize> {
    pub dg: FaceSolvers<Q, F>,
    pub sc: FaceSolvers<Q, F>,
}

impl<const Q: usize, const F: usize> ElementFluxSolvers<Q, F> {
    /// Solvers of a homogeneous element, where subcell faces see the same
    /// material as the DG faces.
    pub fn homogeneous(dg: FaceSolvers<Q, F>) -> Self {
        Self { dg, sc: dg }
    }

    /// Solver of subface type `id`.
    #[inline]
    pub fn solver(&self, id: usize) -> &FluxSolver<Q> {
        debug_assert!(id < 4 * F);
        match id / F {
            0 => &self.dg.own[id],
            1 => &self.dg.neigh[id - F],
            2 => &self.sc.own[id - 2 * F],
            _ => &self.sc.neigh[id - 3 * F],
        }
    }
}

/// Flux-solver id on the other side of a subface of type `ty`.
#[inline]
pub const fn fs_id_ad<const F: usize>(ty: usize) -> usize {
    if ty < F {
        ty + F
    } else if ty < 2 * F {
        ty - F
    } else if ty < 3 * F {
        ty + F
    } else {
        ty - F
    }
}

/// Signed scaling of a subface flux: positive iff the own solver id is the
/// smaller one.
#[inline]
pub fn flux_sign(id_own: usize, id_ad: usize, scale: f64) -> f64 {
    if id_own < id_ad { scale } else { -scale }
}

/// Solvers of a line element of size `h`, scaled by `-1/h`.
///
/// Face 0 has outward normal -1, face 1 has +1.
pub fn line_solvers<const Q: usize>(
    physics: &impl FluxSplitting<Q>,
    h: f64,
) -> ElementFluxSolvers<Q, 2> {
    let scale = -1.0 / h;
    let scaled = |a: FluxSolver<Q>| a.map(|row| row.map(|v| v * scale));
    let [own_0, neigh_0] = physics.split(-1.0);
    let [own_1, neigh_1] = physics.split(1.0);
    ElementFluxSolvers::homogeneous(FaceSolvers {
        own: [scaled(own_0), scaled(own_1)],
        neigh: [scaled(neigh_0), scaled(neigh_1)],
    })
}

/// Solvers of every element of a line mesh.
pub fn line_mesh_solvers<const Q: usize>(
    physics: &impl FluxSplitting<Q>,
    mesh: &LineMesh,
) -> Vec<ElementFluxSolvers<Q, 2>> {
    mesh.element_sizes
        .iter()
        .map(|&h| line_solvers(physics, h))
        .collect()
}
