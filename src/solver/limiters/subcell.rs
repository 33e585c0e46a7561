//! Subcell finite-volume update of a limited element.

use crate::flux::{ElementFluxSolvers, flux_sign, fs_id_ad};
use crate::mesh::ElementType;
use crate::operators::{SubcellConnect, SubcellOps};
use crate::types::{DofsDg, DofsSc, DofsSf, ElementIndex, FluxSolver, RunMask, SubGrid};

use super::kernels;
use super::traits::{SubcellSolver, SubcellStep};

/// Scaling of subface fluxes and net-updates of one element type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubcellScaling {
    /// `dt · SC / SF · c_topo`, applied to flux-solver products.
    pub flux: f64,
    /// `SC / SF · c_topo`, applied to net-updates, which are time-integrated.
    pub net_update: f64,
}

impl SubcellScaling {
    pub fn new<const SC: usize, const SF: usize>(dt: f64, element_type: ElementType) -> Self {
        let net_update = SC as f64 / SF as f64 * element_type.jacobian_correction();
        Self {
            flux: dt * net_update,
            net_update,
        }
    }
}

/// Where the ghost subcells of a face come from.
#[derive(Clone, Copy, Debug)]
pub enum FaceSource<'a, const Q: usize, const M: usize, const SF: usize, const R: usize> {
    /// A face neighbor, reconstructed from its previous DG solution.
    Neighbor {
        /// Previous DG DOFs of the neighbor.
        dofs_dg: &'a DofsDg<Q, M, R>,
        /// Neighbor-oriented face scatter.
        scatter: &'a [[f64; SF]; M],
        /// Stored face subcells and previous admissibility, if the neighbor
        /// is limited.
        stored: Option<(&'a DofsSf<Q, SF, R>, &'a RunMask<R>)>,
    },
    /// Domain boundary; the ghosts mirror the element's own face subcells.
    Boundary,
}

/// Per-element input of [`limit`].
#[derive(Clone, Copy, Debug)]
pub struct LimitInput<'a, const F: usize, const M: usize, const SF: usize, const Q: usize, const R: usize>
{
    pub element: ElementIndex,
    /// Previous DG DOFs of the element.
    pub dofs_prev: &'a DofsDg<Q, M, R>,
    /// Admissibility of the element's previous solution.
    pub adm_prev: &'a RunMask<R>,
    pub faces: [FaceSource<'a, Q, M, SF, R>; F],
    /// Faces that are internal boundaries.
    pub rupture: [bool; F],
    pub solvers: &'a ElementFluxSolvers<Q, F>,
}

/// Compute the limited subcell solution of one element.
///
/// On entry `dofs_sc` holds the element's stored subcells, which replace the
/// DG scatter for runs with an inadmissible previous solution. On exit it
/// holds the updated subcells of all runs. Returns the faces that used
/// net-updates.
#[allow(clippy::too_many_arguments)]
pub fn limit<
    S: SubcellSolver,
    const F: usize,
    const M: usize,
    const SC: usize,
    const SF: usize,
    const SG: usize,
    const Q: usize,
    const R: usize,
>(
    strategy: &S,
    dt: f64,
    scaling: SubcellScaling,
    ops: &SubcellOps<M, SC, SF, F>,
    connect: &SubcellConnect<F, SC, SF>,
    input: &LimitInput<'_, F, M, SF, Q, R>,
    dofs_sc: &mut DofsSc<Q, SC, R>,
) -> [bool; F] {
    const { assert!(SG == SC + F * SF) };

    let mut sub_cell = [[[0.0; R]; SC]; Q];
    kernels::scatter_replace(input.dofs_prev, &ops.scatter, dofs_sc, input.adm_prev, &mut sub_cell);

    let mut sub_grid: SubGrid<Q, SG, R> = [[[0.0; R]; SG]; Q];
    for q in 0..Q {
        sub_grid[q][..SC].copy_from_slice(&sub_cell[q]);
    }

    let mut net_updates = [false; F];
    for fa in 0..F {
        let mut own: DofsSf<Q, SF, R> = [[[0.0; R]; SF]; Q];
        for q in 0..Q {
            for sf in 0..SF {
                own[q][sf] = sub_cell[q][connect.fa_sc[fa][sf]];
            }
        }

        let mut ghost = own;
        if let FaceSource::Neighbor {
            dofs_dg,
            scatter,
            stored,
        } = input.faces[fa]
        {
            match stored {
                Some((stored, adm)) => {
                    kernels::scatter_replace_fa(dofs_dg, scatter, stored, adm, &mut ghost)
                }
                None => kernels::scatter_fa(dofs_dg, scatter, &mut ghost),
            }
        }

        if input.rupture[fa] {
            let mut update = [[[0.0; R]; SF]; Q];
            if strategy.net_update(dt, input.element, fa, &own, &ghost, &mut update) {
                ghost = update;
                net_updates[fa] = true;
            }
        }

        for q in 0..Q {
            sub_grid[q][SC + fa * SF..SC + (fa + 1) * SF].copy_from_slice(&ghost[q]);
        }
    }

    let ctx = SubcellStep {
        dt,
        element: input.element,
        scaling,
        sc_sf_sc: &connect.sc_sf_sc,
        sc_ty_sf: &connect.sc_ty_sf,
        net_updates: &net_updates,
        solvers: input.solvers,
    };
    strategy.step(&ctx, &sub_grid, dofs_sc);
    if net_updates.iter().any(|&n| n) {
        strategy.super_cell(&ctx, &sub_grid, dofs_sc);
    }

    net_updates
}

/// How flux solvers couple the quantities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantityCoupling {
    /// Full `Q×Q` solver matrices.
    Full,
    /// Only the diagonal; quantities evolve independently.
    Diagonal,
}

/// First-order explicit update on the subgrid.
///
/// For every subcell and face, `u += s · (A_ty · u + A_ad · u_ne)` with
/// `s = ±scaling.flux`, or `u += scaling.net_update · n` if the face's ghost
/// holds a net-update `n`.
pub fn fv_step<const F: usize, const SC: usize, const SG: usize, const Q: usize, const R: usize>(
    ctx: &SubcellStep<'_, F, SC, Q>,
    sub_grid: &SubGrid<Q, SG, R>,
    coupling: QuantityCoupling,
    dofs_sc: &mut DofsSc<Q, SC, R>,
) {
    let sf_per_face = (SG - SC) / F;

    for q in 0..Q {
        dofs_sc[q].copy_from_slice(&sub_grid[q][..SC]);
    }

    for sc in 0..SC {
        for fa in 0..F {
            let ne = ctx.sc_sf_sc[sc][fa];
            debug_assert!(ne < SG);

            if ne >= SC && ctx.net_updates[(ne - SC) / sf_per_face] {
                for q in 0..Q {
                    for r in 0..R {
                        dofs_sc[q][sc][r] += ctx.scaling.net_update * sub_grid[q][ne][r];
                    }
                }
                continue;
            }

            let id = ctx.sc_ty_sf[sc][fa];
            let id_ad = fs_id_ad::<F>(id);
            let s = flux_sign(id, id_ad, ctx.scaling.flux);
            add_flux(ctx.solvers.solver(id), sub_grid, sc, s, coupling, sc, dofs_sc);
            add_flux(ctx.solvers.solver(id_ad), sub_grid, ne, s, coupling, sc, dofs_sc);
        }
    }
}

#[inline]
fn add_flux<const SC: usize, const SG: usize, const Q: usize, const R: usize>(
    fs: &FluxSolver<Q>,
    sub_grid: &SubGrid<Q, SG, R>,
    from: usize,
    scale: f64,
    coupling: QuantityCoupling,
    to: usize,
    dofs_sc: &mut DofsSc<Q, SC, R>,
) {
    for q in 0..Q {
        let q2s = match coupling {
            QuantityCoupling::Full => 0..Q,
            QuantityCoupling::Diagonal => q..q + 1,
        };
        for q2 in q2s {
            let a = fs[q][q2] * scale;
            if a == 0.0 {
                continue;
            }
            for r in 0..R {
                dofs_sc[q][to][r] += a * sub_grid[q2][from][r];
            }
        }
    }
}

/// Subcell solver of linear elasticity; stress and velocity are coupled.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElasticSubcellSolver;

impl SubcellSolver for ElasticSubcellSolver {
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
    ) {
        fv_step(ctx, sub_grid, QuantityCoupling::Full, dofs_sc);
    }

    fn name(&self) -> &'static str {
        "elastic"
    }
}

/// Subcell solver of linear advection; every quantity is advected on its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdvectionSubcellSolver;

impl SubcellSolver for AdvectionSubcellSolver {
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
    ) {
        fv_step(ctx, sub_grid, QuantityCoupling::Diagonal, dofs_sc);
    }

    fn name(&self) -> &'static str {
        "advection"
    }
}
