//! Rollback of DG face integrals next to limited neighbors.
//!
//! When a neighbor's candidate is rejected, the neighbor will be advanced
//! with subcell fluxes. For the shared face to stay conservative, the
//! element's own DG face integral is replaced by the projection of the same
//! subcell fluxes, in exactly the runs the neighbor rejected.

use crate::types::{DofsDg, DofsSf, FluxSolver, RunMask, any_false};

use super::kernels;
use super::subcell::SubcellScaling;

/// Operators and data of one face, seen from the element being corrected.
#[derive(Clone, Copy, Debug)]
pub struct RollbackFace<'a, const Q: usize, const M: usize, const SF: usize, const R: usize> {
    /// Previous admissibility of the neighbor.
    pub adm_ad_prev: &'a RunMask<R>,
    /// Candidate admissibility of the neighbor.
    pub adm_ad_cand: &'a RunMask<R>,
    /// Local DG flux matrix of the face.
    pub f_mat: &'a [[f64; M]; M],
    /// Neighboring DG flux matrix of the face.
    pub f_mat_ad: &'a [[f64; M]; M],
    /// Face scatter of the element.
    pub scatter_sf: &'a [[f64; SF]; M],
    /// Neighbor-oriented face scatter of the neighbor.
    pub scatter_sf_ad: &'a [[f64; SF]; M],
    /// Subface integration of the face.
    pub sf_int: &'a [[f64; M]; SF],
    /// Own flux solver of the face.
    pub fs: &'a FluxSolver<Q>,
    /// Neighbor flux solver of the face.
    pub fs_ad: &'a FluxSolver<Q>,
    /// Time-integrated DOFs of the element.
    pub t_dofs: &'a DofsDg<Q, M, R>,
    /// Time-integrated DOFs of the neighbor.
    pub t_dofs_ad: &'a DofsDg<Q, M, R>,
    /// Stored face subcells of the neighbor.
    pub t_dofs_sc_ad: &'a DofsSf<Q, SF, R>,
    /// Previous DOFs of the element.
    pub dofs_prev: &'a DofsDg<Q, M, R>,
    /// Previous DOFs of the neighbor.
    pub dofs_prev_ad: &'a DofsDg<Q, M, R>,
}

/// Replace the DG face integral of `io_dofs` by the subcell face integral
/// for every run whose neighbor candidate is inadmissible.
///
/// `net_update` is asked for a time-integrated substitute of the subface
/// fluxes (given the element's and the neighbor's face subcells) and returns
/// `false` when the face uses regular fluxes.
///
/// Returns `false` without touching `io_dofs` if every neighbor run is
/// admissible.
pub fn surf_int_rb<const Q: usize, const M: usize, const SF: usize, const R: usize>(
    scaling: SubcellScaling,
    face: &RollbackFace<'_, Q, M, SF, R>,
    net_update: impl FnOnce(&DofsSf<Q, SF, R>, &DofsSf<Q, SF, R>, &mut DofsSf<Q, SF, R>) -> bool,
    io_dofs: &mut DofsDg<Q, M, R>,
) -> bool {
    if !any_false(face.adm_ad_cand) {
        return false;
    }

    // the element is trusted: a limited element replaces its own solution anyway
    let mut sc_own = [[[0.0; R]; SF]; Q];
    kernels::scatter_fa(face.dofs_prev, face.scatter_sf, &mut sc_own);

    let mut sc_ad = [[[0.0; R]; SF]; Q];
    kernels::scatter_replace_fa(
        face.dofs_prev_ad,
        face.scatter_sf_ad,
        face.t_dofs_sc_ad,
        face.adm_ad_prev,
        &mut sc_ad,
    );

    let mut s_int_sc = [[[0.0; R]; M]; Q];
    let mut update = [[[0.0; R]; SF]; Q];
    if net_update(&sc_own, &sc_ad, &mut update) {
        kernels::sf_int(&update, face.sf_int, scaling.net_update, &mut s_int_sc);
    } else {
        let mut fluxes = [[[0.0; R]; SF]; Q];
        kernels::solver_mul_add(face.fs, &sc_own, 1.0, &mut fluxes);
        kernels::solver_mul_add(face.fs_ad, &sc_ad, 1.0, &mut fluxes);
        kernels::sf_int(&fluxes, face.sf_int, scaling.flux, &mut s_int_sc);
    }

    let mut s_int_dg = [[[0.0; R]; M]; Q];
    kernels::surf_int(face.f_mat, face.fs, face.t_dofs, &mut s_int_dg);
    kernels::surf_int(face.f_mat_ad, face.fs_ad, face.t_dofs_ad, &mut s_int_dg);

    for q in 0..Q {
        for m in 0..M {
            for r in 0..R {
                if !face.adm_ad_cand[r] {
                    io_dofs[q][m][r] += s_int_sc[q][m][r] - s_int_dg[q][m][r];
                }
            }
        }
    }

    true
}
