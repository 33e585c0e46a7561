//! Subcell kernels.
//!
//! Allocation-free operators between modal DOFs, subcell averages and
//! subface values. The run dimension is innermost in every loop.

use crate::types::{DofsDg, DofsSc, DofsSf, Extrema, FluxSolver, RunMask, empty_extrema};

/// Scatter modal DOFs to subcell averages.
pub fn scatter<const Q: usize, const M: usize, const SC: usize, const R: usize>(
    dofs: &DofsDg<Q, M, R>,
    scatter: &[[f64; SC]; M],
    out: &mut DofsSc<Q, SC, R>,
) {
    for q in 0..Q {
        for sc in 0..SC {
            out[q][sc] = [0.0; R];
            for m in 0..M {
                let s = scatter[m][sc];
                for r in 0..R {
                    out[q][sc][r] += s * dofs[q][m][r];
                }
            }
        }
    }
}

/// Scatter modal DOFs, taking `stored` subcells for runs with `adm[r] == false`.
pub fn scatter_replace<const Q: usize, const M: usize, const SC: usize, const R: usize>(
    dofs: &DofsDg<Q, M, R>,
    scatter_op: &[[f64; SC]; M],
    stored: &DofsSc<Q, SC, R>,
    adm: &RunMask<R>,
    out: &mut DofsSc<Q, SC, R>,
) {
    scatter(dofs, scatter_op, out);
    replace(stored, adm, out);
}

/// Scatter modal DOFs to the subcells touching one face.
pub fn scatter_fa<const Q: usize, const M: usize, const SF: usize, const R: usize>(
    dofs: &DofsDg<Q, M, R>,
    scatter_sf: &[[f64; SF]; M],
    out: &mut DofsSf<Q, SF, R>,
) {
    // same contraction, subfaces in place of subcells
    scatter(dofs, scatter_sf, out);
}

/// Face scatter with replacement by stored face subcells where `adm[r] == false`.
pub fn scatter_replace_fa<const Q: usize, const M: usize, const SF: usize, const R: usize>(
    dofs: &DofsDg<Q, M, R>,
    scatter_sf: &[[f64; SF]; M],
    stored: &DofsSf<Q, SF, R>,
    adm: &RunMask<R>,
    out: &mut DofsSf<Q, SF, R>,
) {
    scatter_fa(dofs, scatter_sf, out);
    replace(stored, adm, out);
}

fn replace<const Q: usize, const N: usize, const R: usize>(
    stored: &[[[f64; R]; N]; Q],
    adm: &RunMask<R>,
    out: &mut [[[f64; R]; N]; Q],
) {
    for q in 0..Q {
        for n in 0..N {
            for r in 0..R {
                if !adm[r] {
                    out[q][n][r] = stored[q][n][r];
                }
            }
        }
    }
}

/// Gather subcell averages to modal DOFs.
pub fn gather<const Q: usize, const M: usize, const SC: usize, const R: usize>(
    dofs_sc: &DofsSc<Q, SC, R>,
    gather: &[[f64; M]; SC],
    out: &mut DofsDg<Q, M, R>,
) {
    for q in 0..Q {
        out[q] = [[0.0; R]; M];
        for sc in 0..SC {
            for m in 0..M {
                let g = gather[sc][m];
                for r in 0..R {
                    out[q][m][r] += g * dofs_sc[q][sc][r];
                }
            }
        }
    }
}

/// Project subface fluxes of one face to modal space, scaled by `scale`.
pub fn sf_int<const Q: usize, const M: usize, const SF: usize, const R: usize>(
    fluxes: &DofsSf<Q, SF, R>,
    sf_int: &[[f64; M]; SF],
    scale: f64,
    out: &mut DofsDg<Q, M, R>,
) {
    for q in 0..Q {
        out[q] = [[0.0; R]; M];
        for sf in 0..SF {
            for m in 0..M {
                let s = sf_int[sf][m] * scale;
                for r in 0..R {
                    out[q][m][r] += s * fluxes[q][sf][r];
                }
            }
        }
    }
}

/// DG surface integral of one face side, accumulated into `out`:
/// `out[q][m] += Σ_m2 f_mat[m][m2] Σ_q2 fs[q][q2] t_dofs[q2][m2]`.
pub fn surf_int<const Q: usize, const M: usize, const R: usize>(
    f_mat: &[[f64; M]; M],
    fs: &FluxSolver<Q>,
    t_dofs: &DofsDg<Q, M, R>,
    out: &mut DofsDg<Q, M, R>,
) {
    let mut flux = [[[0.0; R]; M]; Q];
    for q in 0..Q {
        for q2 in 0..Q {
            let a = fs[q][q2];
            if a == 0.0 {
                continue;
            }
            for m2 in 0..M {
                for r in 0..R {
                    flux[q][m2][r] += a * t_dofs[q2][m2][r];
                }
            }
        }
    }
    for q in 0..Q {
        for m in 0..M {
            for m2 in 0..M {
                let f = f_mat[m][m2];
                for r in 0..R {
                    out[q][m][r] += f * flux[q][m2][r];
                }
            }
        }
    }
}

/// `out[q][n] += scale · Σ_q2 fs[q][q2] u[q2][n]` for every run.
pub fn solver_mul_add<const Q: usize, const N: usize, const R: usize>(
    fs: &FluxSolver<Q>,
    u: &[[[f64; R]; N]; Q],
    scale: f64,
    out: &mut [[[f64; R]; N]; Q],
) {
    for q in 0..Q {
        for q2 in 0..Q {
            let a = fs[q][q2] * scale;
            if a == 0.0 {
                continue;
            }
            for n in 0..N {
                for r in 0..R {
                    out[q][n][r] += a * u[q2][n][r];
                }
            }
        }
    }
}

/// Extrema over the subcells.
pub fn sc_extrema<const Q: usize, const SC: usize, const R: usize>(
    dofs_sc: &DofsSc<Q, SC, R>,
) -> Extrema<Q, R> {
    let mut ext = empty_extrema();
    let mut nan = [[false; R]; Q];
    for q in 0..Q {
        for sc in 0..SC {
            for r in 0..R {
                let v = dofs_sc[q][sc][r];
                ext[0][q][r] = ext[0][q][r].min(v);
                ext[1][q][r] = ext[1][q][r].max(v);
                nan[q][r] |= v.is_nan();
            }
        }
    }
    // min/max drop NaN, keep it visible to the oracle
    for q in 0..Q {
        for r in 0..R {
            if nan[q][r] {
                ext[0][q][r] = f64::NAN;
                ext[1][q][r] = f64::NAN;
            }
        }
    }
    ext
}

/// Extrema of a DG solution, evaluated on its subcell scatter.
///
/// The scattered subcells are left in `sc_scratch`.
pub fn dg_extrema<const Q: usize, const M: usize, const SC: usize, const R: usize>(
    dofs: &DofsDg<Q, M, R>,
    scatter_op: &[[f64; SC]; M],
    sc_scratch: &mut DofsSc<Q, SC, R>,
) -> Extrema<Q, R> {
    scatter(dofs, scatter_op, sc_scratch);
    sc_extrema(sc_scratch)
}
