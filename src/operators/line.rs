//! Reference operators of the line element.
//!
//! Modes are the orthonormal Legendre polynomials on [0, 1]; the element is
//! split into `SC = 2M - 1` equal subcells. Face 0 sits at x = 0, face 1 at
//! x = 1, and each face has a single subface.

use faer::{Mat, linalg::solvers::Solve};

use crate::error::{LimiterError, Result};
use crate::polynomial::{QuadratureRule, modal_basis, orthonormal_mode};

use super::subcell::{FluxMatrices, SubcellConnect, SubcellOps};

/// Line faces.
pub const LINE_FACES: usize = 2;

/// Tables of the line reference element.
#[derive(Clone, Debug)]
pub struct LineReference<const M: usize, const SC: usize> {
    pub ops: SubcellOps<M, SC, 1, LINE_FACES>,
    pub flux_matrices: FluxMatrices<M>,
    pub connect: SubcellConnect<LINE_FACES, SC, 1>,
}

/// Build the subcell operators, flux matrices and subcell connectivity of a
/// line element with `M` modes.
pub fn line_reference<const M: usize, const SC: usize>() -> Result<LineReference<M, SC>> {
    if M == 0 || SC + 1 != 2 * M {
        return Err(LimiterError::LineSubcells {
            modes: M,
            expected: (2 * M).saturating_sub(1),
            actual: SC,
        });
    }

    let scatter = line_scatter::<M, SC>();
    let gather = least_squares_gather::<M, SC>(&scatter)?;

    let face_x = [0.0, 1.0];
    let fa_sc = [[0], [SC - 1]];

    let scatter_sf: [[[f64; 1]; M]; LINE_FACES] =
        std::array::from_fn(|fa| std::array::from_fn(|m| [scatter[m][fa_sc[fa][0]]]));
    let sf_int: [[[f64; M]; 1]; LINE_FACES] = std::array::from_fn(|fa| [gather[fa_sc[fa][0]]]);

    let ops = SubcellOps {
        scatter,
        gather,
        scatter_sf,
        // points carry a single vertex combination
        scatter_sf_ad: scatter_sf.to_vec(),
        sf_int,
    };

    let phi: [[f64; M]; LINE_FACES] = face_x.map(modal_basis::<M>);
    let outer = |a: &[f64; M], b: &[f64; M]| -> [[f64; M]; M] {
        std::array::from_fn(|m| std::array::from_fn(|m2| a[m] * b[m2]))
    };
    let local = (0..LINE_FACES).map(|fa| outer(&phi[fa], &phi[fa])).collect();
    let mut neigh = Vec::with_capacity(LINE_FACES * LINE_FACES);
    for fa in 0..LINE_FACES {
        for f_id in 0..LINE_FACES {
            neigh.push(outer(&phi[fa], &phi[f_id]));
        }
    }
    let flux_matrices = FluxMatrices {
        local,
        neigh,
        n_faces: LINE_FACES,
        n_vertex_combos: 1,
    };

    let connect = SubcellConnect {
        sc_sf_sc: std::array::from_fn(|sc| {
            [
                if sc == 0 { SC } else { sc - 1 },
                if sc == SC - 1 { SC + 1 } else { sc + 1 },
            ]
        }),
        sc_ty_sf: std::array::from_fn(|sc| {
            [
                if sc == 0 { 0 } else { 2 * LINE_FACES },
                if sc == SC - 1 { 1 } else { 2 * LINE_FACES + 1 },
            ]
        }),
        fa_sc,
    };

    ops.validate()?;
    flux_matrices.validate()?;
    connect.validate()?;

    Ok(LineReference {
        ops,
        flux_matrices,
        connect,
    })
}

/// Exact subcell averages of every mode.
fn line_scatter<const M: usize, const SC: usize>() -> [[f64; SC]; M] {
    let width = 1.0 / SC as f64;
    // M + 1 GLL points integrate degree 2M - 1 exactly
    let rules: Vec<QuadratureRule> = (0..SC)
        .map(|sc| QuadratureRule::gll_on(M, sc as f64 * width, (sc + 1) as f64 * width))
        .collect();

    std::array::from_fn(|m| {
        std::array::from_fn(|sc| rules[sc].integrate(|x| orthonormal_mode(m, x)) / width)
    })
}

/// Left inverse of the scatter operator via the normal equations.
fn least_squares_gather<const M: usize, const SC: usize>(
    scatter: &[[f64; SC]; M],
) -> Result<[[f64; M]; SC]> {
    // s[(sc, m)] maps modes to subcells
    let s = Mat::<f64>::from_fn(SC, M, |sc, m| scatter[m][sc]);

    let sts = s.as_ref().transpose() * s.as_ref();
    let st = s.as_ref().transpose().to_owned();

    let lu = sts.as_ref().full_piv_lu();
    let g = lu.solve(&st);

    let gather: [[f64; M]; SC] = std::array::from_fn(|sc| std::array::from_fn(|m| g[(m, sc)]));

    // gather ∘ scatter must reproduce the modes
    let mut residual = 0.0_f64;
    for m in 0..M {
        for m2 in 0..M {
            let gs: f64 = (0..SC).map(|sc| gather[sc][m] * scatter[m2][sc]).sum();
            let id = if m == m2 { 1.0 } else { 0.0 };
            residual = residual.max((gs - id).abs());
        }
    }
    if !(residual < 1e-9) {
        return Err(LimiterError::SingularScatter { residual });
    }

    Ok(gather)
}
