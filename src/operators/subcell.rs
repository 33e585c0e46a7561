//! Subcell operators, flux matrices and subcell connectivity.
//!
//! These are the reference-element tables the limiter consumes. They are
//! built once per element type and order, either by [`super::line_reference`]
//! or by an external builder for higher-dimensional elements.

use crate::error::{LimiterError, Result};

/// Scatter, gather and subface operators of a reference element.
#[derive(Clone, Debug)]
pub struct SubcellOps<const M: usize, const SC: usize, const SF: usize, const F: usize> {
    /// Modal to subcell: `u[sc] = Σ_m scatter[m][sc] · d[m]`.
    pub scatter: [[f64; SC]; M],
    /// Subcell to modal: `d[m] = Σ_sc gather[sc][m] · u[sc]`.
    pub gather: [[f64; M]; SC],
    /// Modal to the subcells touching face `fa`, in the face's own subface order.
    pub scatter_sf: [[[f64; SF]; M]; F],
    /// Modal to the subcells touching a neighbor's face, ordered like the
    /// receiving element's subfaces. Indexed by `v_id * F + f_id`.
    pub scatter_sf_ad: Vec<[[f64; SF]; M]>,
    /// Subface flux to modal face contribution, `[fa][sf][m]`.
    pub sf_int: [[[f64; M]; SF]; F],
}

impl<const M: usize, const SC: usize, const SF: usize, const F: usize> SubcellOps<M, SC, SF, F> {
    /// Neighbor-oriented face scatter for vertex combination `v_id` and
    /// neighbor face `f_id`.
    #[inline]
    pub fn scatter_ad(&self, v_id: usize, f_id: usize) -> &[[f64; SF]; M] {
        &self.scatter_sf_ad[v_id * F + f_id]
    }

    /// Number of vertex combinations covered by `scatter_sf_ad`.
    pub fn n_vertex_combos(&self) -> usize {
        self.scatter_sf_ad.len() / F
    }

    /// Check that the neighbor scatter table is complete.
    pub fn validate(&self) -> Result<()> {
        if self.scatter_sf_ad.is_empty() || self.scatter_sf_ad.len() % F != 0 {
            return Err(LimiterError::InvalidConnectivity(format!(
                "{} neighbor scatter operators do not cover {F} faces",
                self.scatter_sf_ad.len()
            )));
        }
        Ok(())
    }
}

/// DG flux matrices of a reference element.
#[derive(Clone, Debug)]
pub struct FluxMatrices<const M: usize> {
    /// Local contribution, one matrix per face.
    pub local: Vec<[[f64; M]; M]>,
    /// Neighbor contribution, indexed by [`FluxMatrices::neigh_id`].
    pub neigh: Vec<[[f64; M]; M]>,
    /// Number of faces.
    pub n_faces: usize,
    /// Number of vertex combinations of a shared face.
    pub n_vertex_combos: usize,
}

impl<const M: usize> FluxMatrices<M> {
    /// Id of the neighboring flux matrix for local face `fa`, vertex
    /// combination `v_id` and neighbor face `f_id`.
    #[inline]
    pub fn neigh_id(&self, fa: usize, v_id: usize, f_id: usize) -> usize {
        (fa * self.n_vertex_combos + v_id) * self.n_faces + f_id
    }

    /// Neighboring flux matrix, see [`FluxMatrices::neigh_id`].
    #[inline]
    pub fn neighbor(&self, fa: usize, v_id: usize, f_id: usize) -> &[[f64; M]; M] {
        &self.neigh[self.neigh_id(fa, v_id, f_id)]
    }

    /// Check table sizes.
    pub fn validate(&self) -> Result<()> {
        if self.local.len() != self.n_faces {
            return Err(LimiterError::length_mismatch(
                "local flux matrices",
                self.n_faces,
                self.local.len(),
            ));
        }
        let expected = self.n_faces * self.n_vertex_combos * self.n_faces;
        if self.neigh.len() != expected {
            return Err(LimiterError::length_mismatch(
                "neighboring flux matrices",
                expected,
                self.neigh.len(),
            ));
        }
        Ok(())
    }
}

/// Subcell adjacency of a reference element.
#[derive(Clone, Debug)]
pub struct SubcellConnect<const F: usize, const SC: usize, const SF: usize> {
    /// Subgrid id across each subcell face. Ids `>= SC` are ghost cells
    /// `SC + fa * SF + sf`.
    pub sc_sf_sc: [[usize; F]; SC],
    /// Flux-solver type of each subcell face, in `0..4F`.
    pub sc_ty_sf: [[usize; F]; SC],
    /// Subcells touching each element face, one per subface.
    pub fa_sc: [[usize; SF]; F],
}

impl<const F: usize, const SC: usize, const SF: usize> SubcellConnect<F, SC, SF> {
    /// Number of subgrid cells.
    pub const SUBGRID: usize = SC + F * SF;

    /// Check every id against its range.
    pub fn validate(&self) -> Result<()> {
        for (sc, (adj, ty)) in self.sc_sf_sc.iter().zip(&self.sc_ty_sf).enumerate() {
            for fa in 0..F {
                if adj[fa] >= Self::SUBGRID || adj[fa] == sc {
                    return Err(LimiterError::InvalidConnectivity(format!(
                        "face {fa} of subcell {sc} points to subgrid cell {}",
                        adj[fa]
                    )));
                }
                if ty[fa] >= 4 * F {
                    return Err(LimiterError::InvalidConnectivity(format!(
                        "face {fa} of subcell {sc} has flux-solver type {}",
                        ty[fa]
                    )));
                }
            }
        }
        if let Some(sc) = self.fa_sc.iter().flatten().find(|&&sc| sc >= SC) {
            return Err(LimiterError::InvalidConnectivity(format!(
                "face subcell {sc} is out of range"
            )));
        }
        Ok(())
    }
}
