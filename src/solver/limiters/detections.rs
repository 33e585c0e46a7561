//! Discrete maximum principle (DMP) admissibility check.

use crate::types::{Extrema, ExtremaIndex, RunMask};

use super::traits::AdmissibilityOracle;

/// Relaxation of the DMP bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DmpConfig {
    /// Absolute relaxation.
    pub delta_abs: f64,
    /// Relaxation relative to the width `max - min` of the envelope.
    pub delta_rel: f64,
}

impl Default for DmpConfig {
    fn default() -> Self {
        Self {
            delta_abs: 1e-4,
            delta_rel: 1e-3,
        }
    }
}

impl DmpConfig {
    pub fn new(delta_abs: f64, delta_rel: f64) -> Self {
        Self {
            delta_abs,
            delta_rel,
        }
    }

    /// Tolerance for an envelope `[min, max]`.
    #[inline]
    pub fn delta(&self, min: f64, max: f64) -> f64 {
        self.delta_abs.max(self.delta_rel * (max - min))
    }
}

/// Discrete maximum principle.
///
/// A run is admissible iff, for every quantity, the candidate's extrema lie
/// within the envelope of the previous extrema of the element and its stencil,
/// relaxed by [`DmpConfig::delta`]. Non-finite candidates are never admissible.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dmp {
    pub config: DmpConfig,
}

impl Dmp {
    pub fn new(config: DmpConfig) -> Self {
        Self { config }
    }
}

impl AdmissibilityOracle for Dmp {
    fn admissible<const Q: usize, const R: usize>(
        &self,
        candidate: &Extrema<Q, R>,
        own_prev: &Extrema<Q, R>,
        prev: &[Extrema<Q, R>],
        stencil: &[ExtremaIndex],
    ) -> RunMask<R> {
        let mut lo = own_prev[0];
        let mut hi = own_prev[1];
        for &ex in stencil {
            let ext = &prev[ex.get()];
            for q in 0..Q {
                for r in 0..R {
                    lo[q][r] = lo[q][r].min(ext[0][q][r]);
                    hi[q][r] = hi[q][r].max(ext[1][q][r]);
                }
            }
        }

        let mut adm = [true; R];
        for q in 0..Q {
            for r in 0..R {
                let (c_min, c_max) = (candidate[0][q][r], candidate[1][q][r]);
                if !c_min.is_finite() || !c_max.is_finite() {
                    log::warn!("non-finite candidate extrema (quantity {q}, run {r})");
                    adm[r] = false;
                    continue;
                }
                let delta = self.config.delta(lo[q][r], hi[q][r]);
                if c_min < lo[q][r] - delta || c_max > hi[q][r] + delta {
                    adm[r] = false;
                }
            }
        }
        adm
    }
}
