//! Upwind flux of 1D linear elasticity.
//!
//! Quantities are stress σ and particle velocity v:
//! σ_t - (λ + 2μ) v_x = 0 and v_t - σ_x / ρ = 0, i.e. q_t + A q_x = 0 with
//! A = [[0, -(λ+2μ)], [-1/ρ, 0]]. A has eigenvalues ±c, c = sqrt((λ+2μ)/ρ),
//! and |A| = c I, which makes the upwind splitting
//! A⁻ = ½ (nA + cI), A⁺ = ½ (nA - cI).

use crate::types::FluxSolver;

use super::traits::FluxSplitting;

/// Homogeneous isotropic material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElasticMaterial {
    /// First Lamé parameter.
    pub lambda: f64,
    /// Shear modulus.
    pub mu: f64,
    /// Density.
    pub rho: f64,
}

impl ElasticMaterial {
    pub fn new(lambda: f64, mu: f64, rho: f64) -> Self {
        Self { lambda, mu, rho }
    }

    /// P-wave speed.
    pub fn wave_speed(&self) -> f64 {
        ((self.lambda + 2.0 * self.mu) / self.rho).sqrt()
    }

    /// Jacobian of the flux.
    pub fn jacobian(&self) -> FluxSolver<2> {
        [[0.0, -(self.lambda + 2.0 * self.mu)], [-1.0 / self.rho, 0.0]]
    }
}

impl FluxSplitting<2> for ElasticMaterial {
    fn split(&self, normal: f64) -> [FluxSolver<2>; 2] {
        let a = self.jacobian();
        let c = self.wave_speed();
        let side = |sign: f64| -> FluxSolver<2> {
            std::array::from_fn(|i| {
                std::array::from_fn(|j| {
                    let diag = if i == j { sign * c } else { 0.0 };
                    0.5 * (normal * a[i][j] + diag)
                })
            })
        };
        [side(1.0), side(-1.0)]
    }
}
