//! Gauss-Lobatto-Legendre quadrature.
//!
//! The N+1 GLL nodes are the roots of (1-x²)P'_N(x) and integrate
//! polynomials up to degree 2N-1 exactly. The limiter uses them to compute
//! exact subcell averages of modal basis functions.

use std::f64::consts::PI;

use super::legendre::{legendre, legendre_and_derivative};

/// Compute the N+1 GLL nodes on [-1, 1] for polynomial order N.
///
/// Newton iteration on (1-x²)P'_N, seeded with Chebyshev-Lobatto points.
/// The Newton step simplifies to x += (1-x²)P'_N / (N(N+1) P_N).
pub fn gauss_lobatto_nodes(order: usize) -> Vec<f64> {
    let n = order;
    if n == 0 {
        return vec![0.0];
    }

    let mut nodes: Vec<f64> = (0..=n)
        .map(|j| -(PI * j as f64 / n as f64).cos())
        .collect();
    nodes[0] = -1.0;
    nodes[n] = 1.0;

    let nn = (n * (n + 1)) as f64;
    for x in nodes.iter_mut().take(n).skip(1) {
        for _ in 0..100 {
            let (p, dp) = legendre_and_derivative(n, *x);
            let step = (1.0 - *x * *x) * dp / (nn * p);
            *x += step;
            if step.abs() < 1e-15 {
                break;
            }
        }
    }

    nodes
}

/// GLL weights w_j = 2 / (N(N+1) P_N(x_j)²).
pub fn gauss_lobatto_weights(order: usize, nodes: &[f64]) -> Vec<f64> {
    let n = order;
    if n == 0 {
        return vec![2.0];
    }
    let nn = (n * (n + 1)) as f64;
    nodes
        .iter()
        .map(|&x| {
            let p = legendre(n, x);
            2.0 / (nn * p * p)
        })
        .collect()
}

/// Quadrature rule mapped to an interval.
#[derive(Clone, Debug)]
pub struct QuadratureRule {
    pub points: Vec<f64>,
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// GLL rule of order `order` on [a, b]; weights sum to b - a.
    pub fn gll_on(order: usize, a: f64, b: f64) -> Self {
        let nodes = gauss_lobatto_nodes(order);
        let weights = gauss_lobatto_weights(order, &nodes);
        let half = 0.5 * (b - a);
        Self {
            points: nodes.iter().map(|&r| a + (r + 1.0) * half).collect(),
            weights: weights.iter().map(|&w| w * half).collect(),
        }
    }

    /// Integrate `f` with the rule.
    pub fn integrate(&self, f: impl Fn(f64) -> f64) -> f64 {
        self.points
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(x))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_endpoints_and_symmetry() {
        for order in 1..=6 {
            let nodes = gauss_lobatto_nodes(order);
            assert_eq!(nodes.len(), order + 1);
            assert!((nodes[0] + 1.0).abs() < 1e-14);
            assert!((nodes[order] - 1.0).abs() < 1e-14);
            for i in 0..nodes.len() / 2 {
                assert!((nodes[i] + nodes[order - i]).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_weights_sum() {
        for order in 1..=6 {
            let nodes = gauss_lobatto_nodes(order);
            let sum: f64 = gauss_lobatto_weights(order, &nodes).iter().sum();
            assert!((sum - 2.0).abs() < 1e-13);
        }
    }

    #[test]
    fn test_exactness() {
        // order 3 integrates degree 5 exactly
        let rule = QuadratureRule::gll_on(3, 0.25, 0.75);
        let exact = (0.75_f64.powi(6) - 0.25_f64.powi(6)) / 6.0;
        assert!((rule.integrate(|x| x.powi(5)) - exact).abs() < 1e-14);
    }

    #[test]
    fn test_mapped_weights() {
        let rule = QuadratureRule::gll_on(4, 0.0, 0.2);
        let sum: f64 = rule.weights.iter().sum();
        assert!((sum - 0.2).abs() < 1e-14);
        assert!(rule.points.iter().all(|&x| (0.0..=0.2).contains(&x)));
    }
}
