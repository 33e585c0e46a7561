//! Polynomial evaluation and quadrature.
//!
//! This module provides:
//! - Legendre polynomials and the orthonormal modal basis on [0, 1]
//! - Gauss-Lobatto-Legendre nodes, weights and mapped quadrature rules

mod legendre;
mod nodes;

pub use legendre::{legendre, legendre_and_derivative, modal_basis, orthonormal_mode};
pub use nodes::{QuadratureRule, gauss_lobatto_nodes, gauss_lobatto_weights};
