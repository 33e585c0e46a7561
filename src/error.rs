//! Setup-time errors.
//!
//! The limiter's per-step path has no recoverable failures; everything that
//! can go wrong with caller data is checked once, when operators,
//! connectivity and state are assembled.

use thiserror::Error;

use crate::mesh::ElementType;

/// Errors raised while assembling a limiter or its inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LimiterError {
    /// The subgrid extent does not equal `SC + F * SF`.
    #[error("subgrid holds {actual} cells, expected {expected} (subcells + faces * subfaces)")]
    SubgridExtent { expected: usize, actual: usize },

    /// The face extent does not match the element type.
    #[error("{element_type:?} elements have {expected} faces, limiter built for {actual}")]
    FaceCount {
        element_type: ElementType,
        expected: usize,
        actual: usize,
    },

    /// A table or state vector has the wrong length.
    #[error("{what}: expected length {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Subcell connectivity references a cell or solver that does not exist.
    #[error("invalid subcell connectivity: {0}")]
    InvalidConnectivity(String),

    /// The line reference element needs `2 * M - 1` subcells.
    #[error("line element with {modes} modes needs {expected} subcells, got {actual}")]
    LineSubcells {
        modes: usize,
        expected: usize,
        actual: usize,
    },

    /// The scatter operator has no left inverse.
    #[error("scatter operator is rank deficient (gather residual {residual:e})")]
    SingularScatter { residual: f64 },
}

impl LimiterError {
    /// Create a length mismatch error.
    pub fn length_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Result type of the setup routines.
pub type Result<T> = std::result::Result<T, LimiterError>;
