//! Fixed-size per-element tensors.
//!
//! Every tensor is laid out `[quantity][mode | subcell | subface][run]`, with
//! the fused-run dimension innermost so that loops over runs vectorize. All
//! extents are const generics resolved at compile time:
//!
//! | param | meaning |
//! |-------|---------|
//! | `Q`   | quantities of the PDE |
//! | `M`   | DG modes |
//! | `SC`  | subcells of an element |
//! | `SF`  | subfaces per element face |
//! | `SG`  | subgrid cells, `SC + F * SF` |
//! | `R`   | fused runs |

/// Modal DG degrees of freedom of one element.
pub type DofsDg<const Q: usize, const M: usize, const R: usize> = [[[f64; R]; M]; Q];

/// Subcell averages of one element.
pub type DofsSc<const Q: usize, const SC: usize, const R: usize> = [[[f64; R]; SC]; Q];

/// Subcell values adjacent to one element face, one per subface.
pub type DofsSf<const Q: usize, const SF: usize, const R: usize> = [[[f64; R]; SF]; Q];

/// An element's subcells followed by the ghost subcells of every face.
pub type SubGrid<const Q: usize, const SG: usize, const R: usize> = [[[f64; R]; SG]; Q];

/// Minimum (`[0]`) and maximum (`[1]`) per quantity and run.
pub type Extrema<const Q: usize, const R: usize> = [[[f64; R]; Q]; 2];

/// One boolean per fused run.
pub type RunMask<const R: usize> = [bool; R];

/// Quantity-by-quantity Riemann matrix of one face side, geometry-scaled.
pub type FluxSolver<const Q: usize> = [[f64; Q]; Q];

/// Extrema initialized to the empty envelope (`+inf`, `-inf`).
pub fn empty_extrema<const Q: usize, const R: usize>() -> Extrema<Q, R> {
    [[[f64::INFINITY; R]; Q], [[f64::NEG_INFINITY; R]; Q]]
}

/// True if any run of the mask is `false`.
#[inline]
pub fn any_false<const R: usize>(mask: &RunMask<R>) -> bool {
    mask.iter().any(|&adm| !adm)
}
