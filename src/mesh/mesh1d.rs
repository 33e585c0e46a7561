//! 1D mesh representation.
//!
//! A 1D mesh is a partition of an interval [x_min, x_max] into line elements.
//! Face 0 of element k sits at its left vertex, face 1 at its right vertex.

use crate::error::{LimiterError, Result};
use crate::types::ElementIndex;

use super::adjacency::{FaceCoupling, MeshAdjacency};

/// 1D mesh of an interval.
#[derive(Clone, Debug)]
pub struct LineMesh {
    /// Left endpoint of domain
    pub x_min: f64,
    /// Right endpoint of domain
    pub x_max: f64,
    /// Number of elements
    pub n_elements: usize,
    /// Element vertices: vertices[k] is left endpoint of element k
    /// vertices has length n_elements + 1
    pub vertices: Vec<f64>,
    /// Element sizes: h[k] = vertices[k+1] - vertices[k]
    pub element_sizes: Vec<f64>,
    /// Neighbor connectivity: neighbors[k] = (left_neighbor, right_neighbor)
    /// None at the free ends of a non-periodic mesh
    pub neighbors: Vec<(Option<usize>, Option<usize>)>,
    /// Interior vertices that carry an internal boundary
    pub ruptures: Vec<usize>,
    /// Whether this mesh has periodic boundary conditions
    pub is_periodic: bool,
}

impl LineMesh {
    /// Create a uniform mesh of [x_min, x_max] with n_elements elements.
    pub fn uniform(x_min: f64, x_max: f64, n_elements: usize) -> Result<Self> {
        Self::build(x_min, x_max, n_elements, false)
    }

    /// Create a uniform periodic mesh of [x_min, x_max] with n_elements elements.
    ///
    /// The left and right boundaries are connected, so there are no boundary
    /// faces. At least two elements are needed.
    pub fn uniform_periodic(x_min: f64, x_max: f64, n_elements: usize) -> Result<Self> {
        if n_elements < 2 {
            return Err(LimiterError::InvalidConnectivity(
                "a periodic line mesh needs at least two elements".into(),
            ));
        }
        Self::build(x_min, x_max, n_elements, true)
    }

    fn build(x_min: f64, x_max: f64, n_elements: usize, is_periodic: bool) -> Result<Self> {
        if n_elements == 0 {
            return Err(LimiterError::InvalidConnectivity(
                "need at least one element".into(),
            ));
        }
        if !(x_max > x_min) {
            return Err(LimiterError::InvalidConnectivity(format!(
                "empty interval [{x_min}, {x_max}]"
            )));
        }

        let h = (x_max - x_min) / n_elements as f64;
        let vertices: Vec<f64> = (0..=n_elements).map(|i| x_min + i as f64 * h).collect();
        let element_sizes = vec![h; n_elements];

        let neighbors = (0..n_elements)
            .map(|k| {
                let left = if k > 0 {
                    Some(k - 1)
                } else if is_periodic {
                    Some(n_elements - 1)
                } else {
                    None
                };
                let right = if k < n_elements - 1 {
                    Some(k + 1)
                } else if is_periodic {
                    Some(0)
                } else {
                    None
                };
                (left, right)
            })
            .collect();

        Ok(Self {
            x_min,
            x_max,
            n_elements,
            vertices,
            element_sizes,
            neighbors,
            ruptures: Vec::new(),
            is_periodic,
        })
    }

    /// Mark the interior vertex `vertex` as an internal boundary.
    pub fn with_rupture(mut self, vertex: usize) -> Result<Self> {
        if vertex == 0 || vertex >= self.n_elements {
            return Err(LimiterError::InvalidConnectivity(format!(
                "vertex {vertex} is not an interior vertex of {} elements",
                self.n_elements
            )));
        }
        if !self.ruptures.contains(&vertex) {
            self.ruptures.push(vertex);
        }
        Ok(self)
    }

    /// Get minimum element size.
    pub fn h_min(&self) -> f64 {
        self.element_sizes
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Element adjacency in the limiter's layout.
    ///
    /// Line faces are points, so every vertex-combination id is zero and a
    /// left face always meets the neighbor's right face.
    pub fn adjacency(&self) -> Result<MeshAdjacency<2>> {
        let n = self.n_elements;
        let mut el_fa_el = Vec::with_capacity(n);
        let mut fa_cp = Vec::with_capacity(n);
        let mut el_ve_el = Vec::with_capacity(n);

        for (k, &(left, right)) in self.neighbors.iter().enumerate() {
            el_fa_el.push([left.map(ElementIndex::new), right.map(ElementIndex::new)]);
            fa_cp.push([
                self.coupling_at(k),
                self.coupling_at(k + 1),
            ]);

            let mut stencil: Vec<ElementIndex> = [left, right]
                .into_iter()
                .flatten()
                .filter(|&ne| ne != k)
                .map(ElementIndex::new)
                .collect();
            stencil.sort_unstable();
            stencil.dedup();
            el_ve_el.push(stencil);
        }

        MeshAdjacency::new(el_fa_el, vec![[1, 0]; n], vec![[0, 0]; n], fa_cp, el_ve_el)
    }

    fn coupling_at(&self, vertex: usize) -> FaceCoupling {
        if self.ruptures.contains(&vertex) {
            FaceCoupling::Rupture
        } else {
            FaceCoupling::Standard
        }
    }
}
