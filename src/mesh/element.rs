//! Element topologies supported by the limiter.

/// Reference element topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 1D line segment.
    Line,
    /// 2D quadrilateral.
    Quad4,
    /// 2D triangle.
    Tria3,
    /// 3D hexahedron.
    Hex8,
    /// 3D tetrahedron.
    Tet4,
}

impl ElementType {
    /// Spatial dimension.
    pub const fn n_dim(self) -> usize {
        match self {
            ElementType::Line => 1,
            ElementType::Quad4 | ElementType::Tria3 => 2,
            ElementType::Hex8 | ElementType::Tet4 => 3,
        }
    }

    /// Number of vertices.
    pub const fn n_vertices(self) -> usize {
        match self {
            ElementType::Line => 2,
            ElementType::Quad4 => 4,
            ElementType::Tria3 => 3,
            ElementType::Hex8 => 8,
            ElementType::Tet4 => 4,
        }
    }

    /// Number of faces.
    pub const fn n_faces(self) -> usize {
        match self {
            ElementType::Line => 2,
            ElementType::Quad4 => 4,
            ElementType::Tria3 => 3,
            ElementType::Hex8 => 6,
            ElementType::Tet4 => 4,
        }
    }

    /// Correction of the subcell flux scaling for simplices.
    ///
    /// Geometry-scaled flux solvers of triangles and tetrahedra carry the
    /// Jacobian determinant, which is a multiple of the volume rather than the
    /// volume itself.
    pub const fn jacobian_correction(self) -> f64 {
        match self {
            ElementType::Tria3 => 0.5,
            ElementType::Tet4 => 1.0 / 3.0,
            ElementType::Line | ElementType::Quad4 | ElementType::Hex8 => 1.0,
        }
    }

    /// True for simplicial topologies.
    pub const fn is_simplex(self) -> bool {
        matches!(self, ElementType::Tria3 | ElementType::Tet4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        assert_eq!(ElementType::Line.n_faces(), 2);
        assert_eq!(ElementType::Tria3.n_faces(), 3);
        assert_eq!(ElementType::Tet4.n_vertices(), 4);
        assert_eq!(ElementType::Hex8.n_dim(), 3);
    }

    #[test]
    fn test_jacobian_correction() {
        assert_eq!(ElementType::Tria3.jacobian_correction(), 0.5);
        assert!((ElementType::Tet4.jacobian_correction() * 3.0 - 1.0).abs() < 1e-15);
        assert_eq!(ElementType::Quad4.jacobian_correction(), 1.0);
        assert!(ElementType::Tet4.is_simplex());
        assert!(!ElementType::Line.is_simplex());
    }
}
