//! Element-level adjacency consumed by the limiter.

use crate::error::{LimiterError, Result};
use crate::types::ElementIndex;

/// How an element couples to its face neighbor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FaceCoupling {
    /// Regular DG coupling through the flux solvers.
    #[default]
    Standard,
    /// Internal boundary (e.g. a rupture) that may be driven by net-updates.
    Rupture,
}

/// Face and vertex adjacency of the mesh's elements.
///
/// Every table is indexed by the dense element id.
#[derive(Clone, Debug)]
pub struct MeshAdjacency<const F: usize> {
    /// Face neighbor per face, `None` at the domain boundary.
    pub el_fa_el: Vec<[Option<ElementIndex>; F]>,
    /// Local face id of the shared face as seen from the neighbor.
    pub f_id_el_fa_el: Vec<[u8; F]>,
    /// Vertex-combination id of the shared face as seen from the neighbor.
    pub v_id_el_fa_el: Vec<[u8; F]>,
    /// Coupling type per face.
    pub fa_cp: Vec<[FaceCoupling; F]>,
    /// Vertex-connected elements, the element itself excluded.
    pub el_ve_el: Vec<Vec<ElementIndex>>,
}

impl<const F: usize> MeshAdjacency<F> {
    /// Create adjacency tables and check them for consistency.
    ///
    /// Face neighbors must point back through the recorded neighbor face id,
    /// and coupling types of both sides of a face must agree.
    pub fn new(
        el_fa_el: Vec<[Option<ElementIndex>; F]>,
        f_id_el_fa_el: Vec<[u8; F]>,
        v_id_el_fa_el: Vec<[u8; F]>,
        fa_cp: Vec<[FaceCoupling; F]>,
        el_ve_el: Vec<Vec<ElementIndex>>,
    ) -> Result<Self> {
        let n_el = el_fa_el.len();
        for (what, len) in [
            ("f_id_el_fa_el", f_id_el_fa_el.len()),
            ("v_id_el_fa_el", v_id_el_fa_el.len()),
            ("fa_cp", fa_cp.len()),
            ("el_ve_el", el_ve_el.len()),
        ] {
            if len != n_el {
                return Err(LimiterError::length_mismatch(what, n_el, len));
            }
        }

        for (el, neighbors) in el_fa_el.iter().enumerate() {
            for (fa, ne) in neighbors.iter().enumerate() {
                let Some(ne) = *ne else { continue };
                let f_id = f_id_el_fa_el[el][fa] as usize;
                if ne.get() >= n_el || f_id >= F {
                    return Err(LimiterError::InvalidConnectivity(format!(
                        "face {fa} of element {el} points to {ne} through face {f_id}"
                    )));
                }
                if el_fa_el[ne.get()][f_id] != Some(ElementIndex::new(el)) {
                    return Err(LimiterError::InvalidConnectivity(format!(
                        "face {fa} of element {el} is not mirrored by face {f_id} of {ne}"
                    )));
                }
                if fa_cp[ne.get()][f_id] != fa_cp[el][fa] {
                    return Err(LimiterError::InvalidConnectivity(format!(
                        "coupling of face {fa} of element {el} differs across the face"
                    )));
                }
            }
        }

        Ok(Self {
            el_fa_el,
            f_id_el_fa_el,
            v_id_el_fa_el,
            fa_cp,
            el_ve_el,
        })
    }

    /// Number of elements.
    pub fn n_elements(&self) -> usize {
        self.el_fa_el.len()
    }

    /// Face neighbor of `el` across `fa`.
    #[inline]
    pub fn neighbor(&self, el: ElementIndex, fa: usize) -> Option<ElementIndex> {
        self.el_fa_el[el][fa]
    }

    /// True if `fa` of `el` is an internal boundary.
    #[inline]
    pub fn is_rupture(&self, el: ElementIndex, fa: usize) -> bool {
        self.fa_cp[el][fa] == FaceCoupling::Rupture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (
        Vec<[Option<ElementIndex>; 2]>,
        Vec<[u8; 2]>,
        Vec<[u8; 2]>,
        Vec<[FaceCoupling; 2]>,
        Vec<Vec<ElementIndex>>,
    ) {
        (
            vec![
                [None, Some(ElementIndex::new(1))],
                [Some(ElementIndex::new(0)), None],
            ],
            vec![[0, 0], [1, 0]],
            vec![[0, 0], [0, 0]],
            vec![[FaceCoupling::Standard; 2]; 2],
            vec![vec![ElementIndex::new(1)], vec![ElementIndex::new(0)]],
        )
    }

    #[test]
    fn test_valid_pair() {
        let (a, b, c, d, e) = pair();
        let adj = MeshAdjacency::new(a, b, c, d, e).unwrap();
        assert_eq!(adj.n_elements(), 2);
        assert_eq!(
            adj.neighbor(ElementIndex::new(0), 1),
            Some(ElementIndex::new(1))
        );
        assert!(!adj.is_rupture(ElementIndex::new(0), 1));
    }

    #[test]
    fn test_unmirrored_face_rejected() {
        let (a, mut b, c, d, e) = pair();
        b[0][1] = 1;
        let err = MeshAdjacency::new(a, b, c, d, e).unwrap_err();
        assert!(matches!(err, LimiterError::InvalidConnectivity(_)));
    }

    #[test]
    fn test_one_sided_rupture_rejected() {
        let (a, b, c, mut d, e) = pair();
        d[0][1] = FaceCoupling::Rupture;
        assert!(MeshAdjacency::new(a, b, c, d, e).is_err());
    }

    #[test]
    fn test_length_mismatch() {
        let (a, b, c, d, mut e) = pair();
        e.pop();
        let err = MeshAdjacency::new(a, b, c, d, e).unwrap_err();
        assert_eq!(err, LimiterError::length_mismatch("el_ve_el", 2, 1));
    }
}
