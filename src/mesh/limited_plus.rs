//! Limited-plus connectivity.
//!
//! The limiter only touches elements that are limited or face-adjacent to a
//! limited element. Those get a contiguous "limited-plus" numbering; limited
//! elements additionally get a limited id, which indexes subcell solutions,
//! admissibility and counters. Extrema live on every element of the
//! vertex-connected stencil closure of the limited elements.

use crate::error::{LimiterError, Result};
use crate::types::{ElementIndex, ExtremaIndex, LimitedIndex, LimitedPlusIndex};

use super::adjacency::MeshAdjacency;

/// Numbering and stencils of the limited-plus elements.
#[derive(Clone, Debug)]
pub struct LimitedPlusConnect<const F: usize> {
    /// Dense element id of every limited-plus element.
    pub lp_el: Vec<ElementIndex>,
    /// Limited id, if the limited-plus element is limited.
    pub lp_li: Vec<Option<LimitedIndex>>,
    /// Limited-plus id of the face neighbor, if it is in the set.
    pub lp_fa_lp: Vec<[Option<LimitedPlusIndex>; F]>,
    /// Extrema id of every limited-plus element that holds a record.
    pub lp_ex: Vec<Option<ExtremaIndex>>,
    /// Limited-plus id of every limited element.
    pub li_lp: Vec<LimitedPlusIndex>,
    /// Extrema id of every limited element.
    pub li_ex: Vec<ExtremaIndex>,
    /// CSR offsets into `ve_ex`, one slot per limited element plus one.
    pub li_ve_ex: Vec<usize>,
    /// Extrema ids of the vertex-connected stencils.
    pub ve_ex: Vec<ExtremaIndex>,
    /// Dense element id of every extrema record.
    pub ex_el: Vec<ElementIndex>,
}

impl<const F: usize> LimitedPlusConnect<F> {
    /// Derive the limited-plus set from a per-element limited mask.
    ///
    /// All numberings follow ascending dense element ids.
    pub fn build(limited: &[bool], mesh: &MeshAdjacency<F>) -> Result<Self> {
        let n_el = mesh.n_elements();
        if limited.len() != n_el {
            return Err(LimiterError::length_mismatch(
                "limited mask",
                n_el,
                limited.len(),
            ));
        }

        let mut in_lp = limited.to_vec();
        let mut in_ex = limited.to_vec();
        for el in ElementIndex::iter(n_el).filter(|&el| limited[el]) {
            for ne in mesh.el_fa_el[el].iter().flatten() {
                in_lp[*ne] = true;
            }
            for ne in &mesh.el_ve_el[el] {
                if ne.get() >= n_el {
                    return Err(LimiterError::InvalidConnectivity(format!(
                        "vertex stencil of {el} references {ne}"
                    )));
                }
                in_ex[*ne] = true;
            }
        }

        let mut el_lp = vec![None; n_el];
        let mut lp_el = Vec::new();
        let mut lp_li = Vec::new();
        let mut li_lp = Vec::new();
        for el in ElementIndex::iter(n_el).filter(|&el| in_lp[el]) {
            let lp = LimitedPlusIndex::new(lp_el.len());
            el_lp[el.get()] = Some(lp);
            lp_el.push(el);
            if limited[el] {
                lp_li.push(Some(LimitedIndex::new(li_lp.len())));
                li_lp.push(lp);
            } else {
                lp_li.push(None);
            }
        }

        let lp_fa_lp = lp_el
            .iter()
            .map(|&el| mesh.el_fa_el[el].map(|ne| ne.and_then(|ne| el_lp[ne.get()])))
            .collect();

        let mut el_ex = vec![None; n_el];
        let mut ex_el = Vec::new();
        for el in ElementIndex::iter(n_el).filter(|&el| in_ex[el]) {
            el_ex[el.get()] = Some(ExtremaIndex::new(ex_el.len()));
            ex_el.push(el);
        }

        let lp_ex = lp_el.iter().map(|&el| el_ex[el.get()]).collect();

        let mut li_ex = Vec::with_capacity(li_lp.len());
        let mut li_ve_ex = Vec::with_capacity(li_lp.len() + 1);
        let mut ve_ex = Vec::new();
        li_ve_ex.push(0);
        for &lp in &li_lp {
            let el = lp_el[lp];
            // every limited element and its stencil were flagged above
            li_ex.extend(el_ex[el.get()]);
            ve_ex.extend(mesh.el_ve_el[el].iter().filter_map(|ne| el_ex[ne.get()]));
            li_ve_ex.push(ve_ex.len());
        }

        log::debug!(
            "limited-plus set: {} elements, {} limited, {} extrema records",
            lp_el.len(),
            li_lp.len(),
            ex_el.len()
        );

        Ok(Self {
            lp_el,
            lp_li,
            lp_fa_lp,
            lp_ex,
            li_lp,
            li_ex,
            li_ve_ex,
            ve_ex,
            ex_el,
        })
    }

    /// Number of limited-plus elements.
    pub fn n_limited_plus(&self) -> usize {
        self.lp_el.len()
    }

    /// Number of limited elements.
    pub fn n_limited(&self) -> usize {
        self.li_lp.len()
    }

    /// Number of extrema records.
    pub fn n_extrema(&self) -> usize {
        self.ex_el.len()
    }

    /// Extrema ids of the vertex-connected stencil of `li`.
    #[inline]
    pub fn stencil(&self, li: LimitedIndex) -> &[ExtremaIndex] {
        &self.ve_ex[self.li_ve_ex[li.get()]..self.li_ve_ex[li.get() + 1]]
    }

    /// Limited id of the face neighbor of `lp` across `fa`, if it is limited.
    #[inline]
    pub fn limited_neighbor(&self, lp: LimitedPlusIndex, fa: usize) -> Option<LimitedIndex> {
        self.lp_fa_lp[lp][fa].and_then(|ne| self.lp_li[ne])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::LineMesh;

    fn line(n: usize) -> MeshAdjacency<2> {
        LineMesh::uniform(0.0, 1.0, n).unwrap().adjacency().unwrap()
    }

    #[test]
    fn test_single_limited_element() {
        let mesh = line(5);
        let conn = LimitedPlusConnect::build(&[false, false, true, false, false], &mesh).unwrap();

        assert_eq!(
            conn.lp_el,
            vec![
                ElementIndex::new(1),
                ElementIndex::new(2),
                ElementIndex::new(3)
            ]
        );
        assert_eq!(conn.lp_li, vec![None, Some(LimitedIndex::new(0)), None]);
        assert_eq!(conn.li_lp, vec![LimitedPlusIndex::new(1)]);
        assert_eq!(
            conn.lp_fa_lp[1],
            [Some(LimitedPlusIndex::new(0)), Some(LimitedPlusIndex::new(2))]
        );
        // element 1's left neighbor is not in the set
        assert_eq!(conn.lp_fa_lp[0], [None, Some(LimitedPlusIndex::new(1))]);
        assert_eq!(conn.n_extrema(), 3);
        assert_eq!(conn.li_ex, vec![ExtremaIndex::new(1)]);
        assert_eq!(
            conn.stencil(LimitedIndex::new(0)),
            &[ExtremaIndex::new(0), ExtremaIndex::new(2)]
        );
    }

    #[test]
    fn test_limited_neighbor_lookup() {
        let mesh = line(3);
        let conn = LimitedPlusConnect::build(&[true, true, false], &mesh).unwrap();
        let lp0 = LimitedPlusIndex::new(0);
        assert_eq!(conn.limited_neighbor(lp0, 0), None);
        assert_eq!(conn.limited_neighbor(lp0, 1), Some(LimitedIndex::new(1)));
        assert_eq!(conn.limited_neighbor(LimitedPlusIndex::new(1), 1), None);
        assert_eq!(conn.n_limited_plus(), 3);
        assert_eq!(conn.n_limited(), 2);
    }

    #[test]
    fn test_every_limited_neighbor_included() {
        let mesh = line(8);
        let mask = [true, false, false, true, false, false, false, true];
        let conn = LimitedPlusConnect::build(&mask, &mesh).unwrap();
        for &lp in &conn.li_lp {
            for fa in 0..2 {
                if mesh.el_fa_el[conn.lp_el[lp]][fa].is_some() {
                    assert!(conn.lp_fa_lp[lp][fa].is_some());
                }
            }
        }
    }

    #[test]
    fn test_limited_plus_extrema_ids() {
        let mesh = line(5);
        let conn = LimitedPlusConnect::build(&[false, true, true, false, false], &mesh).unwrap();
        assert_eq!(conn.n_limited_plus(), 4);
        for (lp, ex) in conn.lp_ex.iter().enumerate() {
            let ex = ex.unwrap();
            assert_eq!(conn.ex_el[ex], conn.lp_el[lp]);
        }
        for (li, &lp) in conn.li_lp.iter().enumerate() {
            assert_eq!(conn.lp_ex[lp], Some(conn.li_ex[li]));
        }
    }

    #[test]
    fn test_empty_mask() {
        let mesh = line(4);
        let conn = LimitedPlusConnect::build(&[false; 4], &mesh).unwrap();
        assert_eq!(conn.n_limited_plus(), 0);
        assert_eq!(conn.li_ve_ex, vec![0]);
    }

    #[test]
    fn test_mask_length_checked() {
        let mesh = line(4);
        assert!(LimitedPlusConnect::build(&[true; 3], &mesh).is_err());
    }
}
