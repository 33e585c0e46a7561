//! Strongly-typed ids for the limiter's numbering spaces.
//!
//! The limiter works with four numberings at once: dense element ids, the
//! contiguous limited-plus numbering, limited ids and extrema ids. Each one
//! gets its own newtype; absent entries are `Option`s.

use std::fmt;

macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new id.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw id.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// Iterate over the ids `[0, n)`.
            pub fn iter(n: usize) -> impl ExactSizeIterator<Item = $name> {
                (0..n).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }

        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }
    };
}

define_index!(
    /// Dense element id of the mesh.
    ///
    /// ```
    /// use dg_subcell::types::ElementIndex;
    ///
    /// let el = ElementIndex::new(7);
    /// assert_eq!(el.get(), 7);
    /// ```
    ElementIndex,
    "E"
);

define_index!(
    /// Id in the contiguous numbering of limited-plus elements.
    LimitedPlusIndex,
    "LP"
);

define_index!(
    /// Id of a limited element; indexes subcell solutions, admissibility,
    /// lock flags and limiting counters.
    LimitedIndex,
    "LI"
);

define_index!(
    /// Id of an extrema record.
    ExtremaIndex,
    "EX"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_indexing() {
        let mut data = vec![10, 20, 30];
        let li = LimitedIndex::new(1);
        assert_eq!(data[li], 20);
        data[li] = 25;
        assert_eq!(data[1], 25);
    }

    #[test]
    fn test_slice_indexing() {
        let data = [1.0, 2.0, 3.0];
        assert_eq!(data[..][ExtremaIndex::new(2)], 3.0);
    }

    #[test]
    fn test_iter() {
        let ids: Vec<_> = LimitedPlusIndex::iter(4).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[3].get(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ElementIndex::new(3)), "E3");
        assert_eq!(format!("{}", LimitedPlusIndex::new(1)), "LP1");
        assert_eq!(format!("{}", LimitedIndex::new(0)), "LI0");
        assert_eq!(format!("{}", ExtremaIndex::new(9)), "EX9");
    }

    #[test]
    fn test_from_conversions() {
        let li: LimitedIndex = 5.into();
        let raw: usize = li.into();
        assert_eq!(raw, 5);
    }
}
