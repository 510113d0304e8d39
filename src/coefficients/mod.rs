//! Coefficient tables for the lowpass recurrence.
//!
//! One table is built per configured strength. The four tables are
//! grouped by plane class so the filter can pick the spatial/temporal
//! pair that applies to a plane.

mod table;

pub use table::{CoefficientTable, BUCKET_OFFSET, BUCKET_RANGE, TABLE_LEN};

use crate::config::Strengths;

/// Which table pair applies to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneClass {
    /// Plane 0.
    Luma,
    /// Planes 1 and 2.
    Chroma,
}

impl PlaneClass {
    /// Returns the class for a plane index.
    pub fn of_plane(index: usize) -> Self {
        if index == 0 {
            PlaneClass::Luma
        } else {
            PlaneClass::Chroma
        }
    }
}

/// Spatial and temporal tables for one plane class.
#[derive(Debug, Clone)]
pub struct TablePair {
    /// Table used for blending against causal neighbors.
    pub spatial: CoefficientTable,
    /// Table used for blending against the previous output.
    pub temporal: CoefficientTable,
}

/// The four tables derived from a set of strengths.
#[derive(Debug, Clone)]
pub struct CoefficientSet {
    luma: TablePair,
    chroma: TablePair,
}

impl CoefficientSet {
    /// Builds all four tables. `strengths` must already be validated.
    pub fn build(strengths: &Strengths) -> Self {
        Self {
            luma: TablePair {
                spatial: CoefficientTable::build(strengths.luma_spatial),
                temporal: CoefficientTable::build(strengths.luma_temporal),
            },
            chroma: TablePair {
                spatial: CoefficientTable::build(strengths.chroma_spatial),
                temporal: CoefficientTable::build(strengths.chroma_temporal),
            },
        }
    }

    /// Returns the table pair for a plane class.
    #[inline]
    pub fn pair(&self, class: PlaneClass) -> &TablePair {
        match class {
            PlaneClass::Luma => &self.luma,
            PlaneClass::Chroma => &self.chroma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_class_mapping() {
        assert_eq!(PlaneClass::of_plane(0), PlaneClass::Luma);
        assert_eq!(PlaneClass::of_plane(1), PlaneClass::Chroma);
        assert_eq!(PlaneClass::of_plane(2), PlaneClass::Chroma);
    }

    #[test]
    fn test_set_uses_each_strength() {
        let strengths = Strengths {
            luma_spatial: 1.0,
            chroma_spatial: 2.0,
            luma_temporal: 3.0,
            chroma_temporal: 0.0,
        };
        let set = CoefficientSet::build(&strengths);

        assert_eq!(set.pair(PlaneClass::Luma).spatial.strength(), 1.0);
        assert_eq!(set.pair(PlaneClass::Luma).temporal.strength(), 3.0);
        assert_eq!(set.pair(PlaneClass::Chroma).spatial.strength(), 2.0);
        assert!(!set.pair(PlaneClass::Chroma).temporal.has_effect());
    }
}
