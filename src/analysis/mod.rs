//! Before/after measurements of the filter.
//!
//! These describe how much a frame was changed, not whether the result
//! looks better. High-frequency energy is only a rough noise proxy.

mod statistics;

pub use statistics::PlaneStatistics;
