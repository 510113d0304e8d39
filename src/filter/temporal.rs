//! Temporal-only path, used when the spatial table has no effect.

use super::sample::{load, store};
use super::PlaneGeometry;
use crate::coefficients::CoefficientTable;

/// Blends every sample against the same position of the previous output.
pub(super) fn denoise_temporal<const DEPTH: u32>(
    src: &[u8],
    dst: &mut [u8],
    frame_ant: &mut [u16],
    geometry: PlaneGeometry,
    temporal: &CoefficientTable,
) {
    let rows = src
        .chunks(geometry.src_stride)
        .zip(dst.chunks_mut(geometry.dst_stride))
        .zip(frame_ant.chunks_exact_mut(geometry.width))
        .take(geometry.height);

    for ((src_row, dst_row), frame_row) in rows {
        for (x, prev) in frame_row.iter_mut().enumerate() {
            let tmp = temporal.lowpass(u32::from(*prev), load::<DEPTH>(src_row, x));
            *prev = tmp as u16;
            store::<DEPTH>(dst_row, x, tmp);
        }
    }
}
