//! Per-plane entry point: validation, temporal seeding and depth dispatch.

use super::sample::load;
use super::spatial::denoise_spatial;
use super::temporal::denoise_temporal;
use super::DenoiseError;
use crate::coefficients::TablePair;
use crate::video::SampleDepth;

/// Per-call plane descriptor. Strides are in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneGeometry {
    /// Width in samples.
    pub width: usize,
    /// Height in rows.
    pub height: usize,
    /// Distance between input rows.
    pub src_stride: usize,
    /// Distance between output rows.
    pub dst_stride: usize,
}

impl PlaneGeometry {
    /// Geometry of tightly packed input and output rows.
    pub fn packed(width: usize, height: usize, bytes_per_sample: usize) -> Self {
        let stride = width * bytes_per_sample;
        Self {
            width,
            height,
            src_stride: stride,
            dst_stride: stride,
        }
    }

    /// Returns the number of samples in the plane.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.width * self.height
    }
}

/// Denoises one plane of one frame.
///
/// `frame_ant` is the plane's temporal memory: `None` on the first frame of
/// a stream, in which case it is allocated and seeded from `src` itself.
/// `line_ant` is scratch space of at least `geometry.width` entries.
pub fn denoise_plane(
    src: &[u8],
    dst: &mut [u8],
    line_ant: &mut [u16],
    frame_ant: &mut Option<Vec<u16>>,
    geometry: PlaneGeometry,
    tables: &TablePair,
    depth: SampleDepth,
) -> Result<(), DenoiseError> {
    if geometry.width == 0 || geometry.height == 0 {
        return Ok(());
    }
    check_buffers(src, dst, line_ant, frame_ant.as_deref(), geometry, depth)?;

    match depth {
        SampleDepth::Eight => denoise_depth::<8>(src, dst, line_ant, frame_ant, geometry, tables),
        SampleDepth::Nine => denoise_depth::<9>(src, dst, line_ant, frame_ant, geometry, tables),
        SampleDepth::Ten => denoise_depth::<10>(src, dst, line_ant, frame_ant, geometry, tables),
    }
}

fn denoise_depth<const DEPTH: u32>(
    src: &[u8],
    dst: &mut [u8],
    line_ant: &mut [u16],
    frame_ant: &mut Option<Vec<u16>>,
    geometry: PlaneGeometry,
    tables: &TablePair,
) -> Result<(), DenoiseError> {
    let mut state = match frame_ant.take() {
        Some(state) => state,
        None => seed_temporal::<DEPTH>(src, geometry)?,
    };

    if tables.spatial.has_effect() {
        denoise_spatial::<DEPTH>(
            src,
            dst,
            line_ant,
            &mut state,
            geometry,
            &tables.spatial,
            &tables.temporal,
        );
    } else {
        denoise_temporal::<DEPTH>(src, dst, &mut state, geometry, &tables.temporal);
    }

    *frame_ant = Some(state);
    Ok(())
}

/// Allocates the temporal memory and fills it with the plane's own samples.
fn seed_temporal<const DEPTH: u32>(
    src: &[u8],
    geometry: PlaneGeometry,
) -> Result<Vec<u16>, DenoiseError> {
    let len = geometry.sample_count();
    let mut state = Vec::new();
    state
        .try_reserve_exact(len)
        .map_err(|_| DenoiseError::Allocation {
            bytes: len * std::mem::size_of::<u16>(),
        })?;

    for row in src.chunks(geometry.src_stride).take(geometry.height) {
        state.extend((0..geometry.width).map(|x| load::<DEPTH>(row, x) as u16));
    }
    Ok(state)
}

fn check_buffers(
    src: &[u8],
    dst: &[u8],
    line_ant: &[u16],
    frame_ant: Option<&[u16]>,
    geometry: PlaneGeometry,
    depth: SampleDepth,
) -> Result<(), DenoiseError> {
    let row_bytes = geometry.width * depth.bytes_per_sample();

    for (buffer, stride, len) in [
        ("input", geometry.src_stride, src.len()),
        ("output", geometry.dst_stride, dst.len()),
    ] {
        if stride < row_bytes {
            return Err(DenoiseError::StrideTooSmall {
                buffer,
                stride,
                row_bytes,
            });
        }
        let need = (geometry.height - 1) * stride + row_bytes;
        if len < need {
            return Err(DenoiseError::BufferTooSmall {
                buffer,
                need,
                got: len,
            });
        }
    }
    if line_ant.len() < geometry.width {
        return Err(DenoiseError::BufferTooSmall {
            buffer: "line",
            need: geometry.width,
            got: line_ant.len(),
        });
    }
    if let Some(state) = frame_ant {
        if state.len() != geometry.sample_count() {
            return Err(DenoiseError::TemporalSizeMismatch {
                expected: state.len(),
                got: geometry.sample_count(),
            });
        }
    }
    Ok(())
}
