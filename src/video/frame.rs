//! Frame type holding three planes of one picture.

use super::{PixelFormat, Plane};
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Number of planes in every supported format.
pub const PLANE_COUNT: usize = 3;

/// Dimensions and format of a stream, fixed at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLayout {
    /// Luma width in pixels.
    pub width: u32,
    /// Luma height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: PixelFormat,
}

impl StreamLayout {
    /// Creates a layout.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }

    /// Validates the layout parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Returns the dimensions of plane `index`.
    #[inline]
    pub fn plane_dimensions(&self, index: usize) -> (usize, usize) {
        let (w, h) = self.format.plane_dimensions(index, self.width, self.height);
        (w as usize, h as usize)
    }

    /// Returns the size of one frame with tightly packed planes.
    pub fn frame_bytes(&self) -> usize {
        let bps = self.format.depth().bytes_per_sample();
        (0..PLANE_COUNT)
            .map(|i| {
                let (w, h) = self.plane_dimensions(i);
                w * h * bps
            })
            .sum()
    }
}

impl std::fmt::Display for StreamLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.format)
    }
}

/// One picture of a stream.
#[derive(Clone)]
pub struct Frame {
    planes: [Plane; PLANE_COUNT],
    layout: StreamLayout,
    /// Monotonic sequence number.
    sequence: u64,
}

impl Frame {
    /// Creates a zeroed frame with packed planes.
    pub fn new(layout: StreamLayout, sequence: u64) -> Self {
        let depth = layout.format.depth();
        let planes = std::array::from_fn(|i| {
            let (w, h) = layout.plane_dimensions(i);
            Plane::new(w, h, depth)
        });
        Self {
            planes,
            layout,
            sequence,
        }
    }

    /// Assembles a frame from existing planes (strides may differ per plane).
    pub fn from_planes(layout: StreamLayout, planes: [Plane; PLANE_COUNT], sequence: u64) -> Self {
        Self {
            planes,
            layout,
            sequence,
        }
    }

    /// Returns plane `index`.
    #[inline]
    pub fn plane(&self, index: usize) -> &Plane {
        &self.planes[index]
    }

    /// Returns plane `index` mutably.
    #[inline]
    pub fn plane_mut(&mut self, index: usize) -> &mut Plane {
        &mut self.planes[index]
    }

    /// Returns all planes.
    #[inline]
    pub fn planes(&self) -> &[Plane; PLANE_COUNT] {
        &self.planes
    }

    /// Returns the stream layout.
    #[inline]
    pub fn layout(&self) -> StreamLayout {
        self.layout
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Sets the sequence number.
    #[inline]
    pub fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    /// Validates that every plane matches the layout.
    pub fn is_valid(&self) -> bool {
        let depth = self.layout.format.depth();
        self.planes.iter().enumerate().all(|(i, plane)| {
            (plane.width(), plane.height()) == self.layout.plane_dimensions(i)
                && plane.depth() == depth
                && plane.is_valid()
        })
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("layout", &self.layout)
            .field("sequence", &self.sequence)
            .finish()
    }
}
