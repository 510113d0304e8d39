//! A single image plane with its own stride.

use super::SampleDepth;

/// Owned plane buffer.
///
/// Samples are stored row by row, `stride` bytes apart. At depths above 8
/// each sample is a little-endian 16-bit word.
#[derive(Clone, PartialEq, Eq)]
pub struct Plane {
    data: Vec<u8>,
    width: usize,
    height: usize,
    stride: usize,
    depth: SampleDepth,
}

impl Plane {
    /// Creates a zeroed plane with tightly packed rows.
    pub fn new(width: usize, height: usize, depth: SampleDepth) -> Self {
        Self::with_stride(width, height, width * depth.bytes_per_sample(), depth)
    }

    /// Creates a zeroed plane whose rows are `stride` bytes apart.
    ///
    /// # Panics
    ///
    /// Panics if `stride` is shorter than a row.
    pub fn with_stride(width: usize, height: usize, stride: usize, depth: SampleDepth) -> Self {
        assert!(
            stride >= width * depth.bytes_per_sample(),
            "stride {stride} shorter than a {width}-sample row"
        );
        Self {
            data: vec![0u8; stride * height],
            width,
            height,
            stride,
            depth,
        }
    }

    /// Creates a packed plane from sample values in raster order.
    ///
    /// # Panics
    ///
    /// Panics if `samples` does not hold exactly `width * height` values.
    pub fn from_samples(width: usize, height: usize, depth: SampleDepth, samples: &[u16]) -> Self {
        assert_eq!(samples.len(), width * height, "sample count mismatch");
        let mut plane = Self::new(width, height, depth);
        for (i, &v) in samples.iter().enumerate() {
            plane.set_sample(i % width, i / width, v);
        }
        plane
    }

    /// Returns the raw buffer.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the raw buffer mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the plane width in samples.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the plane height in rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the distance between rows in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the sample depth.
    #[inline]
    pub fn depth(&self) -> SampleDepth {
        self.depth
    }

    /// Returns the number of bytes holding visible samples in one row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width * self.depth.bytes_per_sample()
    }

    /// Returns the visible bytes of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /// Returns the visible bytes of row `y` mutably.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    /// Reads the sample at (`x`, `y`).
    pub fn sample(&self, x: usize, y: usize) -> u16 {
        let row = self.row(y);
        match self.depth {
            SampleDepth::Eight => u16::from(row[x]),
            SampleDepth::Nine | SampleDepth::Ten => {
                u16::from_le_bytes([row[2 * x], row[2 * x + 1]])
            }
        }
    }

    /// Writes the sample at (`x`, `y`).
    pub fn set_sample(&mut self, x: usize, y: usize, value: u16) {
        let depth = self.depth;
        let row = self.row_mut(y);
        match depth {
            SampleDepth::Eight => row[x] = value as u8,
            SampleDepth::Nine | SampleDepth::Ten => {
                row[2 * x..2 * x + 2].copy_from_slice(&value.to_le_bytes())
            }
        }
    }

    /// Sets every visible sample to `value`.
    pub fn fill(&mut self, value: u16) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_sample(x, y, value);
            }
        }
    }

    /// Returns all visible samples in raster order.
    pub fn samples(&self) -> Vec<u16> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| self.sample(x, y))
            .collect()
    }

    /// Returns true if the buffer covers every row at the declared stride.
    pub fn is_valid(&self) -> bool {
        self.stride >= self.row_bytes()
            && (self.height == 0 || self.data.len() >= (self.height - 1) * self.stride + self.row_bytes())
    }
}

impl std::fmt::Debug for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plane")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("depth", &self.depth)
            .finish()
    }
}
