//! Supported pixel formats and sample depths.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Bits per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleDepth {
    /// One byte per sample.
    Eight,
    /// Little-endian 16-bit word per sample, 9 significant bits.
    Nine,
    /// Little-endian 16-bit word per sample, 10 significant bits.
    Ten,
}

impl SampleDepth {
    /// Returns the number of significant bits.
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            SampleDepth::Eight => 8,
            SampleDepth::Nine => 9,
            SampleDepth::Ten => 10,
        }
    }

    /// Returns the storage size of one sample.
    #[inline]
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleDepth::Eight => 1,
            SampleDepth::Nine | SampleDepth::Ten => 2,
        }
    }

    /// Returns the largest representable sample value.
    #[inline]
    pub fn max_value(self) -> u16 {
        (1u16 << self.bits()) - 1
    }
}

impl TryFrom<u32> for SampleDepth {
    type Error = ConfigError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(SampleDepth::Eight),
            9 => Ok(SampleDepth::Nine),
            10 => Ok(SampleDepth::Ten),
            other => Err(ConfigError::UnsupportedDepth(other)),
        }
    }
}

impl std::fmt::Display for SampleDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Planar YUV layouts the filter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PixelFormat {
    Yuv420p,
    Yuv422p,
    Yuv444p,
    Yuv410p,
    Yuv411p,
    Yuv440p,
    Yuv420p9,
    Yuv422p9,
    Yuv444p9,
    Yuv420p10,
    Yuv422p10,
    Yuv444p10,
}

impl PixelFormat {
    /// Every supported format.
    pub const ALL: [PixelFormat; 12] = [
        PixelFormat::Yuv420p,
        PixelFormat::Yuv422p,
        PixelFormat::Yuv444p,
        PixelFormat::Yuv410p,
        PixelFormat::Yuv411p,
        PixelFormat::Yuv440p,
        PixelFormat::Yuv420p9,
        PixelFormat::Yuv422p9,
        PixelFormat::Yuv444p9,
        PixelFormat::Yuv420p10,
        PixelFormat::Yuv422p10,
        PixelFormat::Yuv444p10,
    ];

    /// Returns the canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Yuv420p => "yuv420p",
            PixelFormat::Yuv422p => "yuv422p",
            PixelFormat::Yuv444p => "yuv444p",
            PixelFormat::Yuv410p => "yuv410p",
            PixelFormat::Yuv411p => "yuv411p",
            PixelFormat::Yuv440p => "yuv440p",
            PixelFormat::Yuv420p9 => "yuv420p9",
            PixelFormat::Yuv422p9 => "yuv422p9",
            PixelFormat::Yuv444p9 => "yuv444p9",
            PixelFormat::Yuv420p10 => "yuv420p10",
            PixelFormat::Yuv422p10 => "yuv422p10",
            PixelFormat::Yuv444p10 => "yuv444p10",
        }
    }

    /// Horizontal chroma subsampling as a shift.
    pub fn log2_chroma_w(self) -> u32 {
        match self {
            PixelFormat::Yuv444p
            | PixelFormat::Yuv440p
            | PixelFormat::Yuv444p9
            | PixelFormat::Yuv444p10 => 0,
            PixelFormat::Yuv420p
            | PixelFormat::Yuv422p
            | PixelFormat::Yuv420p9
            | PixelFormat::Yuv422p9
            | PixelFormat::Yuv420p10
            | PixelFormat::Yuv422p10 => 1,
            PixelFormat::Yuv410p | PixelFormat::Yuv411p => 2,
        }
    }

    /// Vertical chroma subsampling as a shift.
    pub fn log2_chroma_h(self) -> u32 {
        match self {
            PixelFormat::Yuv420p
            | PixelFormat::Yuv440p
            | PixelFormat::Yuv420p9
            | PixelFormat::Yuv420p10 => 1,
            PixelFormat::Yuv410p => 2,
            _ => 0,
        }
    }

    /// Returns the sample depth shared by all three planes.
    pub fn depth(self) -> SampleDepth {
        match self {
            PixelFormat::Yuv420p9 | PixelFormat::Yuv422p9 | PixelFormat::Yuv444p9 => {
                SampleDepth::Nine
            }
            PixelFormat::Yuv420p10 | PixelFormat::Yuv422p10 | PixelFormat::Yuv444p10 => {
                SampleDepth::Ten
            }
            _ => SampleDepth::Eight,
        }
    }

    /// Returns the dimensions of plane `index` for a `width`x`height` frame.
    ///
    /// Chroma dimensions round up so odd-sized frames keep their last column/row.
    pub fn plane_dimensions(self, index: usize, width: u32, height: u32) -> (u32, u32) {
        if index == 0 {
            (width, height)
        } else {
            (
                ceil_rshift(width, self.log2_chroma_w()),
                ceil_rshift(height, self.log2_chroma_h()),
            )
        }
    }
}

#[inline]
fn ceil_rshift(value: u32, shift: u32) -> u32 {
    (value + (1 << shift) - 1) >> shift
}

impl FromStr for PixelFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        // full-range variants share the layout
        let name = match lower.strip_prefix("yuvj") {
            Some(rest) => format!("yuv{rest}"),
            None => lower,
        };
        PixelFormat::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| ConfigError::UnsupportedFormat(s.to_string()))
    }
}

impl TryFrom<String> for PixelFormat {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PixelFormat> for String {
    fn from(format: PixelFormat) -> Self {
        format.name().to_string()
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
