//! Filter configuration.
//!
//! Strengths can come from a positional parameter string, from named
//! overrides, or from a TOML file. Whatever the source, they are
//! validated before any coefficient table is built.

mod file;
mod strengths;

pub use file::{DenoiseConfig, FileConfig, OutputConfig};
pub use strengths::{
    StrengthOverrides, Strengths, CHROMA_SPATIAL_DEFAULT, LUMA_SPATIAL_DEFAULT,
    LUMA_TEMPORAL_DEFAULT,
};

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid negative value for {name} strength: {value}")]
    NegativeStrength { name: &'static str, value: f64 },
    #[error("resulting value for {0} strength is nan")]
    NotANumber(&'static str),
    #[error("too many strength values: got {0}, at most 4 allowed")]
    TooManyStrengths(usize),
    #[error("invalid strength value: {0:?}")]
    InvalidStrength(String),
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),
    #[error("unsupported sample depth: {0} bits (must be 8, 9 or 10)")]
    UnsupportedDepth(u32),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}
