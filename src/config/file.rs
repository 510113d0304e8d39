//! TOML configuration file.

use super::{ConfigError, StrengthOverrides, Strengths};
use crate::digest::HashAlgorithm;
use crate::video::StreamLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Full configuration file format.
///
/// ```toml
/// [denoise]
/// luma_spatial = 4.0
/// luma_temporal = 6.0
///
/// [stream]
/// width = 1920
/// height = 1080
/// format = "yuv420p10"
///
/// [output]
/// frame_limit = 100
/// hash = "blake3"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub denoise: DenoiseConfig,
    #[serde(default)]
    pub stream: Option<StreamLayout>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Denoise section: either a positional parameter string or named values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DenoiseConfig {
    /// Positional `ls:cs:lt:ct` string; takes precedence over named values.
    #[serde(default)]
    pub params: Option<String>,
    #[serde(flatten)]
    pub overrides: StrengthOverrides,
}

impl DenoiseConfig {
    /// Resolves and validates the strengths.
    pub fn strengths(&self) -> Result<Strengths, ConfigError> {
        let strengths = match &self.params {
            Some(params) => params.parse()?,
            None => self.overrides.resolve(),
        };
        strengths.validate()?;
        Ok(strengths)
    }
}

/// Output section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Stop after this many frames (unlimited if absent).
    #[serde(default)]
    pub frame_limit: Option<u64>,
    /// Print a per-frame digest of the filtered output.
    #[serde(default)]
    pub hash: Option<HashAlgorithm>,
    /// Write Prometheus metrics here when done.
    #[serde(default)]
    pub metrics_path: Option<PathBuf>,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        content.parse()
    }
}

impl std::str::FromStr for FileConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: FileConfig =
            toml::from_str(s).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.denoise.strengths()?;
        if let Some(stream) = &config.stream {
            stream.validate()?;
        }
        Ok(config)
    }
}
