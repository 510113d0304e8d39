//! Denoise strengths and their derivation rules.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default luma spatial strength.
pub const LUMA_SPATIAL_DEFAULT: f64 = 4.0;
/// Default chroma spatial strength.
pub const CHROMA_SPATIAL_DEFAULT: f64 = 3.0;
/// Default luma temporal strength.
pub const LUMA_TEMPORAL_DEFAULT: f64 = 6.0;

/// Maximum number of positional values in a parameter string.
const MAX_POSITIONAL: usize = 4;

/// The four strengths driving the coefficient tables.
///
/// Higher values denoise more aggressively. Spatial strengths act within
/// a frame, temporal strengths against the previous output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strengths {
    /// Luma spatial strength.
    pub luma_spatial: f64,
    /// Chroma spatial strength.
    pub chroma_spatial: f64,
    /// Luma temporal strength.
    pub luma_temporal: f64,
    /// Chroma temporal strength.
    pub chroma_temporal: f64,
}

impl Default for Strengths {
    fn default() -> Self {
        StrengthOverrides::default().resolve()
    }
}

/// Partially specified strengths; missing values are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrengthOverrides {
    /// Luma spatial strength.
    #[serde(default)]
    pub luma_spatial: Option<f64>,
    /// Chroma spatial strength.
    #[serde(default)]
    pub chroma_spatial: Option<f64>,
    /// Luma temporal strength.
    #[serde(default)]
    pub luma_temporal: Option<f64>,
    /// Chroma temporal strength.
    #[serde(default)]
    pub chroma_temporal: Option<f64>,
}

impl StrengthOverrides {
    /// Fills in missing values.
    ///
    /// Chroma spatial and luma temporal scale with the luma spatial strength
    /// by the ratio of their defaults; chroma temporal keeps the luma
    /// temporal/spatial ratio.
    pub fn resolve(&self) -> Strengths {
        let luma_spatial = self.luma_spatial.unwrap_or(LUMA_SPATIAL_DEFAULT);
        let chroma_spatial = self
            .chroma_spatial
            .unwrap_or(CHROMA_SPATIAL_DEFAULT * luma_spatial / LUMA_SPATIAL_DEFAULT);
        let luma_temporal = self
            .luma_temporal
            .unwrap_or(LUMA_TEMPORAL_DEFAULT * luma_spatial / LUMA_SPATIAL_DEFAULT);
        let chroma_temporal = self
            .chroma_temporal
            .unwrap_or(luma_temporal * chroma_spatial / luma_spatial);

        Strengths {
            luma_spatial,
            chroma_spatial,
            luma_temporal,
            chroma_temporal,
        }
    }

    /// Builds overrides from positional values in `ls:cs:lt:ct` order.
    pub fn from_positional(values: &[f64]) -> Result<Self, ConfigError> {
        if values.len() > MAX_POSITIONAL {
            return Err(ConfigError::TooManyStrengths(values.len()));
        }
        let at = |i: usize| values.get(i).copied();
        Ok(Self {
            luma_spatial: at(0),
            chroma_spatial: at(1),
            luma_temporal: at(2),
            chroma_temporal: at(3),
        })
    }
}

impl Strengths {
    /// Resolves positional values (see [`StrengthOverrides::from_positional`]).
    pub fn from_positional(values: &[f64]) -> Result<Self, ConfigError> {
        Ok(StrengthOverrides::from_positional(values)?.resolve())
    }

    /// Checks the strengths before any table is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("luma spatial", self.luma_spatial),
            ("chroma spatial", self.chroma_spatial),
            ("luma temporal", self.luma_temporal),
            ("chroma temporal", self.chroma_temporal),
        ] {
            if value.is_nan() {
                return Err(ConfigError::NotANumber(name));
            }
            if value < 0.0 {
                return Err(ConfigError::NegativeStrength { name, value });
            }
        }
        Ok(())
    }
}

impl FromStr for Strengths {
    type Err = ConfigError;

    /// Parses `ls[:cs[:lt[:ct]]]`, optionally prefixed with `hqdn3d=`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("hqdn3d=").unwrap_or(s);
        if s.is_empty() {
            return Ok(Self::default());
        }

        let values = s
            .split(':')
            .map(|token| {
                token
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidStrength(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_positional(&values)
    }
}

impl std::fmt::Display for Strengths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ls:{} cs:{} lt:{} ct:{}",
            self.luma_spatial, self.chroma_spatial, self.luma_temporal, self.chroma_temporal
        )
    }
}
