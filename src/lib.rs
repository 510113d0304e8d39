//! High Quality 3D Denoiser
//!
//! A spatio-temporal lowpass filter for planar YUV video. Every sample is
//! pulled toward its left and upper neighbors and toward the previous
//! output at the same position, by an amount that falls off as the
//! difference grows, so flat noise is smoothed while edges survive.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! config → coefficients ─┐
//!                        ↓
//! video (source) → filter (Denoiser) → video (sink)
//!                        ↓
//!          analysis, digest, metrics
//! ```
//!
//! # Design Principles
//!
//! - **Causal**: each output depends only on earlier pixels and earlier frames
//! - **Explicit state**: temporal memory is owned by one [`Denoiser`] per stream
//! - **Depth-specialized**: 8, 9 and 10-bit samples share one filter, monomorphized per depth
//! - **Deterministic**: identical input and strengths give bit-identical output
//!
//! # Example
//!
//! ```no_run
//! use hqdn3d::{
//!     filter::Denoiser,
//!     video::{FrameSource, PixelFormat, StreamLayout, SyntheticSource},
//! };
//!
//! let layout = StreamLayout::new(320, 240, PixelFormat::Yuv420p);
//! let mut denoiser = Denoiser::new(&"4:3:6:4.5".parse().unwrap()).unwrap();
//! denoiser.configure(layout).unwrap();
//!
//! let mut source = SyntheticSource::new(layout, 10, 42);
//! while let Some(frame) = source.next_frame().unwrap() {
//!     let clean = denoiser.process(&frame).unwrap();
//!     assert_eq!(clean.sequence(), frame.sequence());
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod coefficients;
pub mod config;
pub mod digest;
pub mod filter;
pub mod metrics;
pub mod video;

// Re-export commonly used types at crate root
pub use analysis::PlaneStatistics;
pub use coefficients::{CoefficientSet, CoefficientTable, PlaneClass};
pub use config::{ConfigError, FileConfig, Strengths};
pub use digest::{FrameDigest, FrameHasher, HashAlgorithm};
pub use filter::{denoise_plane, DenoiseError, Denoiser, PlaneGeometry};
pub use video::{Frame, FrameSource, PixelFormat, Plane, SampleDepth, StreamLayout};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
