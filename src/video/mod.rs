//! Frames, planes and their sources.
//!
//! The denoiser itself only needs plane buffers with a width, height,
//! stride and depth. This module provides an owned representation of
//! those, plus readers and writers for raw planar YUV streams.

mod format;
mod frame;
mod io;
mod plane;
mod source;

pub use format::{PixelFormat, SampleDepth};
pub use frame::{Frame, StreamLayout, PLANE_COUNT};
pub use io::{RawYuvReader, RawYuvWriter};
pub use plane::Plane;
pub use source::{FrameSource, SourceError, SyntheticSource};
