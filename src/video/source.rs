//! Frame sources.
//!
//! The filter consumes frames through the [`FrameSource`] trait so the
//! CLI can switch between raw files and synthetic test content.

use super::{Frame, StreamLayout};
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use thiserror::Error;

/// Errors that can occur while producing or consuming frames.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("truncated frame {sequence}: got {got} of {need} bytes")]
    Truncated {
        sequence: u64,
        got: usize,
        need: usize,
    },
    #[error("frame layout {got} does not match stream layout {expected}")]
    LayoutMismatch {
        expected: StreamLayout,
        got: StreamLayout,
    },
}

/// Trait for anything that produces frames in presentation order.
pub trait FrameSource {
    /// Returns the layout every produced frame follows.
    fn layout(&self) -> StreamLayout;

    /// Produces the next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}

/// Deterministic noisy test content.
///
/// Each plane carries a static diagonal gradient; every frame adds fresh
/// uniform noise drawn from a seeded ChaCha stream.
pub struct SyntheticSource {
    layout: StreamLayout,
    rng: ChaCha20Rng,
    noise_amplitude: u16,
    remaining: u64,
    sequence: u64,
}

impl SyntheticSource {
    /// Creates a source producing `frame_count` frames.
    pub fn new(layout: StreamLayout, frame_count: u64, seed: u64) -> Self {
        Self {
            layout,
            rng: ChaCha20Rng::seed_from_u64(seed),
            noise_amplitude: 4,
            remaining: frame_count,
            sequence: 0,
        }
    }

    /// Sets the noise amplitude in 8-bit units (scaled to the format depth).
    pub fn with_noise(mut self, amplitude: u16) -> Self {
        self.noise_amplitude = amplitude;
        self
    }

    fn render(&mut self) -> Frame {
        let depth = self.layout.format.depth();
        let scale = depth.bits() - 8;
        let max = i32::from(depth.max_value());
        let amplitude = i32::from(self.noise_amplitude) << scale;
        let span = (2 * amplitude + 1) as u32;

        let mut frame = Frame::new(self.layout, self.sequence);
        for index in 0..3 {
            let plane = frame.plane_mut(index);
            let (w, h) = (plane.width(), plane.height());
            for y in 0..h {
                for x in 0..w {
                    let base = (((x + y) * 255 / (w + h).max(1)) as i32) << scale;
                    let noise = (self.rng.next_u32() % span) as i32 - amplitude;
                    plane.set_sample(x, y, (base + noise).clamp(0, max) as u16);
                }
            }
        }
        frame
    }
}

impl FrameSource for SyntheticSource {
    fn layout(&self) -> StreamLayout {
        self.layout
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        self.sequence += 1;
        Ok(Some(self.render()))
    }
}

impl std::fmt::Debug for SyntheticSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntheticSource")
            .field("layout", &self.layout)
            .field("noise_amplitude", &self.noise_amplitude)
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}
