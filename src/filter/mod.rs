//! The spatio-temporal denoiser.
//!
//! Each plane runs through a causal lowpass: against its left and upper
//! neighbors (spatial), then against the previous output for the same
//! position (temporal). The temporal memory persists across frames, so
//! frames must be fed in presentation order.

mod plane;
mod sample;
mod spatial;
mod temporal;

pub use plane::{denoise_plane, PlaneGeometry};

use crate::coefficients::{CoefficientSet, PlaneClass};
use crate::config::{ConfigError, Strengths};
use crate::video::{Frame, StreamLayout, PLANE_COUNT};
use thiserror::Error;

/// Errors that can occur while denoising.
#[derive(Debug, Error)]
pub enum DenoiseError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("denoiser not configured for a stream")]
    NotConfigured,
    #[error("frame layout {got} does not match stream layout {expected}")]
    LayoutMismatch {
        expected: StreamLayout,
        got: StreamLayout,
    },
    #[error("frame {sequence} planes do not match its layout")]
    InvalidFrame { sequence: u64 },
    #[error("{buffer} stride {stride} shorter than a row of {row_bytes} bytes")]
    StrideTooSmall {
        buffer: &'static str,
        stride: usize,
        row_bytes: usize,
    },
    #[error("{buffer} buffer too small: need {need}, got {got}")]
    BufferTooSmall {
        buffer: &'static str,
        need: usize,
        got: usize,
    },
    #[error("temporal memory holds {expected} samples but plane has {got}")]
    TemporalSizeMismatch { expected: usize, got: usize },
    #[error("failed to allocate {bytes} bytes of filter state")]
    Allocation { bytes: usize },
}

/// High quality 3D denoiser for one stream.
///
/// Owns the four coefficient tables, the line scratch buffer and one
/// temporal memory per plane.
pub struct Denoiser {
    strengths: Strengths,
    tables: CoefficientSet,
    layout: Option<StreamLayout>,
    line_ant: Vec<u16>,
    frame_ant: [Option<Vec<u16>>; PLANE_COUNT],
    frames_processed: u64,
    temporal_allocations: u64,
}

impl Denoiser {
    /// Validates `strengths` and builds the coefficient tables.
    pub fn new(strengths: &Strengths) -> Result<Self, ConfigError> {
        strengths.validate()?;
        tracing::debug!(%strengths, "Building coefficient tables");

        Ok(Self {
            strengths: *strengths,
            tables: CoefficientSet::build(strengths),
            layout: None,
            line_ant: Vec::new(),
            frame_ant: Default::default(),
            frames_processed: 0,
            temporal_allocations: 0,
        })
    }

    /// Prepares for a stream with the given layout.
    ///
    /// Any temporal memory from a previous stream is dropped.
    pub fn configure(&mut self, layout: StreamLayout) -> Result<(), DenoiseError> {
        layout.validate()?;

        let width = layout.width as usize;
        let mut line_ant = Vec::new();
        line_ant
            .try_reserve_exact(width)
            .map_err(|_| DenoiseError::Allocation {
                bytes: width * std::mem::size_of::<u16>(),
            })?;
        line_ant.resize(width, 0);

        self.line_ant = line_ant;
        self.frame_ant = Default::default();
        self.layout = Some(layout);

        tracing::info!(%layout, depth = %layout.format.depth(), "Denoiser configured");
        Ok(())
    }

    /// Denoises `input` into a newly allocated frame.
    pub fn process(&mut self, input: &Frame) -> Result<Frame, DenoiseError> {
        let mut output = Frame::new(input.layout(), input.sequence());
        self.process_into(input, &mut output)?;
        Ok(output)
    }

    /// Denoises `input` into `output`, which may use different strides.
    pub fn process_into(&mut self, input: &Frame, output: &mut Frame) -> Result<(), DenoiseError> {
        let layout = self.layout.ok_or(DenoiseError::NotConfigured)?;
        for frame in [input, &*output] {
            if frame.layout() != layout {
                return Err(DenoiseError::LayoutMismatch {
                    expected: layout,
                    got: frame.layout(),
                });
            }
            if !frame.is_valid() {
                return Err(DenoiseError::InvalidFrame {
                    sequence: frame.sequence(),
                });
            }
        }

        let depth = layout.format.depth();
        for index in 0..PLANE_COUNT {
            let src = input.plane(index);
            let dst = output.plane_mut(index);
            let geometry = PlaneGeometry {
                width: src.width(),
                height: src.height(),
                src_stride: src.stride(),
                dst_stride: dst.stride(),
            };
            let seeded = self.frame_ant[index].is_none();

            denoise_plane(
                src.data(),
                dst.data_mut(),
                &mut self.line_ant,
                &mut self.frame_ant[index],
                geometry,
                self.tables.pair(PlaneClass::of_plane(index)),
                depth,
            )?;

            if seeded {
                self.temporal_allocations += 1;
                tracing::debug!(
                    plane = index,
                    width = geometry.width,
                    height = geometry.height,
                    "Seeded temporal memory"
                );
            }
        }

        output.set_sequence(input.sequence());
        self.frames_processed += 1;
        tracing::trace!(sequence = input.sequence(), "Frame denoised");
        Ok(())
    }

    /// Drops the temporal memory; the next frame starts a fresh reference.
    pub fn reset(&mut self) {
        self.frame_ant = Default::default();
        tracing::info!("Denoiser temporal state reset");
    }

    /// Returns the effective strengths.
    pub fn strengths(&self) -> &Strengths {
        &self.strengths
    }

    /// Returns the coefficient tables.
    pub fn tables(&self) -> &CoefficientSet {
        &self.tables
    }

    /// Returns the configured stream layout.
    pub fn layout(&self) -> Option<StreamLayout> {
        self.layout
    }

    /// Returns the temporal memory of plane `index`, if seeded.
    pub fn temporal_state(&self, index: usize) -> Option<&[u16]> {
        self.frame_ant.get(index)?.as_deref()
    }

    /// Returns the number of frames denoised.
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Returns how many temporal memories have been allocated so far.
    pub fn temporal_allocations(&self) -> u64 {
        self.temporal_allocations
    }
}

impl std::fmt::Debug for Denoiser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Denoiser")
            .field("strengths", &self.strengths)
            .field("layout", &self.layout)
            .field("frames_processed", &self.frames_processed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::{FrameSource, PixelFormat, Plane, RawYuvReader, SyntheticSource};

    fn denoiser(params: &str, layout: StreamLayout) -> Denoiser {
        let mut denoiser = Denoiser::new(&params.parse().unwrap()).unwrap();
        denoiser.configure(layout).unwrap();
        denoiser
    }

    #[test]
    fn test_rejects_invalid_strengths() {
        let strengths: Strengths = "-1:3".parse().unwrap();
        assert!(matches!(
            Denoiser::new(&strengths),
            Err(ConfigError::NegativeStrength { .. })
        ));
    }

    #[test]
    fn test_requires_configuration() {
        let mut denoiser = Denoiser::new(&Strengths::default()).unwrap();
        let frame = Frame::new(StreamLayout::new(4, 4, PixelFormat::Yuv420p), 1);

        assert!(matches!(
            denoiser.process(&frame),
            Err(DenoiseError::NotConfigured)
        ));
    }

    #[test]
    fn test_rejects_zero_sized_stream() {
        let mut denoiser = Denoiser::new(&Strengths::default()).unwrap();
        assert!(matches!(
            denoiser.configure(StreamLayout::new(0, 4, PixelFormat::Yuv420p)),
            Err(DenoiseError::Config(ConfigError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    fn test_rejects_layout_change_mid_stream() {
        let layout = StreamLayout::new(8, 8, PixelFormat::Yuv420p);
        let mut denoiser = denoiser("", layout);
        let frame = Frame::new(StreamLayout::new(8, 8, PixelFormat::Yuv444p), 1);

        assert!(matches!(
            denoiser.process(&frame),
            Err(DenoiseError::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn test_flat_gray_frames_stay_gray() {
        let layout = StreamLayout::new(4, 2, PixelFormat::Yuv444p);
        let mut denoiser = denoiser("", layout);

        for sequence in 1..=3 {
            let mut frame = Frame::new(layout, sequence);
            for index in 0..PLANE_COUNT {
                frame.plane_mut(index).fill(128);
            }
            let out = denoiser.process(&frame).unwrap();

            assert_eq!(out.sequence(), sequence);
            for plane in out.planes() {
                assert!(plane.samples().iter().all(|&v| v == 128));
            }
        }
        assert_eq!(denoiser.frames_processed(), 3);
        assert_eq!(denoiser.temporal_allocations(), 3);
    }

    #[test]
    fn test_zero_strength_passthrough() {
        let layout = StreamLayout::new(16, 8, PixelFormat::Yuv420p10);
        let mut denoiser = denoiser("0:0:0:0", layout);
        let mut source = SyntheticSource::new(layout, 2, 9).with_noise(10);

        while let Some(frame) = source.next_frame().unwrap() {
            let out = denoiser.process(&frame).unwrap();
            assert_eq!(out.planes(), frame.planes());
        }
    }

    #[test]
    fn test_temporal_state_seeded_from_first_frame() {
        let layout = StreamLayout::new(6, 4, PixelFormat::Yuv420p);
        let mut denoiser = denoiser("0:0:0:0", layout);
        let frame = SyntheticSource::new(layout, 1, 5)
            .next_frame()
            .unwrap()
            .unwrap();

        assert!(denoiser.temporal_state(0).is_none());
        denoiser.process(&frame).unwrap();

        for index in 0..PLANE_COUNT {
            let expected: Vec<u16> = frame
                .plane(index)
                .samples()
                .iter()
                .map(|&v| v << 8)
                .collect();
            assert_eq!(denoiser.temporal_state(index).unwrap(), &expected[..]);
        }
    }

    #[test]
    fn test_chroma_uses_chroma_tables() {
        // luma untouched, chroma denoised
        let layout = StreamLayout::new(8, 8, PixelFormat::Yuv444p);
        let mut denoiser = denoiser("0:6:0:6", layout);
        let mut source = SyntheticSource::new(layout, 3, 11).with_noise(3);

        let mut luma_changed = false;
        let mut chroma_changed = false;
        while let Some(frame) = source.next_frame().unwrap() {
            let out = denoiser.process(&frame).unwrap();
            luma_changed |= out.plane(0) != frame.plane(0);
            chroma_changed |= out.plane(1) != frame.plane(1);
        }
        assert!(!luma_changed);
        assert!(chroma_changed);
    }

    #[test]
    fn test_output_with_padded_stride() {
        let layout = StreamLayout::new(4, 2, PixelFormat::Yuv420p);
        let mut denoiser = denoiser("", layout);
        let mut input = Frame::new(layout, 1);
        for index in 0..PLANE_COUNT {
            input.plane_mut(index).fill(90);
        }
        let depth = layout.format.depth();
        let mut output = Frame::from_planes(
            layout,
            [
                Plane::with_stride(4, 2, 16, depth),
                Plane::with_stride(2, 1, 16, depth),
                Plane::with_stride(2, 1, 16, depth),
            ],
            0,
        );

        denoiser.process_into(&input, &mut output).unwrap();

        assert_eq!(output.sequence(), 1);
        for plane in output.planes() {
            assert!(plane.samples().iter().all(|&v| v == 90));
        }
    }

    #[test]
    fn test_out_of_range_words_are_masked() {
        let layout = StreamLayout::new(2, 2, PixelFormat::Yuv444p10);
        let mut denoiser = denoiser("", layout);
        let raw = vec![0xFFu8; layout.frame_bytes()];
        let mut reader = RawYuvReader::new(&raw[..], layout);
        let frame = reader.next_frame().unwrap().unwrap();

        for _ in 0..2 {
            let out = denoiser.process(&frame).unwrap();
            for plane in out.planes() {
                assert!(plane.samples().iter().all(|&v| v == 1023));
            }
        }
    }

    #[test]
    fn test_reset_reseeds() {
        let layout = StreamLayout::new(4, 4, PixelFormat::Yuv420p);
        let mut denoiser = denoiser("", layout);
        let mut source = SyntheticSource::new(layout, 2, 1);

        denoiser.process(&source.next_frame().unwrap().unwrap()).unwrap();
        denoiser.reset();
        assert!(denoiser.temporal_state(0).is_none());

        denoiser.process(&source.next_frame().unwrap().unwrap()).unwrap();
        assert_eq!(denoiser.temporal_allocations(), 6);
    }

    #[test]
    fn test_configure_drops_previous_stream() {
        let layout = StreamLayout::new(4, 4, PixelFormat::Yuv420p);
        let mut denoiser = denoiser("", layout);
        denoiser.process(&Frame::new(layout, 1)).unwrap();

        let bigger = StreamLayout::new(8, 8, PixelFormat::Yuv420p);
        denoiser.configure(bigger).unwrap();
        assert!(denoiser.temporal_state(0).is_none());
        assert!(denoiser.process(&Frame::new(bigger, 1)).is_ok());
    }
}
