//! Raw planar YUV streams.
//!
//! Frames are stored back to back with no header: the Y plane, then U,
//! then V, each tightly packed. Samples above 8 bits are little-endian words.

use super::{Frame, FrameSource, SourceError, StreamLayout, PLANE_COUNT};
use std::io::{ErrorKind, Read, Write};

/// Reads raw planar frames from any byte stream.
pub struct RawYuvReader<R> {
    inner: R,
    layout: StreamLayout,
    buffer: Vec<u8>,
    sequence: u64,
}

impl<R: Read> RawYuvReader<R> {
    /// Wraps `inner`; every frame must follow `layout`.
    pub fn new(inner: R, layout: StreamLayout) -> Self {
        Self {
            inner,
            layout,
            buffer: vec![0u8; layout.frame_bytes()],
            sequence: 0,
        }
    }

    /// Fills the frame buffer; returns the number of bytes read before EOF.
    fn fill(&mut self) -> Result<usize, SourceError> {
        let mut filled = 0;
        while filled < self.buffer.len() {
            match self.inner.read(&mut self.buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> FrameSource for RawYuvReader<R> {
    fn layout(&self) -> StreamLayout {
        self.layout
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let filled = self.fill()?;
        if filled == 0 {
            return Ok(None);
        }
        self.sequence += 1;
        if filled < self.buffer.len() {
            return Err(SourceError::Truncated {
                sequence: self.sequence,
                got: filled,
                need: self.buffer.len(),
            });
        }

        let mut frame = Frame::new(self.layout, self.sequence);
        let mut offset = 0;
        for index in 0..PLANE_COUNT {
            let plane = frame.plane_mut(index);
            let len = plane.data().len();
            plane
                .data_mut()
                .copy_from_slice(&self.buffer[offset..offset + len]);
            offset += len;
        }

        tracing::trace!(sequence = self.sequence, bytes = offset, "Read raw frame");
        Ok(Some(frame))
    }
}

/// Writes frames as raw planar data, dropping any stride padding.
pub struct RawYuvWriter<W> {
    inner: W,
    layout: StreamLayout,
    frames_written: u64,
}

impl<W: Write> RawYuvWriter<W> {
    /// Wraps `inner`; every frame must follow `layout`.
    pub fn new(inner: W, layout: StreamLayout) -> Self {
        Self {
            inner,
            layout,
            frames_written: 0,
        }
    }

    /// Writes one frame.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), SourceError> {
        if frame.layout() != self.layout {
            return Err(SourceError::LayoutMismatch {
                expected: self.layout,
                got: frame.layout(),
            });
        }
        for plane in frame.planes() {
            for y in 0..plane.height() {
                self.inner.write_all(plane.row(y))?;
            }
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Returns the number of frames written.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Flushes and returns the inner writer.
    pub fn into_inner(mut self) -> Result<W, SourceError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
