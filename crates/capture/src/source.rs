use crate::frame::{Frame, PixelFormat};
use anyhow::Result;

/// Pull-based frame delivery from the capture layer.
///
/// The capture session lifecycle (device open, start, stop) belongs to the
/// implementor; the pipeline only consumes delivered frames. `Ok(None)`
/// means the source is exhausted (end of a recording, session closed).
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Deterministic generated frames for smoke runs and benches.
///
/// Produces a diagonal gradient that shifts by one pixel per frame, so
/// consecutive frames differ without any camera attached.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    format: PixelFormat,
    remaining: u64,
    next_frame_number: u64,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, format: PixelFormat, frame_count: u64) -> Self {
        Self {
            width,
            height,
            format,
            remaining: frame_count,
            next_frame_number: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        let n = self.next_frame_number;
        self.next_frame_number += 1;

        let mut pixels =
            Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                // Gray values, so RGBA and BGRA layouts agree byte for byte.
                let v = ((x + y + n as u32) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }

        let frame = Frame::new(n, n * 33_000_000, self.width, self.height, self.format, pixels)?;
        tracing::trace!(frame_number = n, "Synthetic frame generated");
        Ok(Some(frame))
    }
}
