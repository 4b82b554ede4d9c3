use thiserror::Error;

/// Packed 32-bit pixel layouts delivered by the capture layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba,
    Bgra,
}

impl PixelFormat {
    pub const BYTES_PER_PIXEL: usize = 4;
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("zero-area frame: {width}x{height}")]
    ZeroArea { width: u32, height: u32 },
    #[error("pixel buffer size mismatch: expected {expected} bytes for {width}x{height}, got {actual}")]
    SizeMismatch {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
    },
}

/// One captured video frame.
///
/// Owns its pixel data, so a frame handed to the pipeline cannot be
/// recycled or mutated underneath the preprocessor.
#[derive(Debug, Clone)]
pub struct Frame {
    pub frame_number: u64,
    pub timestamp_ns: u64,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pixels: Vec<u8>,
}

impl Frame {
    pub fn new(
        frame_number: u64,
        timestamp_ns: u64,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroArea { width, height });
        }
        let expected = width as usize * height as usize * PixelFormat::BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                actual: pixels.len(),
                width,
                height,
            });
        }
        Ok(Self {
            frame_number,
            timestamp_ns,
            width,
            height,
            format,
            pixels,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
