use capture::PixelFormat;
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image,
};
use ndarray::{Array, ArrayD, IxDyn};

const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

/// Converts one packed 32-bit frame into the network's input tensor.
///
/// The model was trained on stretched (non-aspect-preserving) squares, so
/// the resize deliberately ignores the source aspect ratio.
pub struct PreProcessor {
    pub input_size: (u32, u32),
    src_buffer: Vec<u8>,
    resized_buffer: Vec<u8>,
    resizer: Resizer,
}

impl PreProcessor {
    pub fn new(input_size: (u32, u32)) -> Self {
        Self {
            input_size,
            src_buffer: Vec::with_capacity(1920 * 1080 * 4),
            resized_buffer: vec![0u8; (input_size.0 * input_size.1 * 4) as usize],
            resizer: Resizer::new(),
        }
    }

    /// Produce a `[1, H, W, 3]` NHWC tensor with values in roughly [-1, 1].
    pub fn preprocess_frame(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> anyhow::Result<ArrayD<f32>> {
        tracing::trace!(
            width,
            height,
            format = ?format,
            pixel_bytes = pixels.len(),
            "Preprocessing frame dimensions"
        );

        self.copy_pixels(pixels, width, height)?;
        self.resize(width, height)?;
        self.normalize(format)
    }

    fn copy_pixels(&mut self, pixels: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
        if width == 0 || height == 0 {
            anyhow::bail!("zero-area source frame: {}x{}", width, height);
        }

        let expected_size = width as usize * height as usize * PixelFormat::BYTES_PER_PIXEL;
        if pixels.len() != expected_size {
            anyhow::bail!(
                "Buffer size mismatch: expected {} bytes for {}x{}, got {}",
                expected_size,
                width,
                height,
                pixels.len()
            );
        }

        self.src_buffer.clear();
        self.src_buffer.extend_from_slice(pixels);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        let src = Image::from_slice_u8(width, height, &mut self.src_buffer, PixelType::U8x4)?;
        let mut dst = Image::from_slice_u8(
            self.input_size.0,
            self.input_size.1,
            &mut self.resized_buffer,
            PixelType::U8x4,
        )?;

        self.resizer.resize(
            &src,
            &mut dst,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        )?;

        Ok(())
    }

    fn normalize(&self, format: PixelFormat) -> anyhow::Result<ArrayD<f32>> {
        let (w, h) = (self.input_size.0 as usize, self.input_size.1 as usize);
        // Alpha is dropped here; output stays channel-interleaved (NHWC).
        let (ri, gi, bi) = match format {
            PixelFormat::Rgba => (0, 1, 2),
            PixelFormat::Bgra => (2, 1, 0),
        };

        let mut output = vec![0.0f32; h * w * 3];
        for (i, px) in self.resized_buffer.chunks_exact(4).enumerate() {
            output[i * 3] = (px[ri] as f32 - NORM_MEAN) / NORM_STD;
            output[i * 3 + 1] = (px[gi] as f32 - NORM_MEAN) / NORM_STD;
            output[i * 3 + 2] = (px[bi] as f32 - NORM_MEAN) / NORM_STD;
        }

        Ok(Array::from_shape_vec(IxDyn(&[1, h, w, 3]), output)?)
    }
}
