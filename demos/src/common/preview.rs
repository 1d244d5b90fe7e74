//! PNG previews and summary statistics for raw float buffers.

use std::path::Path;

use anyhow::{Context, Result};
use burn::tensor::{backend::Backend, cast::ToElement, Tensor};
use image::RgbaImage;
use stylecrop_burn::RAW_CHANNELS;

/// Min, max and mean of a tensor's values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TensorStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl TensorStats {
    /// Calculate tensor statistics
    pub fn of<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Self {
        Self {
            min: tensor.clone().min().into_scalar().to_f32(),
            max: tensor.clone().max().into_scalar().to_f32(),
            mean: tensor.mean().into_scalar().to_f32(),
        }
    }
}

/// Converts a `[H, W, 4]` float buffer to 8-bit RGBA, clamping values to `[0, 1]`.
///
/// With `opaque` the alpha channel is forced to 255, which is what you want for
/// framebuffers whose alpha is zero.
pub fn raw_to_rgba8<B: Backend>(image: Tensor<B, 3>, opaque: bool) -> Result<RgbaImage> {
    let [height, width, channels] = image.dims();
    if channels != RAW_CHANNELS {
        anyhow::bail!("Expected {RAW_CHANNELS} channels, got {channels}");
    }

    let values = image
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow::anyhow!("failed to read tensor data: {e:?}"))?;

    let pixels: Vec<u8> = values
        .chunks_exact(RAW_CHANNELS)
        .flat_map(|pixel| {
            let alpha = if opaque { 1.0 } else { pixel[3] };
            [pixel[0], pixel[1], pixel[2], alpha]
                .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        })
        .collect();

    RgbaImage::from_raw(width as u32, height as u32, pixels)
        .context("pixel buffer does not match image dimensions")
}

/// Writes a PNG preview of a `[H, W, 4]` float buffer.
pub fn save_preview<B: Backend, P: AsRef<Path>>(
    path: P,
    image: Tensor<B, 3>,
    opaque: bool,
) -> Result<()> {
    let path = path.as_ref();
    raw_to_rgba8(image, opaque)?
        .save(path)
        .with_context(|| format!("Failed to save preview to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::NdArray;
    use burn::tensor::TensorData;

    type TestBackend = NdArray<f32>;

    #[test]
    fn converts_and_clamps_pixels() {
        let values = vec![0.0, 0.5, 1.0, 0.0, -1.0, 2.0, 0.25, 1.0];
        let image = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(values, [1, 2, 4]),
            &Default::default(),
        );

        let rgba = raw_to_rgba8(image.clone(), false).unwrap();
        assert_eq!(rgba.dimensions(), (2, 1));
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 128, 255, 0]);
        assert_eq!(rgba.get_pixel(1, 0).0, [0, 255, 64, 255]);

        let opaque = raw_to_rgba8(image, true).unwrap();
        assert_eq!(opaque.get_pixel(0, 0).0[3], 255);
    }

    #[test]
    fn rejects_non_rgba_buffers() {
        let image = Tensor::<TestBackend, 3>::zeros([2, 2, 3], &Default::default());
        assert!(raw_to_rgba8(image, true).is_err());
    }

    #[test]
    fn stats_of_known_values() {
        let image = Tensor::<TestBackend, 1>::from_floats([1.0, 2.0, 3.0, 6.0], &Default::default());
        let stats = TensorStats::of(image);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 6.0);
        assert_eq!(stats.mean, 3.0);
    }
}
