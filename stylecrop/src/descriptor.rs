//! Style and content descriptors for target crops.
//!
//! The dataset never runs a network itself. It hands every target crop to a
//! [`DescriptorExtractor`], typically a wrapper around a pretrained feature
//! network, and stores whatever comes back. [`GramExtractor`] is a model-free
//! implementation working directly on pixels.

use burn::{
    nn::pool::{AvgPool2d, AvgPool2dConfig},
    prelude::*,
};
use burn_extra_ops::pad_axis_with_zeros;

/// Computes the loss targets for a batched `[1, 3, H, W]` crop.
pub trait DescriptorExtractor<B: Backend> {
    /// Texture statistics, one rank-3 tensor per feature level (e.g. Gram matrices).
    fn style(&self, crop: Tensor<B, 4>) -> Vec<Tensor<B, 3>>;

    /// Activations, one rank-4 tensor per feature level.
    fn content(&self, crop: Tensor<B, 4>) -> Vec<Tensor<B, 4>>;
}

/// Adapts a pair of closures into a [`DescriptorExtractor`].
#[derive(Debug, Clone)]
pub struct DescriptorFns<S, C> {
    style: S,
    content: C,
}

impl<S, C> DescriptorFns<S, C> {
    /// Wraps `style` and `content` functions.
    pub const fn new(style: S, content: C) -> Self {
        Self { style, content }
    }
}

impl<B, S, C> DescriptorExtractor<B> for DescriptorFns<S, C>
where
    B: Backend,
    S: Fn(Tensor<B, 4>) -> Vec<Tensor<B, 3>>,
    C: Fn(Tensor<B, 4>) -> Vec<Tensor<B, 4>>,
{
    fn style(&self, crop: Tensor<B, 4>) -> Vec<Tensor<B, 3>> {
        (self.style)(crop)
    }

    fn content(&self, crop: Tensor<B, 4>) -> Vec<Tensor<B, 4>> {
        (self.content)(crop)
    }
}

/// Channel Gram matrix of `[N, C, H, W]` features, normalised by `C * H * W`.
///
/// Returns `[N, C, C]`.
pub fn gram_matrix<B: Backend>(features: Tensor<B, 4>) -> Tensor<B, 3> {
    let [batch, channels, height, width] = features.dims();
    let flat = features.reshape([batch, channels, height * width]);
    let gram = flat.clone().matmul(flat.swap_dims(1, 2));

    gram.div_scalar((channels * height * width).max(1) as f32)
}

/// Pads a 3-channel `[N, 3, H, W]` batch with a zero alpha plane.
///
/// Any other channel count is returned unchanged.
pub fn expand_to_rgba<B: Backend>(x: Tensor<B, 4>) -> Tensor<B, 4> {
    let [_, channels, _, _] = x.dims();
    if channels == 3 {
        pad_axis_with_zeros(x, 1, 4)
    } else {
        x
    }
}

/// Configuration for [`GramExtractor`].
#[derive(Config, Debug)]
pub struct GramExtractorConfig {
    /// Number of pyramid levels, each half the resolution of the previous one.
    #[config(default = "1")]
    pub scales: usize,
}

impl GramExtractorConfig {
    /// Builds the extractor. At least one level is always produced.
    pub fn init(&self) -> GramExtractor {
        GramExtractor {
            scales: self.scales.max(1),
            pool: AvgPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
        }
    }
}

/// Pixel-space descriptors: Gram matrices over an average-pooled pyramid for
/// style, and the crop itself for content.
#[derive(Debug, Clone)]
pub struct GramExtractor {
    scales: usize,
    pool: AvgPool2d,
}

impl GramExtractor {
    /// Number of style levels this extractor emits for crops large enough to pool.
    pub const fn scales(&self) -> usize {
        self.scales
    }
}

impl<B: Backend> DescriptorExtractor<B> for GramExtractor {
    fn style(&self, crop: Tensor<B, 4>) -> Vec<Tensor<B, 3>> {
        let mut levels = Vec::with_capacity(self.scales);
        let mut features = crop;

        for level in 0..self.scales {
            levels.push(gram_matrix(features.clone()));

            let [_, _, height, width] = features.dims();
            if level + 1 == self.scales || height < 2 || width < 2 {
                break;
            }
            features = self.pool.forward(features);
        }

        levels
    }

    fn content(&self, crop: Tensor<B, 4>) -> Vec<Tensor<B, 4>> {
        vec![crop]
    }
}
