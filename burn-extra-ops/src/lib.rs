//! Additional operations for the Burn deep learning framework
//!
//! This crate provides the slicing and cropping helpers the style-crop pipeline
//! needs on top of the core Burn tensor API.

use burn::prelude::*;

mod crop;
mod slice;

// Convenient re-exports
pub use crop::{crop, pad_axis_with_zeros, take_leading};
pub use slice::{slice_tensor, Slice};

/// Additional operations for Burn tensors
pub trait TensorExtraOps<B: Backend, const D: usize> {
    /// Crop the `height x width` window at (`top`, `left`) from the last two axes.
    fn crop(self, top: usize, left: usize, height: usize, width: usize) -> Self;

    /// Keep the first `count` entries along `axis`.
    fn take_leading(self, axis: usize, count: usize) -> Self;
}

impl<B: Backend, const D: usize> TensorExtraOps<B, D> for Tensor<B, D> {
    fn crop(self, top: usize, left: usize, height: usize, width: usize) -> Self {
        crop::crop(self, top, left, height, width)
    }

    fn take_leading(self, axis: usize, count: usize) -> Self {
        crop::take_leading(self, axis, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{backend::ndarray::NdArray, tensor::Tensor};

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_tensor_extra_ops() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 3>::random(
            [4, 6, 8],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );

        let result = tensor.take_leading(0, 3).crop(1, 2, 4, 4);
        assert_eq!(result.dims(), [3, 4, 4]);
    }
}
