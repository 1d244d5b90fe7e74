//! Spatial cropping and channel narrowing.
//!
//! All helpers treat the last two axes as `[.., H, W]`, matching the channels-first
//! layout Burn's vision modules expect.

use burn::prelude::*;

use crate::slice::{slice_tensor, Slice};

/// Extracts the `height x width` window at (`top`, `left`) from the last two axes.
///
/// Leading axes (channels, batch) are kept whole.
///
/// # Panics
///
/// Panics if `D < 2`, or if the window leaves the tensor.
pub fn crop<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
    top: usize,
    left: usize,
    height: usize,
    width: usize,
) -> Tensor<B, D> {
    assert!(D >= 2, "crop needs a spatial tensor, got rank {D}");

    let dims = tensor.dims();
    let (rows, cols) = (dims[D - 2], dims[D - 1]);
    let (row_slice, col_slice) = (Slice::span(top, height), Slice::span(left, width));
    assert!(
        row_slice.slice_length(rows) == height && col_slice.slice_length(cols) == width,
        "crop window {height}x{width} at ({top}, {left}) exceeds {rows}x{cols}"
    );

    let mut slices = [Slice::full(); D];
    slices[D - 2] = row_slice;
    slices[D - 1] = col_slice;

    slice_tensor(tensor, &slices)
}

/// Keeps the first `count` entries of `axis`, e.g. the RGB planes of an RGBA image.
///
/// Asking for more entries than exist returns the tensor unchanged.
pub fn take_leading<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
    axis: usize,
    count: usize,
) -> Tensor<B, D> {
    let mut slices = [Slice::full(); D];
    slices[axis] = Slice::new(None, Some(count as isize));

    slice_tensor(tensor, &slices)
}

/// Zero-pads `axis` up to `count` entries. Tensors already that wide pass through.
pub fn pad_axis_with_zeros<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
    axis: usize,
    count: usize,
) -> Tensor<B, D> {
    let mut dims = tensor.dims();
    if dims[axis] >= count {
        return tensor;
    }

    dims[axis] = count - dims[axis];
    let zeros = Tensor::<B, D>::zeros(dims, &tensor.device());

    Tensor::cat(vec![tensor, zeros], axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{backend::ndarray::NdArray, tensor::TensorData};

    type TestBackend = NdArray<f32>;

    fn ramp(shape: [usize; 3]) -> Tensor<TestBackend, 3> {
        let len = shape.iter().product::<usize>();
        let values: Vec<f32> = (0..len).map(|v| v as f32).collect();
        Tensor::from_data(TensorData::new(values, shape), &Default::default())
    }

    #[test]
    fn test_crop_shape_and_values() {
        let tensor = ramp([2, 4, 5]);

        let result = crop(tensor, 1, 2, 2, 3);
        assert_eq!(result.dims(), [2, 2, 3]);

        let data = result.into_data().to_vec::<f32>().unwrap();
        // channel 0 rows 1..3 cols 2..5, then channel 1 (offset by 20)
        assert_eq!(
            data,
            vec![7.0, 8.0, 9.0, 12.0, 13.0, 14.0, 27.0, 28.0, 29.0, 32.0, 33.0, 34.0]
        );
    }

    #[test]
    fn test_crop_batched_tensor() {
        let tensor = Tensor::<TestBackend, 4>::ones([3, 2, 8, 8], &Default::default());
        assert_eq!(crop(tensor, 4, 0, 4, 8).dims(), [3, 2, 4, 8]);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_crop_out_of_bounds_panics() {
        let _ = crop(ramp([1, 4, 4]), 2, 2, 3, 3);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_crop_huge_offset_panics() {
        let _ = crop(ramp([1, 4, 4]), usize::MAX, 0, 2, 2);
    }

    #[test]
    fn test_take_leading_channels() {
        let tensor = ramp([4, 2, 2]);

        let rgb = take_leading(tensor.clone(), 0, 3);
        assert_eq!(rgb.dims(), [3, 2, 2]);

        let all = take_leading(tensor, 0, 10);
        assert_eq!(all.dims(), [4, 2, 2]);
    }

    #[test]
    fn test_pad_axis_with_zeros() {
        let tensor = Tensor::<TestBackend, 4>::ones([1, 3, 2, 2], &Default::default());

        let padded = pad_axis_with_zeros(tensor, 1, 4);
        assert_eq!(padded.dims(), [1, 4, 2, 2]);

        let alpha = padded
            .slice([0..1, 3..4, 0..2, 0..2])
            .into_data()
            .to_vec::<f32>()
            .unwrap();
        assert!(alpha.iter().all(|&v| v == 0.0));
    }
}
