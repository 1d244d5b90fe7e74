//! # Tensor Slicing Helper
//!
//! Provides a `Slice` struct to facilitate tensor slicing with Python-like semantics,
//! including support for negative indices.

use burn::prelude::*;
use core::ops::Range;

/// A helper struct for defining a slice with optional start and end points.
///
/// This struct can be converted into a `Range<usize>` for use with Burn's tensor
/// slicing methods, correctly handling negative indices relative to a given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    start: Option<isize>,
    end: Option<isize>,
}

impl Slice {
    /// Creates a new `Slice`.
    pub const fn new(start: Option<isize>, end: Option<isize>) -> Self {
        Self { start, end }
    }

    /// A slice covering the whole dimension, the equivalent of `:`.
    pub const fn full() -> Self {
        Self::new(None, None)
    }

    /// A slice of `len` elements starting at `start`.
    pub const fn span(start: usize, len: usize) -> Self {
        Self::new(
            Some(to_signed_index(start)),
            Some(to_signed_index(start.saturating_add(len))),
        )
    }

    /// Converts the `Slice` into a `Range<usize>` for a given dimension length.
    ///
    /// Negative indices are interpreted as offsets from the end of the dimension.
    /// Out-of-range bounds are clamped, and an inverted range collapses to empty.
    pub fn to_range(&self, len: usize) -> Range<usize> {
        let len_isize = len as isize;

        let start = match self.start {
            Some(s) if s < 0 => (len_isize + s).max(0),
            Some(s) => s.min(len_isize),
            None => 0,
        } as usize;

        let end = match self.end {
            Some(e) if e < 0 => (len_isize + e).max(0),
            Some(e) => e.min(len_isize),
            None => len_isize,
        } as usize;

        start..end.max(start)
    }

    /// Calculates the length of the slice for a given dimension length.
    pub fn slice_length(&self, len: usize) -> usize {
        let range = self.to_range(len);
        range.end.saturating_sub(range.start)
    }
}

const fn to_signed_index(index: usize) -> isize {
    if index > isize::MAX as usize {
        isize::MAX
    } else {
        index as isize
    }
}

/// Slices a tensor with one `Slice` per leading dimension.
///
/// Dimensions without a corresponding entry in `slices` are kept whole.
///
/// # Panics
///
/// Panics if more slices than tensor dimensions are given.
pub fn slice_tensor<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
    slices: &[Slice],
) -> Tensor<B, D> {
    assert!(
        slices.len() <= D,
        "got {} slices for a tensor of rank {D}",
        slices.len()
    );

    let dims = tensor.dims();
    let ranges: [Range<usize>; D] = core::array::from_fn(|axis| {
        slices
            .get(axis)
            .map_or(0..dims[axis], |slice| slice.to_range(dims[axis]))
    });

    tensor.slice(ranges)
}
