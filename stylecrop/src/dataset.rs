//! Random crop dataset for style-transfer training.
//!
//! Given a low-resolution input image and a co-registered target at twice the
//! resolution, the dataset draws `num_crops` random square windows up front and
//! keeps, for each one, the input crop, the matching 2x target crop and the
//! style/content descriptors of that target crop. The collection is fixed after
//! construction, so every epoch sees the same samples in the same order.

use burn::data::{dataloader::batcher::Batcher, dataset::Dataset};
use burn::tensor::{backend::Backend, Tensor};
use burn_extra_ops::TensorExtraOps;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::CropDatasetConfig,
    descriptor::DescriptorExtractor,
    error::{StyleCropError, StyleCropResult},
};

/// Channels kept from the target image (RGB; alpha is dropped).
pub const TARGET_CHANNELS: usize = 3;

/// Top-left corner of a crop, in input-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropOffset {
    /// Row of the top edge.
    pub row: usize,
    /// Column of the left edge.
    pub col: usize,
}

/// A single training sample.
#[derive(Debug, Clone)]
pub struct CropSample<B: Backend> {
    /// Input crop with shape [C, S, S]
    pub input: Tensor<B, 3>,
    /// Target crop with shape [3, 2S, 2S]
    pub target: Tensor<B, 3>,
    /// Style descriptors of the target crop, one per feature level
    pub target_style: Vec<Tensor<B, 3>>,
    /// Content descriptors of the target crop, one per feature level
    pub target_content: Vec<Tensor<B, 4>>,
    /// Where the input crop was taken; the target crop sits at twice this offset
    pub offset: CropOffset,
}

/// A batch of [`CropSample`]s.
#[derive(Debug, Clone)]
pub struct CropBatch<B: Backend> {
    /// Batched input crops with shape [N, C, S, S]
    pub inputs: Tensor<B, 4>,
    /// Batched target crops with shape [N, 3, 2S, 2S]
    pub targets: Tensor<B, 4>,
    /// Per-level style descriptors concatenated along the batch axis
    pub target_styles: Vec<Tensor<B, 3>>,
    /// Per-level content descriptors concatenated along the batch axis
    pub target_contents: Vec<Tensor<B, 4>>,
}

/// Batcher stacking [`CropSample`]s into a [`CropBatch`].
///
/// Every sample in a batch must carry the same number of style and content
/// levels; `batch` panics otherwise.
#[derive(Clone, Default)]
pub struct CropBatcher<B: Backend> {
    _phantom: std::marker::PhantomData<B>,
}

impl<B: Backend> CropBatcher<B> {
    /// Create a new crop batcher.
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<B: Backend> Batcher<B, CropSample<B>, CropBatch<B>> for CropBatcher<B> {
    fn batch(&self, items: Vec<CropSample<B>>, device: &B::Device) -> CropBatch<B> {
        let batch_size = items.len();
        let style_levels = items.first().map_or(0, |item| item.target_style.len());
        let content_levels = items.first().map_or(0, |item| item.target_content.len());

        let mut inputs = Vec::with_capacity(batch_size);
        let mut targets = Vec::with_capacity(batch_size);
        let mut styles: Vec<Vec<Tensor<B, 3>>> = (0..style_levels)
            .map(|_| Vec::with_capacity(batch_size))
            .collect();
        let mut contents: Vec<Vec<Tensor<B, 4>>> = (0..content_levels)
            .map(|_| Vec::with_capacity(batch_size))
            .collect();

        for item in items {
            assert!(
                item.target_style.len() == style_levels
                    && item.target_content.len() == content_levels,
                "descriptor levels differ within a batch: {}/{} style, {}/{} content",
                item.target_style.len(),
                style_levels,
                item.target_content.len(),
                content_levels
            );
            inputs.push(item.input);
            targets.push(item.target);
            for (level, style) in styles.iter_mut().zip(item.target_style) {
                level.push(style);
            }
            for (level, content) in contents.iter_mut().zip(item.target_content) {
                level.push(content);
            }
        }

        CropBatch {
            inputs: Tensor::stack::<4>(inputs, 0).to_device(device),
            targets: Tensor::stack::<4>(targets, 0).to_device(device),
            target_styles: styles
                .into_iter()
                .map(|level| Tensor::cat(level, 0).to_device(device))
                .collect(),
            target_contents: contents
                .into_iter()
                .map(|level| Tensor::cat(level, 0).to_device(device))
                .collect(),
        }
    }
}

/// Fixed collection of random crop pairs and their loss targets.
#[derive(Debug, Clone)]
pub struct StyleCropDataset<B: Backend> {
    samples: Vec<CropSample<B>>,
    crop_size: usize,
}

impl<B: Backend> StyleCropDataset<B> {
    /// Builds the dataset with crop positions drawn from a generator seeded by
    /// `config.seed`.
    ///
    /// # Arguments
    ///
    /// * `input` - Low-resolution image with shape [C, H, W]
    /// * `target` - High-resolution image with shape [C', 2H, 2W], C' >= 3
    /// * `extractor` - Computes style/content descriptors of each target crop
    /// * `config` - Number and size of crops, and the seed
    ///
    /// # Errors
    ///
    /// See [`StyleCropDataset::from_rng`].
    pub fn new<E: DescriptorExtractor<B>>(
        input: Tensor<B, 3>,
        target: Tensor<B, 3>,
        extractor: &E,
        config: &CropDatasetConfig,
    ) -> StyleCropResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        Self::from_rng(
            input,
            target,
            extractor,
            config.num_crops,
            config.crop_size,
            &mut rng,
        )
    }

    /// Builds the dataset drawing crop positions from `rng`.
    ///
    /// Each draw picks a row in `0..=H - crop_size - 1` and a column in
    /// `0..=W - crop_size - 1`, crops `crop_size` pixels of `input` there and
    /// `2 * crop_size` pixels of the first three `target` channels at twice the
    /// offset, then asks `extractor` for the descriptors of the batched target crop.
    ///
    /// # Errors
    ///
    /// - [`StyleCropError::InvalidConfiguration`] if `crop_size` is zero
    /// - [`StyleCropError::ResolutionMismatch`] unless `target` is exactly 2H x 2W
    /// - [`StyleCropError::InvalidTensorShape`] if `target` has fewer than 3 channels
    /// - [`StyleCropError::CropOutOfRange`] if `crop_size >= H` or `crop_size >= W`
    pub fn from_rng<E: DescriptorExtractor<B>, R: Rng>(
        input: Tensor<B, 3>,
        target: Tensor<B, 3>,
        extractor: &E,
        num_crops: usize,
        crop_size: usize,
        rng: &mut R,
    ) -> StyleCropResult<Self> {
        if crop_size == 0 {
            return Err(StyleCropError::InvalidConfiguration {
                reason: "crop_size must be positive".to_owned(),
            });
        }

        let [_, height, width] = input.dims();
        let [target_channels, target_height, target_width] = target.dims();

        if target_height != height * 2 || target_width != width * 2 {
            return Err(StyleCropError::ResolutionMismatch {
                input_height: height,
                input_width: width,
                target_height,
                target_width,
            });
        }
        if target_channels < TARGET_CHANNELS {
            return Err(StyleCropError::InvalidTensorShape {
                expected: format!("[>={TARGET_CHANNELS}, {target_height}, {target_width}]"),
                actual: format!("{:?}", [target_channels, target_height, target_width]),
            });
        }
        if crop_size >= height || crop_size >= width {
            return Err(StyleCropError::CropOutOfRange {
                crop_size,
                height,
                width,
            });
        }

        let target = target.take_leading(0, TARGET_CHANNELS);
        let max_row = height - crop_size - 1;
        let max_col = width - crop_size - 1;

        let mut samples = Vec::with_capacity(num_crops);
        for index in 0..num_crops {
            let row = rng.random_range(0..=max_row);
            let col = rng.random_range(0..=max_col);

            let input_crop = input.clone().crop(row, col, crop_size, crop_size);
            let target_crop = target.clone().crop(row * 2, col * 2, crop_size * 2, crop_size * 2);

            let batched = target_crop.clone().unsqueeze::<4>();
            let target_style = extractor.style(batched.clone());
            let target_content = extractor.content(batched);

            tracing::debug!(index, row, col, "drew crop");

            samples.push(CropSample {
                input: input_crop,
                target: target_crop,
                target_style,
                target_content,
                offset: CropOffset { row, col },
            });
        }

        tracing::info!(
            num_crops,
            crop_size,
            height,
            width,
            "built style crop dataset"
        );

        Ok(Self { samples, crop_size })
    }

    /// Number of samples; equals the requested number of crops.
    pub fn size(&self) -> usize {
        self.samples.len()
    }

    /// Input-resolution crop side length.
    pub const fn crop_size(&self) -> usize {
        self.crop_size
    }

    /// Returns the sample at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StyleCropError::IndexOutOfBounds`] if `index >= self.size()`.
    pub fn sample(&self, index: usize) -> StyleCropResult<&CropSample<B>> {
        self.samples
            .get(index)
            .ok_or(StyleCropError::IndexOutOfBounds {
                index,
                len: self.samples.len(),
            })
    }

    /// All samples in draw order.
    pub fn samples(&self) -> &[CropSample<B>] {
        &self.samples
    }
}

impl<B: Backend> Dataset<CropSample<B>> for StyleCropDataset<B> {
    fn get(&self, index: usize) -> Option<CropSample<B>> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
