//! Dataset configuration.

use burn::prelude::*;

use crate::error::{StyleCropError, StyleCropResult};

/// Parameters for building a [`StyleCropDataset`](crate::StyleCropDataset).
#[derive(Config, Debug)]
pub struct CropDatasetConfig {
    /// Number of crops to draw.
    pub num_crops: usize,
    /// Side length of the input-resolution crop. Target crops are twice as large.
    pub crop_size: usize,
    /// Seed for the crop position generator.
    #[config(default = "42")]
    pub seed: u64,
    /// Flip raw buffers vertically when loading them.
    #[config(default = "false")]
    pub flip_vertical: bool,
}

impl CropDatasetConfig {
    /// Validate the configuration and return appropriate errors for invalid settings.
    ///
    /// # Errors
    ///
    /// Returns [`StyleCropError::InvalidConfiguration`] if `crop_size` is zero.
    pub fn validate(&self) -> StyleCropResult<()> {
        if self.crop_size == 0 {
            return Err(StyleCropError::InvalidConfiguration {
                reason: "crop_size must be positive".to_owned(),
            });
        }
        Ok(())
    }
}
