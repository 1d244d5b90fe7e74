//! # StyleCrop-Burn
//!
//! Data utilities for training style-transfer networks with Burn:
//!
//! - [`load_raw`] / [`save_raw`]: headerless `f32` RGBA framebuffers whose size is
//!   encoded in the filename (`<stem>.f32.<width>.<height>.data`);
//! - [`parse_crop_xy`]: crop offsets encoded in painted-target filenames;
//! - [`StyleCropDataset`]: a fixed set of random (input, 2x target) crop pairs with
//!   precomputed style/content descriptors, usable with Burn's `DataLoader`.

mod config;
mod crop_coords;
mod dataset;
mod descriptor;
mod error;
mod raw;


pub use config::CropDatasetConfig;
pub use crop_coords::{parse_crop_xy, CropNaming};
pub use dataset::{
    CropBatch, CropBatcher, CropOffset, CropSample, StyleCropDataset, TARGET_CHANNELS,
};
pub use descriptor::{
    expand_to_rgba, gram_matrix, DescriptorExtractor, DescriptorFns, GramExtractor,
    GramExtractorConfig,
};
pub use error::{ErrorKind, StyleCropError, StyleCropResult};
pub use raw::{
    chw_to_hwc, decode_raw, hwc_to_chw, load_raw, save_raw, RawFileName, RAW_CHANNELS,
    RAW_EXTENSION, RAW_FORMAT_F32,
};
