//! StyleCrop Demos
//!
//! Command-line tools built on `stylecrop-burn`.
//!
//! ## Available Tools
//!
//! - `raw_info`: Inspect a raw `f32` framebuffer, optionally write a PNG preview,
//!   and decode crop offsets from a painted-target filename
//! - `crop_dataset`: Build a style crop dataset from an input/target pair and
//!   drive it through a Burn `DataLoader`
//!
//! ## Usage
//!
//! ```bash
//! # Inspect a raw buffer
//! cargo run --bin raw_info -- images/painted/spheres1.f32.960.540.data --preview spheres1.png
//!
//! # Build a dataset
//! cargo run --bin crop_dataset -- --input low.f32.480.270.data --target high.f32.960.540.data
//! ```

pub mod common;
pub mod config;

// Re-export commonly used items
pub use common::{
    create_device, get_backend_name, init_tracing, raw_to_rgba8, save_preview, SelectedBackend,
    SelectedDevice, TensorStats,
};
pub use config::CropDatasetDemoConfig;
