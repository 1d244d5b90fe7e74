//! Configuration for the demo binaries.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stylecrop_burn::{CropDatasetConfig, GramExtractorConfig};

/// Configuration for the `crop_dataset` tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropDatasetDemoConfig {
    /// Low-resolution raw buffer.
    pub input_path: PathBuf,
    /// Raw buffer at twice the input resolution.
    pub target_path: PathBuf,
    /// Crop count, size, seed and flip settings.
    pub dataset: CropDatasetConfig,
    /// Style descriptor extraction settings.
    pub extractor: GramExtractorConfig,
    /// Batch size used when iterating the dataset.
    pub batch_size: usize,
    /// Number of workers for data loading.
    pub num_workers: usize,
}

impl Default for CropDatasetDemoConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("images/rendered/spheres1.f32.480.270.data"),
            target_path: PathBuf::from("images/painted/spheres1.f32.960.540.data"),
            dataset: CropDatasetConfig::new(64, 128),
            extractor: GramExtractorConfig::new(),
            batch_size: 4,
            num_workers: 1,
        }
    }
}

impl CropDatasetDemoConfig {
    /// Reads a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
