//! Style Crop Dataset Builder
//!
//! Loads an input/target raw buffer pair, builds a `StyleCropDataset` with the
//! pixel-space Gram extractor, and drives it through a Burn `DataLoader`. Useful
//! for checking that a rendered/painted pair lines up before training on it.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin crop_dataset -- \
//!     --input images/rendered/spheres1.f32.480.270.data \
//!     --target images/painted/spheres1.f32.960.540.data \
//!     --num-crops 32 --crop-size 64
//!
//! # Start from a JSON configuration
//! cargo run --bin crop_dataset -- --config crops.json
//! ```

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use burn::data::dataloader::DataLoaderBuilder;
use burn::data::dataset::Dataset;
use clap::Parser;
use stylecrop_burn::{hwc_to_chw, load_raw, CropBatcher, StyleCropDataset};
use stylecrop_demos::{
    create_device, get_backend_name, init_tracing, CropDatasetDemoConfig, SelectedBackend,
    SelectedDevice, TensorStats,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Low-resolution raw buffer
    #[arg(long)]
    input: Option<PathBuf>,

    /// Raw buffer at twice the input resolution
    #[arg(long)]
    target: Option<PathBuf>,

    /// Number of crops to draw
    #[arg(long)]
    num_crops: Option<usize>,

    /// Input-resolution crop side length
    #[arg(long)]
    crop_size: Option<usize>,

    /// Seed for crop positions
    #[arg(long)]
    seed: Option<u64>,

    /// Flip both buffers vertically when loading
    #[arg(long)]
    flip_vertical: bool,

    /// Number of Gram matrix pyramid levels
    #[arg(long)]
    scales: Option<usize>,

    /// Batch size for iteration
    #[arg(long)]
    batch_size: Option<usize>,

    /// Number of batches to inspect
    #[arg(long, default_value = "3")]
    max_batches: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;
    let device = create_device();
    tracing::info!(backend = get_backend_name(), "using backend");

    let dataset = build_dataset(&config, &device)?;
    inspect_samples(&dataset);
    iterate_batches(dataset, &config, args.max_batches);

    tracing::info!("dataset check completed");
    Ok(())
}

/// Loads the configuration file, if any, and applies command line overrides.
fn resolve_config(args: &Args) -> Result<CropDatasetDemoConfig> {
    let mut config = match &args.config {
        Some(path) => CropDatasetDemoConfig::load(path)?,
        None => CropDatasetDemoConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input_path = input.clone();
    }
    if let Some(target) = &args.target {
        config.target_path = target.clone();
    }
    if let Some(num_crops) = args.num_crops {
        config.dataset.num_crops = num_crops;
    }
    if let Some(crop_size) = args.crop_size {
        config.dataset.crop_size = crop_size;
    }
    if let Some(seed) = args.seed {
        config.dataset.seed = seed;
    }
    if args.flip_vertical {
        config.dataset.flip_vertical = true;
    }
    if let Some(scales) = args.scales {
        config.extractor.scales = scales;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }

    if config.batch_size == 0 {
        anyhow::bail!("Batch size must be positive");
    }
    for path in [&config.input_path, &config.target_path] {
        if !path.exists() {
            anyhow::bail!("Raw buffer does not exist: {}", path.display());
        }
    }

    Ok(config)
}

fn build_dataset(
    config: &CropDatasetDemoConfig,
    device: &SelectedDevice,
) -> Result<StyleCropDataset<SelectedBackend>> {
    let flip = config.dataset.flip_vertical;
    let input = load_raw::<SelectedBackend, _>(&config.input_path, flip, device)
        .with_context(|| format!("Failed to load input {}", config.input_path.display()))?;
    let target = load_raw::<SelectedBackend, _>(&config.target_path, flip, device)
        .with_context(|| format!("Failed to load target {}", config.target_path.display()))?;

    let extractor = config.extractor.init();
    let dataset = StyleCropDataset::new(
        hwc_to_chw(input),
        hwc_to_chw(target),
        &extractor,
        &config.dataset,
    )
    .context("Failed to build crop dataset")?;

    tracing::info!(
        samples = dataset.len(),
        crop_size = dataset.crop_size(),
        "dataset created"
    );
    Ok(dataset)
}

fn inspect_samples(dataset: &StyleCropDataset<SelectedBackend>) {
    for (index, sample) in dataset.samples().iter().enumerate() {
        let input_stats = TensorStats::of(sample.input.clone());
        let target_stats = TensorStats::of(sample.target.clone());

        tracing::debug!(
            index,
            row = sample.offset.row,
            col = sample.offset.col,
            input_shape = ?sample.input.dims(),
            target_shape = ?sample.target.dims(),
            style_levels = sample.target_style.len(),
            content_levels = sample.target_content.len(),
            input_mean = input_stats.mean,
            target_mean = target_stats.mean,
            "sample"
        );

        if target_stats.min < 0.0 || target_stats.max > 1.0 {
            tracing::warn!(
                index,
                min = target_stats.min,
                max = target_stats.max,
                "target crop values outside [0, 1]"
            );
        }
    }
}

fn iterate_batches(
    dataset: StyleCropDataset<SelectedBackend>,
    config: &CropDatasetDemoConfig,
    max_batches: usize,
) {
    let dataloader = DataLoaderBuilder::new(CropBatcher::<SelectedBackend>::new())
        .batch_size(config.batch_size)
        .shuffle(config.dataset.seed)
        .num_workers(config.num_workers)
        .build(dataset);

    let mut batch_count = 0;
    for batch in dataloader.iter().take(max_batches) {
        batch_count += 1;
        tracing::info!(
            batch = batch_count,
            inputs = ?batch.inputs.dims(),
            targets = ?batch.targets.dims(),
            style_levels = ?batch.target_styles.iter().map(|s| s.dims()).collect::<Vec<_>>(),
            "batch"
        );
    }

    tracing::info!(batches = batch_count, "batch iteration completed");
}
