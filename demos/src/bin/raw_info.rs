//! Raw Buffer Inspection
//!
//! Loads a raw `f32` framebuffer, reports its shape and value range, and
//! optionally writes a PNG preview. Painted-target filenames passed with
//! `--crop-path` are decoded to their crop offsets.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin raw_info -- images/painted/spheres1.f32.960.540.data
//!
//! # Flip rows and save a preview
//! cargo run --bin raw_info -- spheres1.f32.960.540.data --flip-vertical --preview spheres1.png
//!
//! # Decode crop offsets only
//! cargo run --bin raw_info -- --crop-path images/painted/spheres1_mucha1_crop_250_20.png
//! ```

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use stylecrop_burn::{load_raw, parse_crop_xy, CropNaming, RawFileName};
use stylecrop_demos::{
    create_device, get_backend_name, init_tracing, save_preview, SelectedBackend, TensorStats,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw buffer named `<stem>.f32.<width>.<height>.<ext>`
    path: Option<PathBuf>,

    /// Reverse the row order when loading
    #[arg(long)]
    flip_vertical: bool,

    /// Write a PNG preview of the buffer
    #[arg(long, value_name = "PNG")]
    preview: Option<PathBuf>,

    /// Ignore the buffer's alpha channel in the preview
    #[arg(long)]
    opaque: bool,

    /// Filename(s) to decode crop offsets from
    #[arg(long, value_name = "PATH")]
    crop_path: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    if args.path.is_none() && args.crop_path.is_empty() {
        anyhow::bail!("Nothing to do: pass a raw buffer path and/or --crop-path");
    }

    if let Some(path) = &args.path {
        inspect_raw(path, args)?;
    }

    for path in &args.crop_path {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (x, y) = parse_crop_xy(path)
            .with_context(|| format!("Failed to decode crop offset of {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            naming = ?CropNaming::detect(&stem),
            x,
            y,
            "crop offset"
        );
    }

    Ok(())
}

fn inspect_raw(path: &Path, args: &Args) -> Result<()> {
    let name = RawFileName::parse(path).context("Failed to parse raw file name")?;
    tracing::info!(
        stem = %name.stem,
        format = %name.format,
        width = name.width,
        height = name.height,
        expected_bytes = ?name.byte_len(),
        "raw file name"
    );

    let device = create_device();
    tracing::info!(backend = get_backend_name(), "loading raw buffer");

    let image = load_raw::<SelectedBackend, _>(path, args.flip_vertical, &device)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let stats = TensorStats::of(image.clone());
    tracing::info!(
        shape = ?image.dims(),
        min = stats.min,
        max = stats.max,
        mean = stats.mean,
        "loaded"
    );

    if let Some(preview) = &args.preview {
        save_preview(preview, image, args.opaque)?;
        tracing::info!(path = %preview.display(), "saved preview");
    }

    Ok(())
}
