//! Error types for raw image loading and crop dataset construction.

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `StyleCrop-Burn` operations.
///
/// Every failure is reported at the point it is detected and propagated to the
/// caller unchanged; nothing in this crate retries or degrades.
#[derive(Error, Debug)]
pub enum StyleCropError {
    /// The filename's format tag is not one this crate can decode.
    #[error("Unsupported raw format '{format}' in {path} (expected 'f32')")]
    UnsupportedFormat {
        /// The offending file.
        path: PathBuf,
        /// The format tag found in the filename.
        format: String,
    },

    /// The filename does not follow `<stem>.<format>.<width>.<height>.<ext>`.
    #[error("Invalid raw file name {path}: {reason}")]
    InvalidFileName {
        /// The offending file.
        path: PathBuf,
        /// What was wrong with the name.
        reason: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error at {path}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The raw buffer does not hold exactly `width * height` RGBA float pixels.
    #[error("Raw buffer has {actual} bytes, expected {expected} for {width}x{height} RGBA f32")]
    BufferSizeMismatch {
        /// Width parsed from the filename.
        width: usize,
        /// Height parsed from the filename.
        height: usize,
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// The target image is not exactly twice the input resolution.
    #[error(
        "Target resolution {target_height}x{target_width} is not twice the input resolution {input_height}x{input_width}"
    )]
    ResolutionMismatch {
        /// Input image height.
        input_height: usize,
        /// Input image width.
        input_width: usize,
        /// Target image height.
        target_height: usize,
        /// Target image width.
        target_width: usize,
    },

    /// A tensor has an unexpected shape.
    #[error("Invalid tensor shape: expected {expected}, got {actual}")]
    InvalidTensorShape {
        /// The expected shape.
        expected: String,
        /// The actual shape.
        actual: String,
    },

    /// `cropx` coordinates must be even pixel positions.
    #[error("'cropx' style image crop coords must be divisible by two, got ({x}, {y})")]
    OddCropCoordinates {
        /// The x coordinate found in the filename.
        x: i64,
        /// The y coordinate found in the filename.
        y: i64,
    },

    /// A crop coordinate field in a filename could not be read as an integer.
    #[error("Invalid crop coordinate '{field}' in {path}")]
    InvalidCropCoordinate {
        /// The offending file.
        path: PathBuf,
        /// The field that failed to parse.
        field: String,
    },

    /// The crop does not fit inside the input image.
    #[error("Crop size {crop_size} does not fit inside a {height}x{width} input image")]
    CropOutOfRange {
        /// Requested crop side length.
        crop_size: usize,
        /// Input image height.
        height: usize,
        /// Input image width.
        width: usize,
    },

    /// A sample index past the end of the dataset.
    #[error("Sample index {index} out of bounds for dataset of size {len}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The dataset size.
        len: usize,
    },

    /// Tensor data could not be read back as `f32`.
    #[error("Failed to convert tensor data: {reason}")]
    TensorConversion {
        /// The conversion failure.
        reason: String,
    },

    /// Logically inconsistent configuration values.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Why the configuration was rejected.
        reason: String,
    },
}

/// Coarse category of a [`StyleCropError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected filename format metadata.
    Format,
    /// Buffer size, resolution ratio, or tensor shape mismatch.
    Shape,
    /// Filename content that violates a naming convention.
    Validation,
    /// Crop size larger than the image.
    Range,
    /// Out-of-bounds sample access.
    Index,
    /// Filesystem failure.
    Io,
    /// Bad configuration or tensor conversion.
    Other,
}

impl StyleCropError {
    /// Returns the category this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat { .. } | Self::InvalidFileName { .. } => ErrorKind::Format,
            Self::BufferSizeMismatch { .. }
            | Self::ResolutionMismatch { .. }
            | Self::InvalidTensorShape { .. } => ErrorKind::Shape,
            Self::OddCropCoordinates { .. } | Self::InvalidCropCoordinate { .. } => {
                ErrorKind::Validation
            }
            Self::CropOutOfRange { .. } => ErrorKind::Range,
            Self::IndexOutOfBounds { .. } => ErrorKind::Index,
            Self::Io { .. } => ErrorKind::Io,
            Self::TensorConversion { .. } | Self::InvalidConfiguration { .. } => ErrorKind::Other,
        }
    }
}

/// A specialized `Result` type for `StyleCrop-Burn` operations.
pub type StyleCropResult<T> = Result<T, StyleCropError>;
