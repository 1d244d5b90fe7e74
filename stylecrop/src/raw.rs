//! Raw float image buffers.
//!
//! The renderer dumps framebuffers as headerless little-endian `f32` RGBA data and
//! encodes everything needed to read them back in the filename:
//! `<stem>.<format>.<width>.<height>.<extension>`, e.g. `spheres1.f32.960.540.data`.
//! Rows are stored top to bottom, pixels left to right, four floats per pixel.

use std::{
    fs,
    path::{Path, PathBuf},
};

use burn::tensor::{backend::Backend, Tensor, TensorData};

use crate::error::{StyleCropError, StyleCropResult};

/// The only format tag [`load_raw`] decodes.
pub const RAW_FORMAT_F32: &str = "f32";
/// Channels per pixel (RGBA).
pub const RAW_CHANNELS: usize = 4;
/// Extension written by [`save_raw`].
pub const RAW_EXTENSION: &str = "data";

const BYTES_PER_VALUE: usize = std::mem::size_of::<f32>();

/// Metadata parsed from a raw buffer filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileName {
    /// Everything before the four metadata fields.
    pub stem: String,
    /// Element format tag, `f32` for loadable files.
    pub format: String,
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Trailing file extension.
    pub extension: String,
}

impl RawFileName {
    /// Metadata for an `f32` buffer of the given size.
    pub fn new(stem: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            stem: stem.into(),
            format: RAW_FORMAT_F32.to_owned(),
            width,
            height,
            extension: RAW_EXTENSION.to_owned(),
        }
    }

    /// Parses the last four dot-separated components of `path`'s file name.
    ///
    /// # Errors
    ///
    /// Returns [`StyleCropError::InvalidFileName`] if the name has fewer than four
    /// components, the width/height fields are not integers, or the buffer they
    /// describe has no addressable byte length.
    pub fn parse<P: AsRef<Path>>(path: P) -> StyleCropResult<Self> {
        let path = path.as_ref();
        let invalid = |reason: String| StyleCropError::InvalidFileName {
            path: path.to_path_buf(),
            reason,
        };

        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| invalid("file name is missing or not valid UTF-8".to_owned()))?;

        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() < 4 {
            return Err(invalid(format!(
                "expected <format>.<width>.<height>.<ext>, found {} component(s)",
                parts.len()
            )));
        }

        let (stem, fields) = parts.split_at(parts.len() - 4);
        let width = fields[1]
            .parse::<usize>()
            .map_err(|_| invalid(format!("width '{}' is not an integer", fields[1])))?;
        let height = fields[2]
            .parse::<usize>()
            .map_err(|_| invalid(format!("height '{}' is not an integer", fields[2])))?;
        if raw_byte_len(width, height).is_none() {
            return Err(invalid(format!("{width}x{height} buffer size overflows usize")));
        }

        Ok(Self {
            stem: stem.join("."),
            format: fields[0].to_owned(),
            width,
            height,
            extension: fields[3].to_owned(),
        })
    }

    /// Renders the metadata back into a file name.
    pub fn file_name(&self) -> String {
        let metadata = format!(
            "{}.{}.{}.{}",
            self.format, self.width, self.height, self.extension
        );
        if self.stem.is_empty() {
            metadata
        } else {
            format!("{}.{metadata}", self.stem)
        }
    }

    /// Number of bytes an `f32` buffer of this size occupies, `None` on overflow.
    pub const fn byte_len(&self) -> Option<usize> {
        raw_byte_len(self.width, self.height)
    }
}

const fn raw_byte_len(width: usize, height: usize) -> Option<usize> {
    match width.checked_mul(height) {
        Some(pixels) => pixels.checked_mul(RAW_CHANNELS * BYTES_PER_VALUE),
        None => None,
    }
}

/// Decodes a little-endian RGBA `f32` buffer into row-major values.
///
/// With `flip_vertical` the rows come out bottom to top.
///
/// # Errors
///
/// Returns [`StyleCropError::BufferSizeMismatch`] unless `bytes` holds exactly
/// `width * height * 16` bytes.
pub fn decode_raw(
    bytes: &[u8],
    width: usize,
    height: usize,
    flip_vertical: bool,
) -> StyleCropResult<Vec<f32>> {
    // Saturating on overflow: no slice is usize::MAX bytes long.
    let expected = raw_byte_len(width, height).unwrap_or(usize::MAX);
    if bytes.len() != expected {
        return Err(StyleCropError::BufferSizeMismatch {
            width,
            height,
            expected,
            actual: bytes.len(),
        });
    }

    let values: Vec<f32> = bytes
        .chunks_exact(BYTES_PER_VALUE)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(if flip_vertical {
        flip_rows(values, width * RAW_CHANNELS)
    } else {
        values
    })
}

fn flip_rows(values: Vec<f32>, row_len: usize) -> Vec<f32> {
    if row_len == 0 {
        return values;
    }
    values
        .chunks_exact(row_len)
        .rev()
        .flatten()
        .copied()
        .collect()
}

/// Loads a raw `f32` RGBA buffer as a `[height, width, 4]` tensor.
///
/// # Arguments
///
/// * `path` - File named `<stem>.f32.<width>.<height>.<ext>`
/// * `flip_vertical` - Reverse the row order
/// * `device` - Device to create the tensor on
///
/// # Errors
///
/// Returns a format error for a malformed name or a tag other than `f32`,
/// [`StyleCropError::Io`] if the file cannot be read, and
/// [`StyleCropError::BufferSizeMismatch`] if its length disagrees with the name.
pub fn load_raw<B: Backend, P: AsRef<Path>>(
    path: P,
    flip_vertical: bool,
    device: &B::Device,
) -> StyleCropResult<Tensor<B, 3>> {
    let path = path.as_ref();
    let name = RawFileName::parse(path)?;
    if name.format != RAW_FORMAT_F32 {
        return Err(StyleCropError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: name.format,
        });
    }

    let bytes = fs::read(path).map_err(|source| StyleCropError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let values = decode_raw(&bytes, name.width, name.height, flip_vertical)?;

    tracing::debug!(
        path = %path.display(),
        width = name.width,
        height = name.height,
        flip_vertical,
        "loaded raw image"
    );

    let data = TensorData::new(values, [name.height, name.width, RAW_CHANNELS])
        .convert::<B::FloatElem>();
    Ok(Tensor::from_data(data, device))
}

/// Writes a `[height, width, 4]` tensor as `<stem>.f32.<width>.<height>.data` in `dir`.
///
/// Returns the path written. A buffer saved with `flip_vertical` and loaded with
/// `flip_vertical` reads back unchanged.
///
/// # Errors
///
/// Returns [`StyleCropError::InvalidTensorShape`] if the last axis is not 4 wide,
/// [`StyleCropError::TensorConversion`] if the tensor cannot be read back as `f32`,
/// and [`StyleCropError::Io`] if writing fails.
pub fn save_raw<B: Backend, P: AsRef<Path>>(
    dir: P,
    stem: &str,
    image: Tensor<B, 3>,
    flip_vertical: bool,
) -> StyleCropResult<PathBuf> {
    let [height, width, channels] = image.dims();
    if channels != RAW_CHANNELS {
        return Err(StyleCropError::InvalidTensorShape {
            expected: format!("[H, W, {RAW_CHANNELS}]"),
            actual: format!("{:?}", [height, width, channels]),
        });
    }

    let values = image
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| StyleCropError::TensorConversion {
            reason: format!("{e:?}"),
        })?;
    let values = if flip_vertical {
        flip_rows(values, width * RAW_CHANNELS)
    } else {
        values
    };
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();

    let path = dir
        .as_ref()
        .join(RawFileName::new(stem, width, height).file_name());
    fs::write(&path, bytes).map_err(|source| StyleCropError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(path = %path.display(), width, height, "saved raw image");
    Ok(path)
}

/// `[H, W, C]` to `[C, H, W]`.
pub fn hwc_to_chw<B: Backend>(image: Tensor<B, 3>) -> Tensor<B, 3> {
    image.permute([2, 0, 1])
}

/// `[C, H, W]` to `[H, W, C]`.
pub fn chw_to_hwc<B: Backend>(image: Tensor<B, 3>) -> Tensor<B, 3> {
    image.permute([1, 2, 0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_relative_eq;
    use burn::backend::ndarray::NdArray;
    use rstest::rstest;

    type TestBackend = NdArray<f32>;

    /// Pixel (y, x) channel c holds `y * 100 + x * 10 + c`.
    fn pattern(width: usize, height: usize) -> Vec<f32> {
        let mut values = Vec::with_capacity(width * height * RAW_CHANNELS);
        for y in 0..height {
            for x in 0..width {
                for c in 0..RAW_CHANNELS {
                    values.push((y * 100 + x * 10 + c) as f32);
                }
            }
        }
        values
    }

    fn encode(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn write_raw(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn load_values(path: &Path, flip_vertical: bool) -> (Vec<f32>, [usize; 3]) {
        let tensor = load_raw::<TestBackend, _>(path, flip_vertical, &Default::default()).unwrap();
        let dims = tensor.dims();
        (tensor.into_data().to_vec::<f32>().unwrap(), dims)
    }

    #[rstest]
    #[case("images/painted/spheres1.f32.960.540.data", "spheres1", "f32", 960, 540, "data")]
    #[case("a.b.f32.3.2.bin", "a.b", "f32", 3, 2, "bin")]
    #[case("u8.4.4.data", "", "u8", 4, 4, "data")]
    fn parses_file_names(
        #[case] path: &str,
        #[case] stem: &str,
        #[case] format: &str,
        #[case] width: usize,
        #[case] height: usize,
        #[case] extension: &str,
    ) {
        let name = RawFileName::parse(path).unwrap();
        assert_eq!(name.stem, stem);
        assert_eq!(name.format, format);
        assert_eq!(name.width, width);
        assert_eq!(name.height, height);
        assert_eq!(name.extension, extension);
        assert_eq!(
            Some(name.file_name().as_str()),
            Path::new(path).file_name().and_then(|n| n.to_str())
        );
    }

    #[rstest]
    #[case("spheres1.data")]
    #[case("spheres1.f32.960.data")]
    #[case("spheres1.f32.wide.540.data")]
    #[case("spheres1.f32.960.-1.data")]
    #[case("x.f32.4611686018427387904.4.data")]
    #[case("x.f32.18446744073709551615.2.data")]
    fn rejects_malformed_file_names(#[case] path: &str) {
        let err = RawFileName::parse(path).unwrap_err();
        assert!(matches!(err, StyleCropError::InvalidFileName { .. }));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn loads_with_height_width_channel_shape() {
        let dir = tempfile::tempdir().unwrap();
        let values = pattern(3, 2);
        let path = write_raw(dir.path(), "img.f32.3.2.data", &encode(&values));

        let (loaded, dims) = load_values(&path, false);
        assert_eq!(dims, [2, 3, 4]);
        assert_eq!(loaded, values);
    }

    #[test]
    fn flip_vertical_reverses_rows() {
        let dir = tempfile::tempdir().unwrap();
        let (width, height) = (4, 3);
        let values = pattern(width, height);
        let path = write_raw(dir.path(), "img.f32.4.3.data", &encode(&values));

        let (flipped, dims) = load_values(&path, true);
        assert_eq!(dims, [height, width, RAW_CHANNELS]);

        let row_len = width * RAW_CHANNELS;
        for y in 0..height {
            let expected = &values[(height - 1 - y) * row_len..(height - y) * row_len];
            assert_eq!(&flipped[y * row_len..(y + 1) * row_len], expected);
        }
        assert_relative_eq!(flipped[0], 200.0);
    }

    #[test]
    fn flipping_twice_is_identity() {
        let values = pattern(5, 4);
        let once = decode_raw(&encode(&values), 5, 4, true).unwrap();
        let twice = decode_raw(&encode(&once), 5, 4, true).unwrap();
        assert_eq!(twice, values);
    }

    #[test]
    fn rejects_non_f32_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raw(dir.path(), "img.u8.2.2.data", &[0u8; 16]);

        let err = load_raw::<TestBackend, _>(&path, false, &Default::default()).unwrap_err();
        match &err {
            StyleCropError::UnsupportedFormat { format, .. } => assert_eq!(format, "u8"),
            other => panic!("Expected UnsupportedFormat error, got {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[rstest]
    #[case(0)]
    #[case(63)]
    #[case(65)]
    #[case(128)]
    fn rejects_wrong_byte_count(#[case] len: usize) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raw(dir.path(), "img.f32.2.2.data", &vec![0u8; len]);

        let err = load_raw::<TestBackend, _>(&path, false, &Default::default()).unwrap_err();
        match err {
            StyleCropError::BufferSizeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 64);
                assert_eq!(actual, len);
            }
            other => panic!("Expected BufferSizeMismatch error, got {other:?}"),
        }
    }

    #[rstest]
    #[case(0)]
    #[case(16)]
    fn oversized_name_fails_without_reading(#[case] len: usize) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raw(dir.path(), "x.f32.4611686018427387904.4.data", &vec![0u8; len]);

        let err = load_raw::<TestBackend, _>(&path, false, &Default::default()).unwrap_err();
        assert!(matches!(err, StyleCropError::InvalidFileName { .. }));
    }

    #[test]
    fn decode_rejects_overflowing_dimensions() {
        let err = decode_raw(&[], 1 << 62, 4, false).unwrap_err();
        match err {
            StyleCropError::BufferSizeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, usize::MAX);
                assert_eq!(actual, 0);
            }
            other => panic!("Expected BufferSizeMismatch error, got {other:?}"),
        }

        let err = decode_raw(&[0u8; 16], usize::MAX, 2, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn byte_len_reports_overflow() {
        assert_eq!(RawFileName::new("img", 3, 2).byte_len(), Some(96));
        assert_eq!(RawFileName::new("img", usize::MAX, 2).byte_len(), None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.f32.2.2.data");

        let err = load_raw::<TestBackend, _>(&path, false, &Default::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn save_then_load_restores_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let values = pattern(3, 5);
        let image = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(values.clone(), [5, 3, RAW_CHANNELS]),
            &Default::default(),
        );

        let path = save_raw(dir.path(), "render", image, true).unwrap();
        assert_eq!(path.file_name().unwrap(), "render.f32.3.5.data");

        let (loaded, _) = load_values(&path, true);
        assert_eq!(loaded, values);
    }

    #[test]
    fn save_rejects_non_rgba_tensor() {
        let dir = tempfile::tempdir().unwrap();
        let image = Tensor::<TestBackend, 3>::zeros([2, 2, 3], &Default::default());

        let err = save_raw(dir.path(), "rgb", image, false).unwrap_err();
        assert!(matches!(err, StyleCropError::InvalidTensorShape { .. }));
    }

    #[test]
    fn layout_permutations() {
        let image = Tensor::<TestBackend, 3>::zeros([6, 8, 4], &Default::default());
        let chw = hwc_to_chw(image);
        assert_eq!(chw.dims(), [4, 6, 8]);
        assert_eq!(chw_to_hwc(chw).dims(), [6, 8, 4]);
    }
}
