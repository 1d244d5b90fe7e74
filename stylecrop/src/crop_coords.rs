//! Crop offsets encoded in image filenames.
//!
//! Painted targets cut out of a larger canvas carry their offset as the last two
//! `_`-separated fields of the file stem. Two conventions exist:
//!
//! - `<name>_cropx_<x>_<y>`: pixel coordinates on the 2x canvas, always even, halved
//!   on read;
//! - `<name>_crop_<x>_<y>`: coordinates used as-is.

use std::path::Path;

use crate::error::{StyleCropError, StyleCropResult};

/// The offset convention a file stem follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropNaming {
    /// `cropx`: even coordinates stored at double resolution.
    Doubled,
    /// `crop`: coordinates stored directly.
    Direct,
    /// No crop marker; offset is the origin.
    Uncropped,
}

impl CropNaming {
    /// Picks the convention for `stem`. `cropx` also contains `crop`, so it wins
    /// whenever present anywhere in the stem.
    pub fn detect(stem: &str) -> Self {
        if stem.contains("cropx") {
            Self::Doubled
        } else if stem.contains("crop") {
            Self::Direct
        } else {
            Self::Uncropped
        }
    }
}

/// Reads the `(x, y)` crop offset from a filename.
///
/// # Errors
///
/// Returns [`StyleCropError::InvalidCropCoordinate`] if a trailing field is missing
/// or not an integer, and [`StyleCropError::OddCropCoordinates`] for odd `cropx`
/// coordinates.
///
/// # Examples
///
/// ```
/// use stylecrop_burn::parse_crop_xy;
///
/// assert_eq!(parse_crop_xy("foo_cropx_250_20.png").unwrap(), (125, 10));
/// assert_eq!(parse_crop_xy("foo_crop_250_20.png").unwrap(), (250, 20));
/// assert_eq!(parse_crop_xy("foo_plain.png").unwrap(), (0, 0));
/// ```
pub fn parse_crop_xy<P: AsRef<Path>>(path: P) -> StyleCropResult<(i64, i64)> {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();

    match CropNaming::detect(&stem) {
        CropNaming::Doubled => {
            let (x, y) = trailing_pair(path, &stem)?;
            if x % 2 != 0 || y % 2 != 0 {
                return Err(StyleCropError::OddCropCoordinates { x, y });
            }
            Ok((x / 2, y / 2))
        }
        CropNaming::Direct => trailing_pair(path, &stem),
        CropNaming::Uncropped => Ok((0, 0)),
    }
}

fn trailing_pair(path: &Path, stem: &str) -> StyleCropResult<(i64, i64)> {
    let mut fields = stem.rsplit('_');
    let y = fields.next();
    let x = fields.next();

    let parse = |field: Option<&str>| -> StyleCropResult<i64> {
        let field = field.unwrap_or_default();
        field
            .parse::<i64>()
            .map_err(|_| StyleCropError::InvalidCropCoordinate {
                path: path.to_path_buf(),
                field: field.to_owned(),
            })
    };

    Ok((parse(x)?, parse(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case("foo_cropx_250_20.ext", (125, 10))]
    #[case("foo_crop_250_20.ext", (250, 20))]
    #[case("foo_plain.ext", (0, 0))]
    #[case("images/painted/spheres1_mucha1_crop_250_20.png", (250, 20))]
    #[case("images/painted/spheres1_mucha1_cropx_0_960.png", (0, 480))]
    #[case("dir_crop_9_9/plain.png", (0, 0))]
    fn parses_offsets(#[case] path: &str, #[case] expected: (i64, i64)) {
        assert_eq!(parse_crop_xy(path).unwrap(), expected);
    }

    #[rstest]
    #[case("foo_cropx_251_20.ext")]
    #[case("foo_cropx_250_21.ext")]
    fn rejects_odd_cropx_coordinates(#[case] path: &str) {
        let err = parse_crop_xy(path).unwrap_err();
        assert!(matches!(err, StyleCropError::OddCropCoordinates { .. }));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("cropx"));
    }

    #[test]
    fn cropx_anywhere_in_stem_selects_doubled_convention() {
        // The marker does not have to be a trailing token.
        assert_eq!(parse_crop_xy("mycropxfile_10_4.png").unwrap(), (5, 2));
        assert_eq!(CropNaming::detect("a_cropx_b"), CropNaming::Doubled);
        assert_eq!(CropNaming::detect("cropped_1_2"), CropNaming::Direct);
        assert_eq!(CropNaming::detect("plain"), CropNaming::Uncropped);
    }

    #[rstest]
    #[case("foo_crop_a_20.png")]
    #[case("foo_crop_250_b.png")]
    #[case("crop.png")]
    fn rejects_unparseable_fields(#[case] path: &str) {
        let err = parse_crop_xy(path).unwrap_err();
        assert!(matches!(err, StyleCropError::InvalidCropCoordinate { .. }));
    }
}
