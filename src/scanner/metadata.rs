//! Dimension probing for image files.
//!
//! Only the image header is read; pixel data is never decoded.

use std::path::Path;

use image::ImageReader;
use tracing::{trace, warn};

use crate::models::MediaType;

/// Error state marker for broken media files.
pub const ERROR_DIMENSION: u32 = 0;

/// Reads intrinsic dimensions from media files.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extracts the natural width and height of an image file.
    ///
    /// Returns `(0, 0)` for broken, unreadable or unsupported files instead of
    /// erroring, so the caller decides whether to drop or surface them.
    pub fn extract_dimensions(path: &Path) -> (u32, u32) {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match MediaType::from_extension(&ext) {
            Some(MediaType::Image) => Self::extract_image_dimensions(path),
            None => {
                warn!("Unknown media type for extension: {}", ext);
                (ERROR_DIMENSION, ERROR_DIMENSION)
            }
        }
    }

    fn extract_image_dimensions(path: &Path) -> (u32, u32) {
        trace!("Extracting image dimensions from {:?}", path);

        let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
            Ok(reader) => reader,
            Err(e) => {
                warn!("Failed to open image {:?}: {}", path, e);
                return (ERROR_DIMENSION, ERROR_DIMENSION);
            }
        };

        match reader.into_dimensions() {
            Ok((width, height)) => {
                trace!("Got dimensions {}x{} for {:?}", width, height, path);
                (width, height)
            }
            Err(e) => {
                warn!("Failed to read image dimensions for {:?}: {}", path, e);
                (ERROR_DIMENSION, ERROR_DIMENSION)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    /// Writes a blank PNG of the given size.
    pub(crate) fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn test_error_dimension_constant() {
        assert_eq!(ERROR_DIMENSION, 0);
    }

    #[test]
    fn test_png_header_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_png(&path, 64, 36);

        assert_eq!(MetadataExtractor::extract_dimensions(&path), (64, 36));
    }

    #[test]
    fn test_unknown_extension() {
        let path = Path::new("/fake/file.xyz");
        assert_eq!(
            MetadataExtractor::extract_dimensions(path),
            (ERROR_DIMENSION, ERROR_DIMENSION)
        );
    }

    #[test]
    fn test_nonexistent_image() {
        let path = Path::new("/nonexistent/image.jpg");
        assert_eq!(
            MetadataExtractor::extract_dimensions(path),
            (ERROR_DIMENSION, ERROR_DIMENSION)
        );
    }

    #[test]
    fn test_corrupt_image_data() {
        let mut temp = NamedTempFile::with_suffix(".jpg").unwrap();
        temp.write_all(b"not a real jpeg file").unwrap();

        assert_eq!(
            MetadataExtractor::extract_dimensions(temp.path()),
            (ERROR_DIMENSION, ERROR_DIMENSION)
        );
    }
}
