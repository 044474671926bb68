use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
}

impl MediaType {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "webp" | "gif" | "bmp" | "tiff" | "tif" => Some(Self::Image),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub path: PathBuf,
    pub media_type: MediaType,
    pub mtime: i64,
    pub size: i64,
    /// Intrinsic (natural) width in pixels.
    pub width: u32,
    /// Intrinsic (natural) height in pixels.
    pub height: u32,
}

impl MediaItem {
    /// Create a new MediaItem with just the essential display fields
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            media_type: MediaType::Image,
            mtime: 0,
            size: 0,
            width,
            height,
        }
    }

    /// Width over height of the intrinsic dimensions.
    ///
    /// `None` when the height is zero, since the ratio is undefined.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }

    /// True when the dimension probe failed for this file.
    pub fn is_broken(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_detection() {
        assert_eq!(MediaType::from_extension("JPG"), Some(MediaType::Image));
        assert_eq!(MediaType::from_extension("webp"), Some(MediaType::Image));
        assert_eq!(MediaType::from_extension("txt"), None);
        assert_eq!(MediaType::from_extension("mp4"), None);
    }

    #[test]
    fn test_aspect_ratio() {
        let item = MediaItem::new("a.jpg", 1920, 1080);
        let ar = item.aspect_ratio().unwrap();
        assert!((ar - 16.0 / 9.0).abs() < 1e-12);
        assert!(!item.is_broken());
    }

    #[test]
    fn test_zero_height_has_no_ratio() {
        let item = MediaItem::new("broken.jpg", 100, 0);
        assert!(item.aspect_ratio().is_none());
        assert!(item.is_broken());
    }
}
