use std::path::PathBuf;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// An item has no usable intrinsic height, so its aspect ratio is undefined.
    #[error("invalid geometry for item {index} ({}): {width}x{height}", path.display())]
    InvalidGeometry {
        index: usize,
        path: PathBuf,
        width: u32,
        height: u32,
    },
}
