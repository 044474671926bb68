pub mod dimension_cache;
pub mod file_scanner;
pub mod metadata;

pub use dimension_cache::DimensionCache;
pub use file_scanner::{FileScanner, ScanConfig, ScanResult};
