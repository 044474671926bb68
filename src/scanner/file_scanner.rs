//! File scanner for turning a directory into an ordered item list.
//!
//! This module provides the `FileScanner` struct which handles:
//! - Directory walking using walkdir (recursive or flat)
//! - Media type detection by file extension
//! - Cache-aware dimension probing (unchanged files are not re-read)
//! - Dropping or keeping files whose dimensions cannot be read

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use anyhow::{bail, Result};
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

use crate::models::{MediaItem, MediaType};
use crate::scanner::dimension_cache::{DimensionCache, DimensionKey, DEFAULT_CAPACITY};
use crate::scanner::metadata::MetadataExtractor;

/// Configuration for the file scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to scan directories recursively.
    pub recursive: bool,
    /// Maximum directory depth (0 = unlimited).
    pub max_depth: usize,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
    /// Drop files whose dimensions cannot be read instead of returning them as 0x0.
    pub skip_broken: bool,
    /// Capacity of the dimension cache.
    pub cache_capacity: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: 0, // unlimited
            follow_symlinks: false,
            skip_broken: true,
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Statistics of a completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Number of media files found on disk.
    pub total_files: usize,
    /// Number of files whose dimensions were probed.
    pub probed: usize,
    /// Number of files served from the dimension cache.
    pub cached: usize,
    /// Number of files with unreadable dimensions.
    pub broken: usize,
    /// Number of items returned (broken files excluded when skipped).
    pub returned: usize,
}

/// Information about a discovered media file.
#[derive(Debug, Clone)]
struct DiscoveredEntry {
    path: PathBuf,
    media_type: MediaType,
    mtime: i64,
    size: i64,
}

/// Scanner for image directories.
///
/// Holds its dimension cache across scans, so repeated loads of the same
/// directory only probe files that changed.
pub struct FileScanner {
    config: ScanConfig,
    cache: Arc<DimensionCache>,
}

impl FileScanner {
    /// Creates a new file scanner with default configuration.
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    /// Creates a new file scanner with custom configuration.
    pub fn with_config(config: ScanConfig) -> Self {
        let cache = Arc::new(DimensionCache::new(config.cache_capacity));
        Self { config, cache }
    }

    /// Creates a scanner sharing an existing dimension cache.
    pub fn with_cache(config: ScanConfig, cache: Arc<DimensionCache>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<DimensionCache> {
        &self.cache
    }

    /// Scans a directory and returns its media items in path order.
    pub fn scan(&self, dir: &Path) -> Result<(Vec<MediaItem>, ScanResult)> {
        if !dir.is_dir() {
            bail!("Not a directory: {}", dir.display());
        }

        info!("Starting scan of {:?}", dir);
        let discovered = Self::discover_files(dir, &self.config)?;
        debug!("Discovered {} media files", discovered.len());

        let mut items = Vec::with_capacity(discovered.len());
        let mut result = ScanResult {
            total_files: discovered.len(),
            ..Default::default()
        };

        for entry in discovered {
            let item = self.process_entry(&entry, &mut result);
            if item.is_broken() {
                result.broken += 1;
                if self.config.skip_broken {
                    warn!("Skipping {:?}: unreadable dimensions", item.path);
                    continue;
                }
            }
            items.push(item);
        }
        result.returned = items.len();

        info!(
            "Scan complete: {} total, {} probed, {} cached, {} broken",
            result.total_files, result.probed, result.cached, result.broken
        );

        Ok((items, result))
    }

    /// Discovers all media files in a directory.
    fn discover_files(dir: &Path, config: &ScanConfig) -> Result<Vec<DiscoveredEntry>> {
        let mut walker = WalkDir::new(dir).follow_links(config.follow_symlinks);

        if !config.recursive {
            walker = walker.max_depth(1);
        } else if config.max_depth > 0 {
            walker = walker.max_depth(config.max_depth);
        }

        let mut entries = Vec::new();

        for entry in walker.into_iter() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            // Skip directories
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

            let media_type = match MediaType::from_extension(ext) {
                Some(t) => t,
                None => continue, // Skip non-media files
            };

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!("Failed to read metadata for {:?}: {}", path, e);
                    continue;
                }
            };

            let mtime = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0);

            entries.push(DiscoveredEntry {
                path: path.to_path_buf(),
                media_type,
                mtime,
                size: metadata.len() as i64,
            });
        }

        // Sort by path for consistent ordering
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(entries)
    }

    /// Resolves dimensions for a discovered entry, using the cache when possible.
    fn process_entry(&self, entry: &DiscoveredEntry, result: &mut ScanResult) -> MediaItem {
        let key = DimensionKey::new(&entry.path, entry.mtime, entry.size);
        let ((width, height), from_cache) = self
            .cache
            .get_or_probe(key, || MetadataExtractor::extract_dimensions(&entry.path));

        if from_cache {
            trace!("Cache hit for {:?}", entry.path);
            result.cached += 1;
        } else {
            result.probed += 1;
        }

        MediaItem {
            path: entry.path.clone(),
            media_type: entry.media_type,
            mtime: entry.mtime,
            size: entry.size,
            width,
            height,
        }
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::metadata::tests::write_png;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_scan_config_default() {
        let config = ScanConfig::default();
        assert!(config.recursive);
        assert_eq!(config.max_depth, 0);
        assert!(!config.follow_symlinks);
        assert!(config.skip_broken);
        assert_eq!(config.cache_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let scanner = FileScanner::new();
        assert!(scanner.scan(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_discover_files_empty_dir() {
        let dir = tempdir().unwrap();
        let config = ScanConfig::default();
        let entries = FileScanner::discover_files(dir.path(), &config).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_discover_files_recursive() {
        let dir = tempdir().unwrap();
        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        write_png(&dir.path().join("root.png"), 4, 4);
        write_png(&subdir.join("nested.png"), 4, 4);
        File::create(dir.path().join("notes.txt")).unwrap();

        let config = ScanConfig {
            recursive: true,
            ..Default::default()
        };
        let entries = FileScanner::discover_files(dir.path(), &config).unwrap();
        assert_eq!(entries.len(), 2);

        let config = ScanConfig {
            recursive: false,
            ..Default::default()
        };
        let entries = FileScanner::discover_files(dir.path(), &config).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_scan_orders_by_path_with_dimensions() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("b.png"), 30, 10);
        write_png(&dir.path().join("a.png"), 20, 40);

        let scanner = FileScanner::new();
        let (items, result) = scanner.scan(dir.path()).unwrap();

        assert_eq!(items.len(), 2);
        assert!(items[0].path.ends_with("a.png"));
        assert_eq!((items[0].width, items[0].height), (20, 40));
        assert!(items[1].path.ends_with("b.png"));
        assert_eq!((items[1].width, items[1].height), (30, 10));
        assert_eq!(result.total_files, 2);
        assert_eq!(result.probed, 2);
        assert_eq!(result.returned, 2);
    }

    #[test]
    fn test_rescan_uses_cache() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("cached.png"), 8, 8);

        let scanner = FileScanner::new();
        let (_, first) = scanner.scan(dir.path()).unwrap();
        assert_eq!((first.probed, first.cached), (1, 0));

        let (items, second) = scanner.scan(dir.path()).unwrap();
        assert_eq!((second.probed, second.cached), (0, 1));
        assert_eq!((items[0].width, items[0].height), (8, 8));
    }

    #[test]
    fn test_broken_files_skipped_or_kept() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("good.png"), 8, 8);
        let mut bad = File::create(dir.path().join("bad.jpg")).unwrap();
        bad.write_all(b"garbage").unwrap();

        let (items, result) = FileScanner::new().scan(dir.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(result.broken, 1);

        let keep = ScanConfig {
            skip_broken: false,
            ..Default::default()
        };
        let (items, result) = FileScanner::with_config(keep).scan(dir.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(result.broken, 1);
        assert!(items[0].path.ends_with("bad.jpg"));
        assert!(items[0].is_broken());
    }
}
