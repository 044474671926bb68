//! Trigger-driven gallery host.
//!
//! `GalleryApp` owns the current item list and re-runs the layout for every
//! trigger it receives. Triggers are handled one at a time on the calling
//! thread; nothing from a previous pass is reused except the scanned items.

use std::path::{Path, PathBuf};

use anyhow::Result;
use flume::Receiver;
use tracing::{debug, error, info, warn};

use crate::layout::JustifiedLayout;
use crate::models::{MediaItem, RowModel};
use crate::output::{LayoutSink, LayoutSummary};
use crate::scanner::{FileScanner, ScanResult};

/// Events that cause a relayout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Content (re)loaded: rescan the directory, then lay out at `width`.
    Load { width: f64 },
    /// Container resized: lay out the current items at `width`.
    Resize { width: f64 },
    /// Stop processing triggers.
    Shutdown,
}

/// Counters for a `run` loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub triggers: usize,
    pub passes: usize,
    pub failures: usize,
}

pub struct GalleryApp {
    root: PathBuf,
    scanner: FileScanner,
    layout: JustifiedLayout,
    /// Vertical gap between rows, used only for the reported total height.
    row_gap: f64,
    items: Vec<MediaItem>,
}

impl GalleryApp {
    pub fn new(root: impl Into<PathBuf>, scanner: FileScanner, layout: JustifiedLayout) -> Self {
        Self {
            root: root.into(),
            scanner,
            layout,
            row_gap: 0.0,
            items: Vec::new(),
        }
    }

    pub fn with_row_gap(mut self, row_gap: f64) -> Self {
        self.row_gap = row_gap;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Rescans the root directory, replacing the current items.
    pub fn load(&mut self) -> Result<ScanResult> {
        let (items, result) = self.scanner.scan(&self.root)?;
        self.items = items;
        Ok(result)
    }

    /// Lays out the current items and pushes the rows to `sink`.
    ///
    /// Layout errors are returned without touching the sink, so a failed pass
    /// leaves whatever the sink showed before.
    pub fn relayout(&self, width: f64, sink: &mut dyn LayoutSink) -> Result<LayoutSummary> {
        let rows = self.layout.layout(&self.items, width)?;
        self.emit(width, &rows, sink)
    }

    fn emit(
        &self,
        width: f64,
        rows: &[RowModel],
        sink: &mut dyn LayoutSink,
    ) -> Result<LayoutSummary> {
        sink.begin(width)?;
        for row in rows {
            sink.row(row)?;
        }
        let summary = LayoutSummary {
            container_width: width,
            row_count: rows.len(),
            item_count: self.items.len(),
            total_height: self.layout.total_height(rows, self.row_gap),
        };
        sink.finish(&summary)?;

        debug!(
            width,
            rows = summary.row_count,
            items = summary.item_count,
            "layout pass complete"
        );
        Ok(summary)
    }

    /// Handles a single trigger. Returns `false` once the loop should stop.
    pub fn handle(
        &mut self,
        trigger: Trigger,
        sink: &mut dyn LayoutSink,
        stats: &mut RunStats,
    ) -> Result<bool> {
        stats.triggers += 1;
        let width = match trigger {
            Trigger::Shutdown => return Ok(false),
            Trigger::Load { width } => {
                match self.load() {
                    Ok(result) => info!("Loaded {} items from {:?}", result.returned, self.root),
                    Err(e) => {
                        // Keep the previous items so resizes still work.
                        error!("Load of {:?} failed: {:#}", self.root, e);
                        stats.failures += 1;
                        return Ok(true);
                    }
                }
                width
            }
            Trigger::Resize { width } => width,
        };

        if self.items.is_empty() {
            warn!("No items to lay out at width {}", width);
        }

        match self.layout.layout(&self.items, width) {
            Ok(rows) => {
                self.emit(width, &rows, sink)?;
                stats.passes += 1;
            }
            Err(e) => {
                error!("Layout at width {} failed: {}", width, e);
                stats.failures += 1;
            }
        }
        Ok(true)
    }

    /// Processes triggers until `Shutdown` or until every sender is dropped.
    ///
    /// Layout and load failures are logged and counted; sink errors end the
    /// loop and are returned.
    pub fn run(
        &mut self,
        triggers: &Receiver<Trigger>,
        sink: &mut dyn LayoutSink,
    ) -> Result<RunStats> {
        let mut stats = RunStats::default();
        while let Ok(trigger) = triggers.recv() {
            debug!(?trigger, "received trigger");
            if !self.handle(trigger, sink, &mut stats)? {
                break;
            }
        }
        info!(
            "Stopped after {} triggers ({} passes, {} failures)",
            stats.triggers, stats.passes, stats.failures
        );
        Ok(stats)
    }
}
