//! Justified thumbnail rows.
//!
//! Packs images of varying aspect ratio into rows that each span the
//! container width, re-running the layout whenever content loads or the
//! container resizes.

pub mod app;
pub mod layout;
pub mod models;
pub mod output;
pub mod scanner;

pub use app::{GalleryApp, RunStats, Trigger};
pub use layout::{JustifiedLayout, LayoutError, RowBreak};
pub use models::{MediaItem, RowItem, RowModel};
pub use output::{CssSink, JsonSink, LayoutSink, LayoutSummary, TextSink};
pub use scanner::{FileScanner, ScanConfig};
