use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowItem {
    /// Position of the item in the input sequence.
    pub index: usize,
    pub media_path: PathBuf,
    pub aspect_ratio: f64,
    pub rendered_w: f64,
    pub rendered_h: f64,
    /// `rendered_w` minus the caption padding. May be negative.
    pub caption_w: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowModel {
    pub row_index: u32,
    pub start_index: usize,
    pub height_px: f64,
    /// Closed by overflow (scaled to fit) rather than by running out of items.
    pub wrapped: bool,
    pub items: Vec<RowItem>,
}

impl RowModel {
    pub fn new(row_index: u32, height_px: f64, wrapped: bool, items: Vec<RowItem>) -> Self {
        let start_index = items.first().map(|i| i.index).unwrap_or(0);
        Self {
            row_index,
            start_index,
            height_px,
            wrapped,
            items,
        }
    }

    /// Exclusive end index into the input sequence.
    pub fn end_index(&self) -> usize {
        self.start_index + self.items.len()
    }

    /// Sum of the rendered widths, gutters excluded.
    pub fn content_width(&self) -> f64 {
        self.items.iter().map(|i| i.rendered_w).sum()
    }
}
