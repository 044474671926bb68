use std::ops::RangeInclusive;

use tracing::{debug, trace};

use super::error::{LayoutError, LayoutResult};
use crate::models::{MediaItem, RowItem, RowModel};

/// Configuration for the justified row layout.
///
/// Items are packed left-to-right at a default height. When a row overflows
/// the container, the whole row is scaled down so it spans the width exactly.
/// A final row that never overflows keeps the default height.
#[derive(Debug, Clone)]
pub struct JustifiedLayout {
    /// Height used to pack items before a row is scaled (default: 180)
    pub default_row_height: f64,
    /// Space reserved per gap, including the row edges (default: 20)
    pub gutter: f64,
    /// Subtracted from the rendered width to size the caption (default: 32)
    pub caption_padding: f64,
}

impl Default for JustifiedLayout {
    fn default() -> Self {
        Self {
            default_row_height: 180.0,
            gutter: 20.0,
            caption_padding: 32.0,
        }
    }
}

impl JustifiedLayout {
    /// Creates a JustifiedLayout with custom parameters.
    pub fn new(default_row_height: f64, gutter: f64, caption_padding: f64) -> Self {
        Self {
            default_row_height,
            gutter,
            caption_padding,
        }
    }

    /// Resolves every aspect ratio up front so a bad item fails the whole call
    /// before any row is produced.
    fn aspect_ratios(items: &[MediaItem]) -> LayoutResult<Vec<f64>> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.aspect_ratio()
                    .ok_or_else(|| LayoutError::InvalidGeometry {
                        index,
                        path: item.path.clone(),
                        width: item.width,
                        height: item.height,
                    })
            })
            .collect()
    }

    fn build_row(
        &self,
        row_index: u32,
        row_height: f64,
        wrapped: bool,
        items: &[MediaItem],
        ratios: &[f64],
        span: RangeInclusive<usize>,
    ) -> RowModel {
        let row_items = span
            .map(|c| {
                let rendered_w = row_height * ratios[c];
                RowItem {
                    index: c,
                    media_path: items[c].path.clone(),
                    aspect_ratio: ratios[c],
                    rendered_w,
                    rendered_h: row_height,
                    caption_w: rendered_w - self.caption_padding,
                }
            })
            .collect();
        RowModel::new(row_index, row_height, wrapped, row_items)
    }

    /// Computes the justified layout for a list of media items.
    ///
    /// # Algorithm
    /// 1. Accumulate each item's width at the default row height.
    /// 2. Count one more gutter per item; the count starts at one for the
    ///    leading edge, so a row of `n` items reserves `n + 1` gutters.
    /// 3. Once the accumulated width exceeds what is left after gutters, close
    ///    the row and scale its height by `available / accumulated`.
    /// 4. The last row closes at the default height unless it overflowed too.
    ///
    /// Returns no rows for an empty list or a container without usable width.
    ///
    /// # Errors
    /// `LayoutError::InvalidGeometry` if any item has a zero intrinsic height.
    pub fn layout(&self, items: &[MediaItem], total_width: f64) -> LayoutResult<Vec<RowModel>> {
        if items.is_empty() || !total_width.is_finite() || total_width <= 0.0 {
            return Ok(Vec::new());
        }

        let ratios = Self::aspect_ratios(items)?;
        let last = items.len() - 1;

        let mut rows = Vec::new();
        let mut row_index = 0u32;
        let mut images_w = 0.0f64;
        let mut row_start = 0usize;
        let mut spaces = 1u32;

        for (i, ar) in ratios.iter().enumerate() {
            images_w += self.default_row_height * ar;
            spaces += 1;
            let available_w = total_width - spaces as f64 * self.gutter;
            let wrap = images_w > available_w;

            if wrap || i == last {
                let row_height = if wrap {
                    available_w / images_w * self.default_row_height
                } else {
                    self.default_row_height
                };
                if row_height <= 0.0 {
                    debug!(
                        row_index,
                        row_height,
                        total_width,
                        "container too narrow for its gutters"
                    );
                }
                trace!(row_index, row_start, end = i, row_height, wrap, "closing row");

                rows.push(self.build_row(
                    row_index,
                    row_height,
                    wrap,
                    items,
                    &ratios,
                    row_start..=i,
                ));
                row_index += 1;
                images_w = 0.0;
                row_start = i + 1;
                spaces = 1;
            }
        }

        Ok(rows)
    }

    /// Computes row breaks (indices) without keeping per-item results.
    /// Returns one `RowBreak` per row, in order.
    pub fn compute_breaks(
        &self,
        items: &[MediaItem],
        total_width: f64,
    ) -> LayoutResult<Vec<RowBreak>> {
        let rows = self.layout(items, total_width)?;
        Ok(rows
            .iter()
            .map(|row| RowBreak {
                start_index: row.start_index,
                end_index: row.end_index(),
                row_height: row.height_px,
            })
            .collect())
    }

    /// Calculates the total height of all rows.
    /// Useful for scroll calculations.
    pub fn total_height(&self, rows: &[RowModel], row_gap: f64) -> f64 {
        if rows.is_empty() {
            return 0.0;
        }

        let heights_sum: f64 = rows.iter().map(|r| r.height_px).sum();
        let gaps_sum = (rows.len().saturating_sub(1)) as f64 * row_gap;
        heights_sum + gaps_sum
    }
}

/// Represents a row break.
/// Contains only the indices and height, not the actual items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBreak {
    /// Start index in the items array (inclusive)
    pub start_index: usize,
    /// End index in the items array (exclusive)
    pub end_index: usize,
    /// The computed height for this row
    pub row_height: f64,
}
