//! Sinks that apply a computed layout to its consumer.
//!
//! A sink receives one pass at a time: `begin`, every row in order, then
//! `finish`. Caption widths are clamped at zero here, when sizes are emitted;
//! the layout itself keeps the raw value.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{RowItem, RowModel};

/// Default selector for the thumbnail list, matching the gallery markup.
pub const DEFAULT_ITEM_SELECTOR: &str = "#Media li";

/// Totals for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub container_width: f64,
    pub row_count: usize,
    pub item_count: usize,
    pub total_height: f64,
}

/// Receives the results of each layout pass.
pub trait LayoutSink {
    fn begin(&mut self, container_width: f64) -> Result<()>;
    fn row(&mut self, row: &RowModel) -> Result<()>;
    fn finish(&mut self, summary: &LayoutSummary) -> Result<()>;
}

fn caption_px(item: &RowItem) -> f64 {
    item.caption_w.max(0.0)
}

/// Human-readable, tab-separated listing.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LayoutSink for TextSink<W> {
    fn begin(&mut self, container_width: f64) -> Result<()> {
        writeln!(self.out, "# width {}", container_width)?;
        Ok(())
    }

    fn row(&mut self, row: &RowModel) -> Result<()> {
        writeln!(
            self.out,
            "# row {} height {:.2}{}",
            row.row_index,
            row.height_px,
            if row.wrapped { "" } else { " (default)" }
        )?;
        for item in &row.items {
            writeln!(
                self.out,
                "{}\t{}\t{:.2}\t{:.2}\t{:.2}",
                item.index,
                item.media_path.display(),
                item.rendered_w,
                item.rendered_h,
                caption_px(item)
            )?;
        }
        Ok(())
    }

    fn finish(&mut self, summary: &LayoutSummary) -> Result<()> {
        writeln!(
            self.out,
            "# {} items in {} rows, {:.2}px tall",
            summary.item_count, summary.row_count, summary.total_height
        )?;
        self.out.flush().context("flush text output")
    }
}

/// Emits per-element style rules: the thumb keeps `width: auto` and is bounded
/// by the row height and rendered width, the caption gets the caption width.
pub struct CssSink<W: Write> {
    out: W,
    selector: String,
}

impl<W: Write> CssSink<W> {
    pub fn new(out: W) -> Self {
        Self::with_selector(out, DEFAULT_ITEM_SELECTOR)
    }

    pub fn with_selector(out: W, selector: impl Into<String>) -> Self {
        Self {
            out,
            selector: selector.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LayoutSink for CssSink<W> {
    fn begin(&mut self, container_width: f64) -> Result<()> {
        writeln!(self.out, "/* container width {}px */", container_width)?;
        Ok(())
    }

    fn row(&mut self, row: &RowModel) -> Result<()> {
        for item in &row.items {
            let nth = item.index + 1;
            writeln!(
                self.out,
                "{sel}:nth-child({nth}) .thumb {{ width: auto; height: {h}px; max-width: {w}px; max-height: {h}px; }}",
                sel = self.selector,
                h = item.rendered_h,
                w = item.rendered_w,
            )?;
            let caption = caption_px(item);
            writeln!(
                self.out,
                "{sel}:nth-child({nth}) .caption {{ width: {c}px; max-width: {c}px; }}",
                sel = self.selector,
                c = caption,
            )?;
        }
        Ok(())
    }

    fn finish(&mut self, _summary: &LayoutSummary) -> Result<()> {
        self.out.flush().context("flush css output")
    }
}

#[derive(Serialize)]
struct JsonPass<'a> {
    #[serde(flatten)]
    summary: &'a LayoutSummary,
    rows: &'a [RowModel],
}

/// One JSON document per pass, newline-delimited.
pub struct JsonSink<W: Write> {
    out: W,
    rows: Vec<RowModel>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            rows: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LayoutSink for JsonSink<W> {
    fn begin(&mut self, _container_width: f64) -> Result<()> {
        self.rows.clear();
        Ok(())
    }

    fn row(&mut self, row: &RowModel) -> Result<()> {
        let mut row = row.clone();
        for item in &mut row.items {
            item.caption_w = item.caption_w.max(0.0);
        }
        self.rows.push(row);
        Ok(())
    }

    fn finish(&mut self, summary: &LayoutSummary) -> Result<()> {
        let pass = JsonPass {
            summary,
            rows: &self.rows,
        };
        serde_json::to_writer(&mut self.out, &pass).context("serialize layout")?;
        writeln!(self.out)?;
        self.rows.clear();
        self.out.flush().context("flush json output")
    }
}
