// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual layout: rows, paragraph metrics and the layout cache.
//!
//! Rows are ephemeral derived data. For a given paragraph the breaker
//! produces rows that tile `[0, size]` exactly: contiguous, exhaustive,
//! monotonically increasing. The cache here is only ever read after
//! being rebuilt in the same call chain that invalidated it.

mod bidi;
mod breaker;
mod margin;

pub use bidi::{RowBidi, VisualRun};
pub use margin::left_margin;

pub(crate) use breaker::cell_width;

use core::ops::Range;

use hashbrown::HashMap;

use crate::context::LayoutContext;
use crate::text::Text;

/// Width/ascent/descent of a laid-out item.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Dimension {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl Dimension {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// One visual row of a paragraph.
#[derive(Clone, Debug, Default)]
pub struct Row {
    /// Half-open position range of the paragraph shown in this row.
    pub range: Range<usize>,
    pub dim: Dimension,
    /// Left origin: margin plus alignment shift.
    pub x: f32,
    /// Auto-stretch pushing body text to the label-separator position.
    pub label_hfill: f32,
    /// Extra width added to each separator when justifying.
    pub separator: f32,
    /// Number of justifiable separators in the row.
    pub num_separators: usize,
    /// The row ends at a forced newline.
    pub end_newline: bool,
    /// Whether the row changed since the previous layout of this
    /// paragraph (signature mismatch); painters may skip unchanged rows.
    pub changed: bool,
    pub(crate) signature: u64,
}

impl Row {
    pub fn contains(&self, pos: usize) -> bool {
        self.range.contains(&pos)
    }
}

/// Cached layout of one paragraph.
#[derive(Clone, Debug, Default)]
pub struct ParagraphMetrics {
    pub rows: Vec<Row>,
    pub dim: Dimension,
}

impl ParagraphMetrics {
    /// Index of the row containing `pos`; positions at the paragraph end
    /// land in the last row.
    pub fn row_index_for_pos(&self, pos: usize) -> usize {
        for (i, row) in self.rows.iter().enumerate() {
            // A position on a row boundary belongs to the later row,
            // except at the very end.
            if pos < row.range.end {
                return i;
            }
        }
        self.rows.len().saturating_sub(1)
    }

    /// The row at a vertical offset from the paragraph top.
    pub fn row_at(&self, y: f32) -> &Row {
        let mut offset = 0.0;
        for row in &self.rows {
            offset += row.dim.height();
            if y < offset {
                return row;
            }
        }
        self.rows.last().expect("paragraph has at least one row")
    }
}

/// Layout cache over a whole text, keyed by paragraph index.
#[derive(Clone, Debug)]
pub struct TextLayout {
    max_width: f32,
    metrics: HashMap<usize, ParagraphMetrics>,
}

impl TextLayout {
    pub fn new(max_width: f32) -> Self {
        Self {
            max_width,
            metrics: HashMap::new(),
        }
    }

    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Change the container width, invalidating every paragraph.
    pub fn set_max_width(&mut self, max_width: f32) {
        if self.max_width != max_width {
            self.max_width = max_width;
            self.metrics.clear();
        }
    }

    /// Forget the rows of one paragraph (content, font or inset-size
    /// change).
    pub fn invalidate(&mut self, pit: usize) {
        self.metrics.remove(&pit);
    }

    /// Forget everything at or after `pit` (structural edits shift
    /// indices above the edit point).
    pub fn invalidate_from(&mut self, pit: usize) {
        self.metrics.retain(|&k, _| k < pit);
    }

    pub fn invalidate_all(&mut self) {
        self.metrics.clear();
    }

    /// Recompute the rows of one paragraph.
    pub fn redo_paragraph(&mut self, text: &Text, cx: &LayoutContext<'_>, pit: usize) {
        let prev = self.metrics.remove(&pit);
        let pm = breaker::redo_paragraph(text, cx, self.max_width, pit, prev.as_ref());
        self.metrics.insert(pit, pm);
    }

    /// The metrics of a paragraph, computing them if stale.
    pub fn ensure(&mut self, text: &Text, cx: &LayoutContext<'_>, pit: usize) -> &ParagraphMetrics {
        if !self.metrics.contains_key(&pit) {
            self.redo_paragraph(text, cx, pit);
        }
        &self.metrics[&pit]
    }

    pub fn par_metrics(&self, pit: usize) -> Option<&ParagraphMetrics> {
        self.metrics.get(&pit)
    }

    /// Aggregate dimension of one paragraph.
    pub fn par_dimension(&mut self, text: &Text, cx: &LayoutContext<'_>, pit: usize) -> Dimension {
        self.ensure(text, cx, pit).dim
    }

    /// Aggregate dimension of the whole text (stacked paragraphs).
    pub fn text_dimension(&mut self, text: &Text, cx: &LayoutContext<'_>) -> Dimension {
        let mut dim = Dimension::default();
        for pit in 0..text.len() {
            let pd = self.par_dimension(text, cx, pit);
            dim.width = dim.width.max(pd.width);
            if pit == 0 {
                dim.ascent = pd.ascent;
                dim.descent = pd.descent;
            } else {
                dim.descent += pd.height();
            }
        }
        dim
    }

    /// Horizontal cursor offset within the row containing the position,
    /// honoring bidi reordering and the boundary flag.
    pub fn cursor_x(
        &mut self,
        text: &Text,
        cx: &LayoutContext<'_>,
        pit: usize,
        pos: usize,
        boundary: bool,
    ) -> f32 {
        self.ensure(text, cx, pit);
        let pm = &self.metrics[&pit];
        let row_idx = if boundary && pos > 0 {
            pm.row_index_for_pos(pos - 1)
        } else {
            pm.row_index_for_pos(pos)
        };
        let row = pm.rows[row_idx].clone();
        let bidi = RowBidi::compute(text, cx, pit, &row);
        bidi.cursor_x(text, cx, self.max_width, pit, &row, pos, boundary)
    }

    /// Vertical offset of the top of the row containing the position,
    /// measured from the top of the text.
    pub fn cursor_y(
        &mut self,
        text: &Text,
        cx: &LayoutContext<'_>,
        pit: usize,
        pos: usize,
        boundary: bool,
    ) -> f32 {
        let mut y = 0.0;
        for p in 0..pit {
            y += self.par_dimension(text, cx, p).height();
        }
        self.ensure(text, cx, pit);
        let pm = &self.metrics[&pit];
        let row_idx = if boundary && pos > 0 {
            pm.row_index_for_pos(pos - 1)
        } else {
            pm.row_index_for_pos(pos)
        };
        for row in &pm.rows[..row_idx] {
            y += row.dim.height();
        }
        y
    }

    /// Position (and boundary flag) nearest a horizontal offset within a
    /// row.
    pub fn column_near_x(
        &mut self,
        text: &Text,
        cx: &LayoutContext<'_>,
        pit: usize,
        row_index: usize,
        x: f32,
    ) -> (usize, bool) {
        self.ensure(text, cx, pit);
        let row = self.metrics[&pit].rows[row_index].clone();
        let bidi = RowBidi::compute(text, cx, pit, &row);
        bidi.column_near_x(text, cx, self.max_width, pit, &row, x)
    }
}
