// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The greedy row breaker.
//!
//! `redo_paragraph` walks a paragraph once, accumulating glyph widths
//! until the available width would be exceeded, then backtracks to the
//! best prior break opportunity: a separator, a forced newline, or a
//! boundary around a display inset. Row metrics (stretch, fill,
//! alignment shift) are assigned afterwards, and each row carries a
//! signature so painters can skip rows that did not change.

use core::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

use tracing::trace;

use crate::context::LayoutContext;
use crate::inset::DisplayStyle;
use crate::layout::{left_margin, Dimension, ParagraphMetrics, Row};
use crate::style::Alignment;
use crate::text::Text;

/// Width of the cell at `pos`, resolved through the font cascade.
/// Forced newlines are zero-width; insets answer for themselves.
pub(crate) fn cell_width(
    text: &Text,
    cx: &LayoutContext<'_>,
    max_width: f32,
    pit: usize,
    pos: usize,
) -> f32 {
    let par = text.par(pit);
    match par.char_at(pos) {
        Some('\n') => 0.0,
        Some(c) => cx.metrics.width(c, &text.font_at(cx, pit, pos)),
        None => match par.inset_at(pos) {
            Some(inset) => inset.metrics(cx, max_width).width,
            None => 0.0,
        },
    }
}

fn is_display_inset(text: &Text, pit: usize, pos: usize) -> bool {
    text.par(pit)
        .inset_at(pos)
        .is_some_and(|inset| inset.display() == DisplayStyle::Block)
}

/// End position of the row starting at `start` (exclusive), and whether
/// the row ends at a forced newline.
fn row_break_point(
    text: &Text,
    cx: &LayoutContext<'_>,
    max_width: f32,
    avail: f32,
    pit: usize,
    start: usize,
    body: usize,
) -> (usize, bool) {
    let par = text.par(pit);
    let size = par.size();
    debug_assert!(start < size, "cannot break past the paragraph end");

    let mut x = 0.0;
    let mut opportunity: Option<usize> = None;
    let mut pos = start;
    let mut end = size;
    let mut newline = false;

    while pos < size {
        if par.is_newline(pos) {
            end = pos + 1;
            newline = true;
            break;
        }
        if is_display_inset(text, pit, pos) {
            // A display inset sits on a row of its own: break before it
            // unless it starts the row, and always after it.
            end = if pos > start { pos } else { pos + 1 };
            break;
        }
        let w = cell_width(text, cx, max_width, pit, pos);
        if x + w > avail && pos > start {
            if par.is_separator(pos) {
                // Hang the overflowing separator on this row.
                end = pos + 1;
            } else if let Some(bp) = opportunity {
                end = bp;
            } else {
                // No opportunity in this row: cut the unbreakable chunk.
                end = pos;
            }
            break;
        }
        x += w;
        // Manual labels cannot be broken mid-label.
        if par.is_separator(pos) && pos + 1 >= body {
            opportunity = Some(pos + 1);
        }
        pos += 1;
    }

    // The first row must carry the whole label.
    if end < body {
        end = body.min(size);
        newline = false;
    }
    (end, newline)
}

/// Fill in dimension, origin, fill and stretch of one row.
fn compute_row_metrics(
    text: &Text,
    cx: &LayoutContext<'_>,
    max_width: f32,
    pit: usize,
    row: &mut Row,
    is_last: bool,
    body: usize,
) {
    let par = text.par(pit);
    let layout = cx.class.layout(par.params.layout);
    let left = left_margin(text, cx, max_width, pit, row.range.start);
    let avail = max_width - left;

    let mut dim = Dimension::default();
    let mut num_separators = 0;
    let mut label_width = 0.0;
    for pos in row.range.clone() {
        let hanging =
            par.is_separator(pos) && pos + 1 == row.range.end && !row.end_newline && !is_last;
        let w = cell_width(text, cx, max_width, pit, pos);
        if !hanging {
            dim.width += w;
        }
        if pos < body {
            label_width += w;
        }
        if par.is_separator(pos) && pos >= body && !hanging {
            num_separators += 1;
        }
        match par.inset_at(pos) {
            Some(inset) => {
                let idim = inset.metrics(cx, max_width);
                dim.ascent = dim.ascent.max(idim.ascent);
                dim.descent = dim.descent.max(idim.descent);
            }
            None => {
                let font = text.font_at(cx, pit, pos);
                dim.ascent = dim.ascent.max(cx.metrics.ascent(&font));
                dim.descent = dim.descent.max(cx.metrics.descent(&font));
            }
        }
    }
    if row.range.is_empty() {
        let font = text.font_at(cx, pit, row.range.start.min(par.size().saturating_sub(1)));
        dim.ascent = cx.metrics.ascent(&font);
        dim.descent = cx.metrics.descent(&font);
    }
    dim.ascent *= par.params.spacing;

    // Body-label rows push body text to the configured label position.
    if body > 0 && row.range.start < body && body <= row.range.end {
        let label_font = text.font_at(cx, pit, 0);
        let target = cx.metrics.string_width(&par.params.label_width_string, &label_font)
            + cx.metrics.string_width(&layout.label_sep, &label_font);
        row.label_hfill = (target - label_width).max(0.0);
        dim.width += row.label_hfill;
    }

    row.x = left;
    row.separator = 0.0;
    row.num_separators = num_separators;

    let extra = (avail - dim.width).max(0.0);
    let precedes_display = row.range.end < par.size() && is_display_inset(text, pit, row.range.end);
    match par.effective_align(layout) {
        Alignment::Block => {
            // The paragraph's last row, a forced-newline row and a row
            // before a display inset stay left-aligned.
            if !is_last && !row.end_newline && !precedes_display && num_separators > 0 {
                row.separator = extra / num_separators as f32;
            }
        }
        Alignment::Left => {}
        Alignment::Right => row.x += extra,
        Alignment::Center => row.x += extra / 2.0,
    }

    row.dim = dim;
}

/// Signature over everything that affects the pixels of a row.
/// Signatures are compared across relayouts, so the hasher cannot be
/// randomly seeded.
fn row_signature(text: &Text, pit: usize, row: &Row) -> u64 {
    let mut hasher = DefaultHasher::new();
    row.range.start.hash(&mut hasher);
    row.range.end.hash(&mut hasher);
    row.x.to_bits().hash(&mut hasher);
    row.separator.to_bits().hash(&mut hasher);
    row.label_hfill.to_bits().hash(&mut hasher);
    text.par(pit).hash_range(row.range.clone(), &mut hasher);
    hasher.finish()
}

/// Break one paragraph into rows and compute their metrics.
///
/// `prev` is the previous layout of the same paragraph, used only to
/// mark which rows changed.
pub(crate) fn redo_paragraph(
    text: &Text,
    cx: &LayoutContext<'_>,
    max_width: f32,
    pit: usize,
    prev: Option<&ParagraphMetrics>,
) -> ParagraphMetrics {
    let par = text.par(pit);
    let layout = cx.class.layout(par.params.layout);
    let body = par.begin_of_body(layout);

    let mut rows: Vec<Row> = Vec::new();
    let mut pos = 0;
    while pos < par.size() {
        let left = left_margin(text, cx, max_width, pit, pos);
        let avail = max_width - left;
        let (end, end_newline) = row_break_point(text, cx, max_width, avail, pit, pos, body);
        debug_assert!(end > pos, "row breaker must make progress");
        rows.push(Row {
            range: pos..end,
            end_newline,
            ..Row::default()
        });
        pos = end;
    }
    // An empty paragraph still has one (empty) row, and a trailing
    // forced newline manufactures an empty row of its own so the break
    // is visible.
    if par.is_empty() || par.is_newline(par.size() - 1) {
        rows.push(Row {
            range: par.size()..par.size(),
            ..Row::default()
        });
    }

    let row_count = rows.len();
    let mut dim = Dimension::default();
    for (i, row) in rows.iter_mut().enumerate() {
        let is_last = i + 1 == row_count;
        compute_row_metrics(text, cx, max_width, pit, row, is_last, body);
        row.signature = row_signature(text, pit, row);
        row.changed = prev
            .and_then(|p| p.rows.get(i))
            .map(|p| p.signature != row.signature)
            .unwrap_or(true);
        dim.width = dim.width.max(row.x + row.dim.width);
        if i == 0 {
            dim.ascent = row.dim.ascent;
            dim.descent = row.dim.descent;
        } else {
            dim.descent += row.dim.height();
        }
    }

    trace!(pit, rows = row_count, "paragraph relayout");
    ParagraphMetrics { rows, dim }
}
