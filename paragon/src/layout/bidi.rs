// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-row bidirectional resolution.
//!
//! Embedding levels and the logical/visual permutation are computed per
//! row; bidi runs never cross row boundaries. Every caller that needs a
//! direction answers through this type instead of re-deriving it from
//! font state.

use core::ops::Range;

use unicode_bidi::{BidiInfo, Level};

use crate::context::LayoutContext;
use crate::layout::{cell_width, Row};
use crate::text::Text;

/// A maximal run of equal embedding level, in visual order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VisualRun {
    pub level: u8,
    /// Visual index range within the row.
    pub visual: Range<usize>,
}

/// Bidi tables of one row.
#[derive(Clone, Debug)]
pub struct RowBidi {
    start: usize,
    levels: Vec<Level>,
    /// Row-relative logical index -> visual index.
    log2vis: Vec<usize>,
    /// Visual index -> absolute logical position.
    vis2log: Vec<usize>,
}

impl RowBidi {
    /// Resolve the row's text. Insets participate as neutral object
    /// replacement characters; a forced newline is treated as a space so
    /// it cannot split the bidi paragraph.
    pub fn compute(text: &Text, cx: &LayoutContext<'_>, pit: usize, row: &Row) -> Self {
        let par = text.par(pit);
        let len = row.range.len();
        if len == 0 {
            return Self {
                start: row.range.start,
                levels: Vec::new(),
                log2vis: Vec::new(),
                vis2log: Vec::new(),
            };
        }

        let mut s = String::new();
        let mut byte_of_pos = Vec::with_capacity(len);
        for pos in row.range.clone() {
            byte_of_pos.push(s.len());
            let c = match par.char_at(pos) {
                Some('\n') => ' ',
                Some(c) => c,
                None => '\u{fffc}',
            };
            s.push(c);
        }

        let base = Some(if cx.params.language.rtl {
            Level::rtl()
        } else {
            Level::ltr()
        });
        let info = BidiInfo::new(&s, base);
        let para = &info.paragraphs[0];
        let (levels, runs) = info.visual_runs(para, 0..s.len());

        let pos_of_byte: hashbrown::HashMap<usize, usize> = byte_of_pos
            .iter()
            .enumerate()
            .map(|(i, &b)| (b, row.range.start + i))
            .collect();

        let mut vis2log = Vec::with_capacity(len);
        for run in &runs {
            let mut run_positions: Vec<usize> = byte_of_pos
                .iter()
                .filter(|b| run.contains(*b))
                .map(|b| pos_of_byte[b])
                .collect();
            if levels[run.start].is_rtl() {
                run_positions.reverse();
            }
            vis2log.extend(run_positions);
        }
        debug_assert_eq!(vis2log.len(), len, "permutation must cover the row");

        let mut log2vis = vec![0; len];
        for (v, &pos) in vis2log.iter().enumerate() {
            log2vis[pos - row.range.start] = v;
        }

        let levels = byte_of_pos.iter().map(|&b| levels[b]).collect();
        Self {
            start: row.range.start,
            levels,
            log2vis,
            vis2log,
        }
    }

    pub fn len(&self) -> usize {
        self.vis2log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vis2log.is_empty()
    }

    /// Embedding level of an absolute logical position.
    pub fn level(&self, pos: usize) -> u8 {
        self.levels[pos - self.start].number()
    }

    pub fn is_rtl(&self, pos: usize) -> bool {
        self.levels[pos - self.start].is_rtl()
    }

    /// Visual index of an absolute logical position.
    pub fn log2vis(&self, pos: usize) -> usize {
        self.log2vis[pos - self.start]
    }

    /// Absolute logical position at a visual index.
    pub fn vis2log(&self, visual: usize) -> usize {
        self.vis2log[visual]
    }

    /// Maximal equal-level runs in visual order.
    pub fn visual_runs(&self) -> Vec<VisualRun> {
        let mut runs = Vec::new();
        let mut i = 0;
        while i < self.len() {
            let level = self.level(self.vis2log[i]);
            let begin = i;
            while i < self.len() && self.level(self.vis2log[i]) == level {
                i += 1;
            }
            runs.push(VisualRun {
                level,
                visual: begin..i,
            });
        }
        runs
    }

    // --- MARK: Screen-x mapping ---

    /// Advance of the glyph at visual index `v`, including justification
    /// stretch and the label hfill carried by the label separator. The
    /// separator that soft-broke the row hangs with zero advance unless
    /// it is the row's own visually-final separator.
    fn advance(
        &self,
        text: &Text,
        cx: &LayoutContext<'_>,
        max_width: f32,
        pit: usize,
        row: &Row,
        v: usize,
    ) -> f32 {
        let pos = self.vis2log[v];
        let par = text.par(pit);
        if par.is_separator(pos) && pos + 1 == row.range.end && !row.end_newline {
            // Trailing soft-break separator.
            if v + 1 != self.len() {
                return 0.0;
            }
        }
        let mut advance = cell_width(text, cx, max_width, pit, pos);
        if par.is_separator(pos) {
            advance += row.separator;
            let layout = cx.class.layout(par.params.layout);
            let body = par.begin_of_body(layout);
            if body > 0 && pos + 1 == body {
                advance += row.label_hfill;
            }
        }
        advance
    }

    /// Absolute left x of the cell at visual index `v`.
    fn cell_left_x(
        &self,
        text: &Text,
        cx: &LayoutContext<'_>,
        max_width: f32,
        pit: usize,
        row: &Row,
        v: usize,
    ) -> f32 {
        let mut x = row.x;
        for i in 0..v {
            x += self.advance(text, cx, max_width, pit, row, i);
        }
        x
    }

    /// Screen x of a logical position within the row, absolute (includes
    /// the row origin).
    ///
    /// Without the boundary flag the cursor sits at the leading edge of
    /// the glyph at `pos`; with it, at the trailing edge of the glyph at
    /// `pos - 1`. The two spots differ exactly at directionality
    /// changes.
    pub fn cursor_x(
        &self,
        text: &Text,
        cx: &LayoutContext<'_>,
        max_width: f32,
        pit: usize,
        row: &Row,
        pos: usize,
        boundary: bool,
    ) -> f32 {
        if self.is_empty() {
            return row.x;
        }
        let end = self.start + self.len();
        let (glyph, trailing) = if boundary && pos > self.start {
            (pos - 1, true)
        } else if pos < end {
            (pos, false)
        } else {
            (end - 1, true)
        };
        let v = self.log2vis(glyph);
        let left = self.cell_left_x(text, cx, max_width, pit, row, v);
        // The leading edge of an LTR glyph is its left side, of an RTL
        // glyph its right side; trailing is the opposite.
        if trailing != self.is_rtl(glyph) {
            left + self.advance(text, cx, max_width, pit, row, v)
        } else {
            left
        }
    }

    /// Nearest logical position (and boundary flag) to a screen x.
    /// Boundary spots are only candidates at directionality changes, and
    /// the plain spot wins ties.
    pub fn column_near_x(
        &self,
        text: &Text,
        cx: &LayoutContext<'_>,
        max_width: f32,
        pit: usize,
        row: &Row,
        target: f32,
    ) -> (usize, bool) {
        let mut best = (f32::INFINITY, row.range.start, false);
        let end = self.start + self.len();
        for pos in self.start..=end {
            let x = self.cursor_x(text, cx, max_width, pit, row, pos, false);
            let distance = (target - x).abs();
            if distance < best.0 {
                best = (distance, pos, false);
            }
        }
        // A boundary spot only wins when strictly closer than every
        // plain spot.
        for pos in self.start + 1..end {
            if self.level(pos) == self.level(pos - 1) {
                continue;
            }
            let x = self.cursor_x(text, cx, max_width, pit, row, pos, true);
            let distance = (target - x).abs();
            if distance < best.0 {
                best = (distance, pos, true);
            }
        }
        (best.1, best.2)
    }

    /// Filled x-intervals covering the logical selection `sel` in this
    /// row: one interval per contiguous visual run, not per logical
    /// range.
    pub fn selection_spans(
        &self,
        text: &Text,
        cx: &LayoutContext<'_>,
        max_width: f32,
        pit: usize,
        row: &Row,
        sel: Range<usize>,
    ) -> Vec<(f32, f32)> {
        let mut spans: Vec<(f32, f32)> = Vec::new();
        let mut x = row.x;
        for v in 0..self.len() {
            let advance = self.advance(text, cx, max_width, pit, row, v);
            let pos = self.vis2log[v];
            if sel.contains(&pos) {
                match spans.last_mut() {
                    Some(last) if last.1 == x => last.1 = x + advance,
                    _ => spans.push((x, x + advance)),
                }
            }
            x += advance;
        }
        spans
    }
}
