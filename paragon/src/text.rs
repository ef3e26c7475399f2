// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paragraph store: an arena of paragraphs addressed by index.
//!
//! Paragraphs are owned exclusively here; cursors and layout caches hold
//! indices only and revalidate after structural edits. A text always
//! contains at least one paragraph.

use core::ops::Range;

use crate::context::LayoutContext;
use crate::error::ErrorList;
use crate::font::Font;
use crate::paragraph::{Change, Paragraph};
use crate::style::{LayoutId, TextClass};

/// A (paragraph, position) address within one text.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct CursorPos {
    pub pit: usize,
    pub pos: usize,
}

impl CursorPos {
    pub fn new(pit: usize, pos: usize) -> Self {
        Self { pit, pos }
    }
}

/// A half-open logical range between two addresses, `start <= end`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DocRange {
    pub start: CursorPos,
    pub end: CursorPos,
}

impl DocRange {
    pub fn new(a: CursorPos, b: CursorPos) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Paragraph indices touched by the range.
    pub fn pits(&self) -> Range<usize> {
        self.start.pit..self.end.pit + 1
    }
}

/// Ordered sequence of paragraphs.
#[derive(Clone, Debug, Default)]
pub struct Text {
    pars: Vec<Paragraph>,
}

impl Text {
    /// A text with a single empty paragraph of the given layout.
    pub fn new(layout: LayoutId) -> Self {
        Self {
            pars: vec![Paragraph::new(layout)],
        }
    }

    /// Load plain text: each line becomes a paragraph. This is the read
    /// path; it applies none of the live-typing refusals, so doubled
    /// spaces survive until DEPM visits them.
    pub fn from_plain(source: &str, layout: LayoutId, params_font: Font) -> Self {
        let mut pars = Vec::new();
        for line in source.split('\n') {
            let mut par = Paragraph::new(layout);
            for (i, c) in line.chars().enumerate() {
                par.insert_char(i, c, params_font, Change::Unchanged);
            }
            pars.push(par);
        }
        if pars.is_empty() {
            pars.push(Paragraph::new(layout));
        }
        Self { pars }
    }

    pub fn len(&self) -> usize {
        self.pars.len()
    }

    pub fn is_empty(&self) -> bool {
        false // invariant: at least one paragraph
    }

    pub fn par(&self, pit: usize) -> &Paragraph {
        &self.pars[pit]
    }

    pub fn par_mut(&mut self, pit: usize) -> &mut Paragraph {
        &mut self.pars[pit]
    }

    pub fn pars(&self) -> &[Paragraph] {
        &self.pars
    }

    /// Last valid address in the text.
    pub fn end_pos(&self) -> CursorPos {
        let pit = self.len() - 1;
        CursorPos::new(pit, self.pars[pit].size())
    }

    pub fn insert_par(&mut self, pit: usize, par: Paragraph) {
        assert!(pit <= self.len(), "paragraph index out of range");
        self.pars.insert(pit, par);
    }

    /// Remove a paragraph. The last remaining paragraph is never
    /// removed.
    pub fn remove_par(&mut self, pit: usize) -> Option<Paragraph> {
        assert!(pit < self.len(), "paragraph index out of range");
        if self.len() == 1 {
            return None;
        }
        Some(self.pars.remove(pit))
    }

    // --- MARK: Structure ---

    /// Split paragraph `pit` at `pos`; the tail becomes paragraph
    /// `pit + 1`. The head's new end-of-paragraph mark is `break_mark`.
    pub fn break_at(&mut self, pit: usize, pos: usize, break_mark: Change) {
        let tail = self.pars[pit].split_at(pos, break_mark);
        self.pars.insert(pit + 1, tail);
    }

    /// Merge paragraph `pit + 1` into `pit`, removing the break between
    /// them.
    ///
    /// # Panics
    ///
    /// Panics if `pit + 1` does not exist.
    pub fn merge_with_next(&mut self, pit: usize) {
        assert!(pit + 1 < self.len(), "no successor paragraph to merge");
        let next = self.pars.remove(pit + 1);
        self.pars[pit].merge(next);
    }

    // --- MARK: Change review ---

    /// Accept all tracked changes in `range`.
    ///
    /// Interior changes are processed first, then end-of-paragraph marks
    /// last-to-first so paragraph merges do not disturb pending indices.
    pub fn accept_changes(&mut self, range: DocRange) {
        self.resolve_changes(range, true);
    }

    /// Reject all tracked changes in `range`; mirror of
    /// [`accept_changes`](Self::accept_changes).
    pub fn reject_changes(&mut self, range: DocRange) {
        self.resolve_changes(range, false);
    }

    fn resolve_changes(&mut self, range: DocRange, accept: bool) {
        let last_pit = range.end.pit.min(self.len() - 1);
        let mut end = range.end;

        // Interior-of-paragraph changes, positions descending so
        // physical erasures do not shift what is still pending.
        for pit in range.start.pit..=last_pit {
            let par = &mut self.pars[pit];
            if par.is_empty() {
                continue;
            }
            let from = if pit == range.start.pit {
                range.start.pos
            } else {
                0
            };
            let to = if pit == end.pit {
                end.pos.min(par.size())
            } else {
                par.size()
            };
            for pos in (from..to).rev() {
                let erased = if accept {
                    par.accept_change_at(pos)
                } else {
                    par.reject_change_at(pos)
                };
                if erased && pit == end.pit && pos < end.pos {
                    end.pos -= 1;
                }
            }
        }

        // End-of-paragraph marks, last-to-first; merges shrink the
        // range from below.
        for pit in (range.start.pit..=last_pit).rev() {
            let covers_mark =
                pit < end.pit || (pit == end.pit && end.pos >= self.pars[pit].size());
            if !covers_mark {
                continue;
            }
            let mark = self.pars[pit].end_mark();
            let dissolve = if accept {
                mark.is_deleted()
            } else {
                mark.is_inserted()
            };
            if dissolve {
                if pit + 1 < self.len() {
                    self.merge_with_next(pit);
                } else {
                    // The last paragraph break of the document cannot be
                    // removed.
                    self.pars[pit].set_end_mark(Change::Unchanged);
                }
            } else if !mark.is_unchanged() {
                self.pars[pit].set_end_mark(Change::Unchanged);
            }
        }
    }

    // --- MARK: Font cascade ---

    /// Nearest paragraph above `pit` that opened a shallower nesting
    /// level, if any.
    pub fn outer_hook(&self, pit: usize) -> Option<usize> {
        let depth = self.pars[pit].params.depth;
        if depth == 0 {
            return None;
        }
        (0..pit).rev().find(|&i| self.pars[i].params.depth < depth)
    }

    /// The effective rendering font at a position: per-character
    /// override, realized through the label-or-body layout font, the
    /// fonts of enclosing environments, and the document default.
    pub fn font_at(&self, cx: &LayoutContext<'_>, pit: usize, pos: usize) -> Font {
        let par = &self.pars[pit];
        let layout = cx.class.layout(par.params.layout);
        let mut font = if pos < par.size() {
            par.font_override(pos)
        } else {
            Font::INHERIT
        };
        let layer = if pos < par.begin_of_body(layout) {
            &layout.label_font
        } else {
            &layout.font
        };
        font.realize(layer);

        let mut walk = pit;
        while let Some(outer) = self.outer_hook(walk) {
            let outer_layout = cx.class.layout(self.pars[outer].params.layout);
            font.realize(&outer_layout.font);
            walk = outer;
        }

        font.realize(&cx.params.font);
        debug_assert!(font.is_resolved(), "document font must be concrete");
        font
    }

    /// Centralized direction query: whether the glyph at a position runs
    /// right-to-left. Positions at or past the paragraph end take the
    /// direction of the last glyph, or the paragraph base direction for
    /// empty paragraphs.
    pub fn is_rtl_at(&self, cx: &LayoutContext<'_>, pit: usize, pos: usize) -> bool {
        let par = &self.pars[pit];
        if par.is_empty() {
            return cx.params.language.rtl;
        }
        let pos = pos.min(par.size() - 1);
        if par.is_inset(pos) {
            return cx.params.language.rtl;
        }
        self.font_at(cx, pit, pos).is_rtl()
    }

    // --- MARK: Extraction ---

    /// The surviving text, paragraphs separated by newlines.
    pub fn plain_text(&self, out: &mut String) {
        for (i, par) in self.pars.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            par.plain_text(out);
        }
    }

    /// Resolve a persisted layout name for a paragraph, recovering to
    /// the class default on unknown names.
    pub fn assign_layout(
        &mut self,
        pit: usize,
        name: &str,
        class: &TextClass,
        errors: &mut ErrorList,
    ) {
        self.pars[pit].params.layout = class.layout_id(name, errors);
    }
}
