// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraphs: ordered cells of characters and insets with font and
//! change overlays.
//!
//! Positions run over `0..size`. Each position holds one [`Cell`]; the
//! font list and the change table are kept in lock step by every
//! mutation. Structural operations (split/merge) live on the paragraph
//! store in [`crate::text`].

mod change;
mod font_list;

pub use change::{AuthorId, Change};
pub(crate) use change::Changes;
pub(crate) use font_list::FontList;

use core::hash::{Hash, Hasher};
use core::ops::Range;

use crate::font::Font;
use crate::inset::Inset;
use crate::style::{Alignment, LayoutId, LayoutStyle};

/// Content of one paragraph position.
#[derive(Clone, Debug)]
pub enum Cell {
    Char(char),
    Inset(Box<dyn Inset>),
}

/// Word-movement classification of a position.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CharClass {
    Letter,
    Separator,
    /// Printable non-letter (punctuation, digits).
    Printable,
    Inset,
}

/// Paragraph-level parameters.
#[derive(Clone, Debug)]
pub struct ParagraphParams {
    /// Nesting depth within enclosing environments.
    pub depth: usize,
    /// Alignment override; `None` falls back to the layout's.
    pub align: Option<Alignment>,
    /// Line-spacing factor.
    pub spacing: f32,
    /// Reference string sizing manual labels.
    pub label_width_string: String,
    pub layout: LayoutId,
    pub start_of_appendix: bool,
    /// Explicit extra left indent in pixels.
    pub left_indent: f32,
    /// Suppress the first-line paragraph indent.
    pub noindent: bool,
}

impl ParagraphParams {
    fn new(layout: LayoutId) -> Self {
        Self {
            depth: 0,
            align: None,
            spacing: 1.0,
            label_width_string: String::new(),
            layout,
            start_of_appendix: false,
            left_indent: 0.0,
            noindent: false,
        }
    }
}

/// One paragraph of the document.
#[derive(Clone, Debug)]
pub struct Paragraph {
    cells: Vec<Cell>,
    fonts: FontList,
    changes: Changes,
    pub params: ParagraphParams,
}

impl Paragraph {
    pub fn new(layout: LayoutId) -> Self {
        Self {
            cells: Vec::new(),
            fonts: FontList::default(),
            changes: Changes::new(0),
            params: ParagraphParams::new(layout),
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the paragraph holds no content that survives pending
    /// deletions.
    pub fn is_really_empty(&self) -> bool {
        (0..self.size()).all(|pos| self.is_deleted(pos))
    }

    // --- MARK: Cells ---

    pub fn cell(&self, pos: usize) -> &Cell {
        &self.cells[pos]
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        match self.cells.get(pos) {
            Some(Cell::Char(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn inset_at(&self, pos: usize) -> Option<&dyn Inset> {
        match self.cells.get(pos) {
            Some(Cell::Inset(inset)) => Some(inset.as_ref()),
            _ => None,
        }
    }

    pub fn inset_at_mut(&mut self, pos: usize) -> Option<&mut Box<dyn Inset>> {
        match self.cells.get_mut(pos) {
            Some(Cell::Inset(inset)) => Some(inset),
            _ => None,
        }
    }

    pub fn is_inset(&self, pos: usize) -> bool {
        matches!(self.cells.get(pos), Some(Cell::Inset(_)))
    }

    pub fn is_separator(&self, pos: usize) -> bool {
        self.char_at(pos) == Some(' ')
    }

    /// Forced line break within the paragraph.
    pub fn is_newline(&self, pos: usize) -> bool {
        self.char_at(pos) == Some('\n')
    }

    pub fn is_letter(&self, pos: usize) -> bool {
        match self.cells.get(pos) {
            Some(Cell::Char(c)) => c.is_alphabetic(),
            Some(Cell::Inset(inset)) => inset.is_letter(),
            None => false,
        }
    }

    pub fn class_at(&self, pos: usize) -> CharClass {
        match &self.cells[pos] {
            Cell::Char(c) if c.is_alphabetic() => CharClass::Letter,
            Cell::Char(c) if *c == ' ' || *c == '\n' => CharClass::Separator,
            Cell::Char(_) => CharClass::Printable,
            Cell::Inset(inset) if inset.is_letter() => CharClass::Letter,
            Cell::Inset(_) => CharClass::Inset,
        }
    }

    // --- MARK: Fonts ---

    /// The raw per-character override at `pos` (possibly all-inherit).
    pub fn font_override(&self, pos: usize) -> Font {
        self.fonts.get(pos)
    }

    pub fn set_font(&mut self, range: Range<usize>, font: Font) {
        debug_assert!(range.end <= self.size(), "font range out of bounds");
        self.fonts.set_range(range.start, range.end, font);
    }

    // --- MARK: Changes ---

    /// Change state at `pos`; `pos == size` addresses the paragraph
    /// break.
    pub fn change(&self, pos: usize) -> Change {
        self.changes.get(pos)
    }

    pub fn set_change(&mut self, pos: usize, change: Change) {
        self.changes.set(pos, change);
    }

    pub fn end_mark(&self) -> Change {
        self.changes.end_mark()
    }

    pub fn set_end_mark(&mut self, change: Change) {
        self.changes.set_end_mark(change);
    }

    pub fn is_inserted(&self, pos: usize) -> bool {
        self.changes.get(pos).is_inserted()
    }

    pub fn is_deleted(&self, pos: usize) -> bool {
        self.changes.get(pos).is_deleted()
    }

    /// Whether any position in `range` carries a pending change.
    pub fn is_changed(&self, range: Range<usize>) -> bool {
        self.changes.is_changed(range)
    }

    // --- MARK: Mutation ---

    pub fn insert_char(&mut self, pos: usize, c: char, font: Font, change: Change) {
        self.insert_cell(pos, Cell::Char(c), font, change);
    }

    pub fn insert_inset(&mut self, pos: usize, inset: Box<dyn Inset>, font: Font, change: Change) {
        self.insert_cell(pos, Cell::Inset(inset), font, change);
    }

    fn insert_cell(&mut self, pos: usize, cell: Cell, font: Font, change: Change) {
        assert!(pos <= self.size(), "insert position out of range");
        self.cells.insert(pos, cell);
        self.fonts.insert(pos, font);
        self.changes.insert(pos, change);
    }

    /// Erase the position, honoring change tracking.
    ///
    /// With tracking enabled, unchanged content is only marked deleted;
    /// content inserted in the current review pass is removed outright.
    /// Returns whether the cell was physically removed.
    pub fn erase(&mut self, pos: usize, track: bool, change: Change) -> bool {
        assert!(pos < self.size(), "erase position out of range");
        if track && !self.is_inserted(pos) {
            if !self.is_deleted(pos) {
                self.changes.set(pos, change);
            }
            return false;
        }
        self.erase_forced(pos);
        true
    }

    /// Erase unconditionally, bypassing change tracking.
    pub fn erase_forced(&mut self, pos: usize) {
        assert!(pos < self.size(), "erase position out of range");
        self.cells.remove(pos);
        self.fonts.erase(pos);
        self.changes.erase(pos);
    }

    /// Accept the change at a content position. Returns whether the
    /// position was physically removed.
    pub(crate) fn accept_change_at(&mut self, pos: usize) -> bool {
        match self.changes.get(pos) {
            Change::Inserted { .. } => {
                self.changes.set(pos, Change::Unchanged);
                false
            }
            Change::Deleted { .. } => {
                self.erase_forced(pos);
                true
            }
            Change::Unchanged => false,
        }
    }

    /// Reject the change at a content position; mirror of
    /// [`accept_change_at`](Self::accept_change_at).
    pub(crate) fn reject_change_at(&mut self, pos: usize) -> bool {
        match self.changes.get(pos) {
            Change::Inserted { .. } => {
                self.erase_forced(pos);
                true
            }
            Change::Deleted { .. } => {
                self.changes.set(pos, Change::Unchanged);
                false
            }
            Change::Unchanged => false,
        }
    }

    /// Drop trailing spaces (physically; used by paragraph breaking and
    /// the read path).
    pub fn trim_trailing_spaces(&mut self) {
        while self.size() > 0 && self.is_separator(self.size() - 1) {
            self.erase_forced(self.size() - 1);
        }
    }

    // --- MARK: Structure ---

    /// Position separating the label region from the body. Zero unless
    /// the layout carries a manual label, in which case the label ends
    /// after the first surviving separator.
    pub fn begin_of_body(&self, layout: &LayoutStyle) -> usize {
        if layout.label != crate::style::LabelKind::Manual {
            return 0;
        }
        for pos in 0..self.size() {
            if self.is_separator(pos) && !self.is_deleted(pos) {
                return pos + 1;
            }
        }
        self.size()
    }

    pub fn effective_align(&self, layout: &LayoutStyle) -> Alignment {
        self.params.align.unwrap_or(layout.align)
    }

    /// Split off the tail at `pos` for a paragraph break. The break mark
    /// becomes the head's end-of-paragraph change.
    pub(crate) fn split_at(&mut self, pos: usize, break_mark: Change) -> Self {
        assert!(pos <= self.size(), "split position out of range");
        let cells = self.cells.split_off(pos);
        let fonts = self.fonts.split_at(pos);
        let changes = self.changes.split_at(pos, break_mark);
        Self {
            cells,
            fonts,
            changes,
            params: self.params.clone(),
        }
    }

    /// Append `other`'s content for a paragraph merge; our end mark is
    /// replaced by the successor's.
    pub(crate) fn merge(&mut self, mut other: Self) {
        let offset = self.size();
        self.cells.append(&mut other.cells);
        self.fonts.merge(other.fonts, offset);
        self.changes.merge(other.changes);
    }

    // --- MARK: Extraction ---

    /// Append the surviving (non-deleted) text, insets rendered through
    /// their own plain-text form.
    pub fn plain_text(&self, out: &mut String) {
        for pos in 0..self.size() {
            if self.is_deleted(pos) {
                continue;
            }
            match &self.cells[pos] {
                Cell::Char(c) => out.push(*c),
                Cell::Inset(inset) => inset.plain_text(out),
            }
        }
    }

    /// Hash the visible state of `range` for row-change detection.
    pub(crate) fn hash_range<H: Hasher>(&self, range: Range<usize>, state: &mut H) {
        for pos in range {
            match &self.cells[pos] {
                Cell::Char(c) => c.hash(state),
                // Identity is enough: inset content changes invalidate
                // the whole paragraph via the metrics cache.
                Cell::Inset(_) => 0xfffc_u32.hash(state),
            }
            self.fonts.get(pos).hash(state);
            core::mem::discriminant(&self.changes.get(pos)).hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{LabelKind, TextClass};

    fn par() -> Paragraph {
        let class = TextClass::plain();
        let mut par = Paragraph::new(class.default_layout());
        for (i, c) in "word one".chars().enumerate() {
            par.insert_char(i, c, Font::INHERIT, Change::Unchanged);
        }
        par
    }

    #[test]
    fn insert_erase_round_trip() {
        let mut par = par();
        let before: String = (0..par.size()).filter_map(|p| par.char_at(p)).collect();
        par.insert_char(4, 'x', Font::INHERIT, Change::Unchanged);
        par.erase_forced(4);
        let after: String = (0..par.size()).filter_map(|p| par.char_at(p)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn tracked_erase_marks_instead_of_removing() {
        let mut par = par();
        let size = par.size();
        assert!(!par.erase(0, true, Change::deleted(0, 1)));
        assert_eq!(par.size(), size);
        assert!(par.is_deleted(0));
        // Inserted content is removed outright.
        par.insert_char(0, 'y', Font::INHERIT, Change::inserted(0, 1));
        assert!(par.erase(0, true, Change::deleted(0, 2)));
        assert_eq!(par.size(), size);
    }

    #[test]
    fn begin_of_body_skips_deleted_separators() {
        let class = {
            let mut layout = crate::style::LayoutStyle::new("List");
            layout.label = LabelKind::Manual;
            layout.margin = crate::style::MarginKind::Manual;
            TextClass::new(vec![layout])
        };
        let mut par = Paragraph::new(class.default_layout());
        for (i, c) in "ab cd ef".chars().enumerate() {
            par.insert_char(i, c, Font::INHERIT, Change::Unchanged);
        }
        let layout = class.layout(class.default_layout());
        assert_eq!(par.begin_of_body(layout), 3);
        par.set_change(2, Change::deleted(0, 1));
        assert_eq!(par.begin_of_body(layout), 6);
    }

    #[test]
    fn split_keeps_overlays_aligned() {
        let mut par = par();
        par.set_change(6, Change::inserted(0, 3));
        let tail = par.split_at(5, Change::Unchanged);
        assert_eq!(par.size(), 5);
        assert_eq!(tail.size(), 3);
        assert!(tail.is_inserted(1));
    }
}
