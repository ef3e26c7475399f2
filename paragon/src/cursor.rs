// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The cursor: a stack of frames addressing a position possibly nested
//! inside recursive insets.
//!
//! A frame holds indices only (which inset in the parent, which
//! paragraph, which position), never references into the paragraph
//! store; after any structural edit the path is revalidated with
//! [`DocCursor::sanitize`]. The boundary flag disambiguates a logical
//! position sitting exactly at a directionality change.

use smallvec::SmallVec;

use crate::context::LayoutContext;
use crate::paragraph::CharClass;
use crate::text::{CursorPos, DocRange, Text};

/// One level of the cursor path.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CursorFrame {
    /// Address of the inset this frame lives in, within the parent
    /// text; `None` for the document root.
    pub inset: Option<CursorPos>,
    pub pit: usize,
    pub pos: usize,
    /// Which of the two visual spots of a bidi-ambiguous position the
    /// cursor occupies.
    pub boundary: bool,
}

impl CursorFrame {
    fn root() -> Self {
        Self {
            inset: None,
            pit: 0,
            pos: 0,
            boundary: false,
        }
    }

    pub fn cursor_pos(&self) -> CursorPos {
        CursorPos::new(self.pit, self.pos)
    }
}

/// A cursor into a (possibly nested) document.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DocCursor {
    frames: SmallVec<[CursorFrame; 4]>,
    /// Selection anchor within the innermost text, if a selection is
    /// active.
    pub anchor: Option<CursorPos>,
}

impl Default for DocCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocCursor {
    pub fn new() -> Self {
        Self {
            frames: SmallVec::from_elem(CursorFrame::root(), 1),
            anchor: None,
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> &CursorFrame {
        self.frames.last().expect("cursor always has a root frame")
    }

    pub fn top_mut(&mut self) -> &mut CursorFrame {
        self.frames.last_mut().expect("cursor always has a root frame")
    }

    pub fn pit(&self) -> usize {
        self.top().pit
    }

    pub fn pos(&self) -> usize {
        self.top().pos
    }

    pub fn boundary(&self) -> bool {
        self.top().boundary
    }

    pub fn cursor_pos(&self) -> CursorPos {
        self.top().cursor_pos()
    }

    pub fn set(&mut self, pit: usize, pos: usize, boundary: bool) {
        let top = self.top_mut();
        top.pit = pit;
        top.pos = pos;
        top.boundary = boundary;
    }

    /// Selection between anchor and cursor in the innermost text, if
    /// any.
    pub fn selection(&self) -> Option<DocRange> {
        self.anchor.map(|anchor| DocRange::new(anchor, self.cursor_pos()))
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    // --- MARK: Path resolution ---

    /// The innermost text the cursor addresses.
    pub fn current_text<'a>(&self, root: &'a Text) -> &'a Text {
        let mut text = root;
        for frame in &self.frames[1..] {
            let at = frame.inset.expect("non-root frames address an inset");
            text = &text
                .par(at.pit)
                .inset_at(at.pos)
                .and_then(|inset| inset.as_text())
                .expect("cursor path points at an editable inset")
                .text;
        }
        text
    }

    /// Mutable access to the innermost text.
    pub fn current_text_mut<'a>(&self, root: &'a mut Text) -> &'a mut Text {
        let mut text = root;
        for frame in &self.frames[1..] {
            let at = frame.inset.expect("non-root frames address an inset");
            text = &mut text
                .par_mut(at.pit)
                .inset_at_mut(at.pos)
                .and_then(|inset| inset.as_text_mut())
                .expect("cursor path points at an editable inset")
                .text;
        }
        text
    }

    /// Enter the editable inset at the current position, at its
    /// beginning or end.
    pub fn push(&mut self, at_end: bool, root: &Text) {
        let at = self.cursor_pos();
        let mut frame = CursorFrame {
            inset: Some(at),
            ..CursorFrame::root()
        };
        if at_end {
            // Resolve the inset's own text to find its end.
            let parent = self.current_text(root);
            let inner = &parent
                .par(at.pit)
                .inset_at(at.pos)
                .and_then(|inset| inset.as_text())
                .expect("push target is an editable inset")
                .text;
            let end = inner.end_pos();
            frame.pit = end.pit;
            frame.pos = end.pos;
        }
        self.frames.push(frame);
        self.anchor = None;
    }

    /// Leave the current inset; the cursor lands on the inset's
    /// position in the parent. Returns false at the document root.
    pub fn pop(&mut self) -> bool {
        if self.frames.len() == 1 {
            return false;
        }
        let frame = self.frames.pop().unwrap();
        let at = frame.inset.unwrap();
        self.set(at.pit, at.pos, false);
        self.anchor = None;
        true
    }

    /// Drop every nested frame, leaving the cursor in the root text.
    pub fn pop_to_root(&mut self) {
        self.frames.truncate(1);
        self.anchor = None;
    }

    /// Paragraph index in the root text that contains the cursor,
    /// however deeply nested.
    pub fn root_pit(&self) -> usize {
        match self.frames.get(1).and_then(|f| f.inset) {
            Some(at) => at.pit,
            None => self.frames[0].pit,
        }
    }

    /// Revalidate the path after structural edits: truncate frames whose
    /// inset vanished and clamp indices into range.
    pub fn sanitize(&mut self, root: &Text) {
        let mut text = root;
        let mut keep = 1;
        for frame in self.frames[1..].iter() {
            let at = frame.inset.expect("non-root frames address an inset");
            let inner = (at.pit < text.len() && at.pos < text.par(at.pit).size())
                .then(|| text.par(at.pit).inset_at(at.pos))
                .flatten()
                .and_then(|inset| inset.as_text());
            match inner {
                Some(inner) => {
                    text = &inner.text;
                    keep += 1;
                }
                None => break,
            }
        }
        self.frames.truncate(keep);

        let top = self.frames.last_mut().unwrap();
        top.pit = top.pit.min(text.len() - 1);
        top.pos = top.pos.min(text.par(top.pit).size());
        if let Some(anchor) = &mut self.anchor {
            anchor.pit = anchor.pit.min(text.len() - 1);
            anchor.pos = anchor.pos.min(text.par(anchor.pit).size());
        }
    }
}

// --- MARK: Horizontal movement ---

/// Whether `pos` sits exactly at a directionality change of its
/// paragraph.
fn is_direction_boundary(text: &Text, cx: &LayoutContext<'_>, pit: usize, pos: usize) -> bool {
    let par = text.par(pit);
    pos > 0 && pos < par.size() && text.is_rtl_at(cx, pit, pos) != text.is_rtl_at(cx, pit, pos - 1)
}

/// Move one position right, entering adjacent editable insets first.
///
/// Returns false (undispatched) when the cursor is already at the very
/// end of the document, asking the caller to handle the escape.
pub fn cursor_right(root: &Text, cx: &LayoutContext<'_>, cur: &mut DocCursor) -> bool {
    // Crossing out of a boundary spot is a purely visual step.
    if cur.boundary() {
        let (pit, pos) = (cur.pit(), cur.pos());
        cur.set(pit, pos, false);
        return true;
    }
    let text = cur.current_text(root);
    let (pit, pos) = (cur.pit(), cur.pos());
    let par = text.par(pit);
    if pos < par.size() {
        if par.inset_at(pos).is_some_and(|i| i.editable()) {
            cur.push(false, root);
            return true;
        }
        let boundary = is_direction_boundary(text, cx, pit, pos + 1);
        cur.set(pit, pos + 1, boundary);
        return true;
    }
    if pit + 1 < text.len() {
        cur.set(pit + 1, 0, false);
        return true;
    }
    // Escape into the enclosing text, landing after the inset.
    if cur.depth() > 1 {
        cur.pop();
        let (pit, pos) = (cur.pit(), cur.pos());
        cur.set(pit, pos + 1, false);
        return true;
    }
    false
}

/// Move one position left; mirror of [`cursor_right`].
pub fn cursor_left(root: &Text, cx: &LayoutContext<'_>, cur: &mut DocCursor) -> bool {
    let text = cur.current_text(root);
    let (pit, pos) = (cur.pit(), cur.pos());
    // Step onto the boundary spot before actually moving.
    if !cur.boundary() && is_direction_boundary(text, cx, pit, pos) {
        cur.set(pit, pos, true);
        return true;
    }
    if pos > 0 {
        let par = text.par(pit);
        if par.inset_at(pos - 1).is_some_and(|i| i.editable()) {
            cur.set(pit, pos - 1, false);
            cur.push(true, root);
            return true;
        }
        cur.set(pit, pos - 1, false);
        return true;
    }
    if pit > 0 {
        let new_pos = text.par(pit - 1).size();
        cur.set(pit - 1, new_pos, false);
        return true;
    }
    if cur.depth() > 1 {
        cur.pop();
        return true;
    }
    false
}

// --- MARK: Word movement ---

/// Move right to the next word boundary. `mac_like` additionally
/// swallows trailing punctuation.
pub fn cursor_right_one_word(
    root: &Text,
    _cx: &LayoutContext<'_>,
    cur: &mut DocCursor,
    mac_like: bool,
) -> bool {
    let text = cur.current_text(root);
    let (pit, mut pos) = (cur.pit(), cur.pos());
    let par = text.par(pit);
    if pos >= par.size() {
        if pit + 1 < text.len() {
            cur.set(pit + 1, 0, false);
            return true;
        }
        return false;
    }
    let class = par.class_at(pos);
    while pos < par.size() && par.class_at(pos) == class {
        pos += 1;
    }
    if mac_like {
        while pos < par.size() && par.class_at(pos) == CharClass::Printable {
            pos += 1;
        }
    }
    while pos < par.size() && par.class_at(pos) == CharClass::Separator {
        pos += 1;
    }
    cur.set(pit, pos, false);
    true
}

/// Move left to the previous word boundary; mirror of
/// [`cursor_right_one_word`].
pub fn cursor_left_one_word(
    root: &Text,
    _cx: &LayoutContext<'_>,
    cur: &mut DocCursor,
    mac_like: bool,
) -> bool {
    let text = cur.current_text(root);
    let (pit, mut pos) = (cur.pit(), cur.pos());
    if pos == 0 {
        if pit > 0 {
            cur.set(pit - 1, text.par(pit - 1).size(), false);
            return true;
        }
        return false;
    }
    let par = text.par(pit);
    while pos > 0 && par.class_at(pos - 1) == CharClass::Separator {
        pos -= 1;
    }
    if mac_like {
        while pos > 0 && par.class_at(pos - 1) == CharClass::Printable {
            pos -= 1;
        }
    }
    if pos > 0 {
        let class = par.class_at(pos - 1);
        while pos > 0 && par.class_at(pos - 1) == class {
            pos -= 1;
        }
    }
    cur.set(pit, pos, false);
    true
}

/// How far [`get_word`] extends around the cursor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WordMode {
    /// Whole word, but only when the cursor is strictly inside one.
    WholeStrict,
    Whole,
    /// The word ending at (or just before) the cursor.
    Previous,
    /// From the word start up to the cursor.
    Partial,
}

/// The word range around `at` in paragraph terms.
pub fn get_word(text: &Text, at: CursorPos, mode: WordMode) -> DocRange {
    use WordMode::*;
    let par = text.par(at.pit);
    let size = par.size();
    let letter = |pos: usize| pos < size && par.class_at(pos) == CharClass::Letter;

    let collapsed = DocRange::new(at, at);
    let mut from = at.pos;
    let mut to = at.pos;
    match mode {
        WholeStrict => {
            if at.pos == 0 || !letter(at.pos - 1) || !letter(at.pos) {
                return collapsed;
            }
            while from > 0 && letter(from - 1) {
                from -= 1;
            }
            while letter(to) {
                to += 1;
            }
        }
        Whole => {
            while from > 0 && letter(from - 1) {
                from -= 1;
            }
            while letter(to) {
                to += 1;
            }
        }
        Previous => {
            while from > 0 && !letter(from - 1) {
                from -= 1;
            }
            while from > 0 && letter(from - 1) {
                from -= 1;
            }
            to = from;
            while letter(to) {
                to += 1;
            }
        }
        Partial => {
            while from > 0 && letter(from - 1) {
                from -= 1;
            }
        }
    }
    DocRange::new(CursorPos::new(at.pit, from), CursorPos::new(at.pit, to))
}
