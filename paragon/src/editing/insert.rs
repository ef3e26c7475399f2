// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character and inset insertion, and paragraph breaking.

use tracing::debug;

use crate::context::EditContext;
use crate::cursor::DocCursor;
use crate::inset::Inset;
use crate::paragraph::Paragraph;
use crate::text::Text;

use super::{deletion_mark, insertion_mark};

/// Insert one character at the cursor and advance past it.
///
/// Returns false for the typing refusals: a space at paragraph start or
/// directly after another space, unless the layout is free-spacing.
pub fn insert_char(text: &mut Text, cx: &mut EditContext<'_>, cur: &mut DocCursor, c: char) -> bool {
    let (pit, pos) = (cur.pit(), cur.pos());
    let layout = cx.class.layout(text.par(pit).params.layout);
    if c == ' ' && !layout.free_spacing {
        // A paragraph never starts with a space, and separators do not
        // double up while typing. The read path does not enforce this;
        // the empty-paragraph cleanup catches loaded doubles later.
        if pos == 0 {
            return false;
        }
        let par = text.par(pit);
        if par.is_separator(pos - 1) && !par.is_deleted(pos - 1) {
            return false;
        }
    }

    cx.undo.record(text, pit..pit + 1);
    let mark = insertion_mark(cx);
    let font = cx.current_font;
    text.par_mut(pit).insert_char(pos, c, font, mark);

    // The insert may have put a separator between opposite-direction
    // words, or completed the second neighbor of an existing one.
    for p in pos.saturating_sub(1)..=pos + 1 {
        adjust_separator_language(text, cx, pit, p);
    }

    cur.set(pit, pos + 1, false);
    true
}

/// Insert an inset at the cursor. The caller gets `Update::Full` from
/// dispatch since an inset boundary changes the buffer structure.
pub fn insert_inset(
    text: &mut Text,
    cx: &mut EditContext<'_>,
    cur: &mut DocCursor,
    inset: Box<dyn Inset>,
) -> bool {
    let (pit, pos) = (cur.pit(), cur.pos());
    cx.undo.record(text, pit..pit + 1);
    let mark = insertion_mark(cx);
    let font = cx.current_font;
    text.par_mut(pit).insert_inset(pos, inset, font, mark);
    cur.set(pit, pos + 1, false);
    true
}

/// A separator between opposite-direction words takes the paragraph
/// base language; elsewhere it keeps the language it was typed in.
fn adjust_separator_language(text: &mut Text, cx: &EditContext<'_>, pit: usize, pos: usize) {
    let par = text.par(pit);
    if pos == 0 || pos + 1 >= par.size() || !par.is_separator(pos) {
        return;
    }
    let lcx = cx.layout();
    let before = text.is_rtl_at(&lcx, pit, pos - 1);
    let after = text.is_rtl_at(&lcx, pit, pos + 1);
    if before != after {
        let mut font = text.par(pit).font_override(pos);
        font.language = Some(cx.params.language);
        text.par_mut(pit).set_font(pos..pos + 1, font);
    }
}

/// Break the paragraph at the cursor.
///
/// Refused on an empty paragraph whose layout does not allow empty
/// breaks. The tail keeps the environment layout or falls back to the
/// class default depending on `inverse_logic`; leading forced newlines
/// are stripped from it. The cursor ends up in the paragraph after the
/// break in every case, which for a break at position 0 of an
/// originally-empty paragraph is still the original paragraph.
pub fn break_paragraph(
    text: &mut Text,
    cx: &mut EditContext<'_>,
    cur: &mut DocCursor,
    inverse_logic: bool,
) -> bool {
    let (pit, mut pos) = (cur.pit(), cur.pos());
    let layout = cx.class.layout(text.par(pit).params.layout);
    let was_empty = text.par(pit).is_empty();
    if was_empty && !layout.allows_empty_break() {
        return false;
    }
    let free_spacing = layout.free_spacing;
    let keep_layout = inverse_logic != layout.is_environment;

    cx.undo.record(text, pit..pit + 1);
    let track = cx.params.track_changes;
    let break_mark = insertion_mark(cx);

    // The head does not end in a separator.
    if pos > 0 && text.par(pit).is_separator(pos - 1) && !free_spacing {
        let removed = text.par_mut(pit).erase(pos - 1, track, deletion_mark(cx));
        if removed {
            pos -= 1;
        }
    }

    if pos == 0 && was_empty {
        // Push an empty paragraph above; the cursor keeps addressing
        // the original one, now shifted down.
        let mut head = Paragraph::new(text.par(pit).params.layout);
        head.params = text.par(pit).params.clone();
        head.set_end_mark(break_mark);
        text.insert_par(pit, head);
    } else {
        text.break_at(pit, pos, break_mark);
        if !keep_layout {
            text.par_mut(pit + 1).params.layout = cx.class.default_layout();
        }
        while text.par(pit + 1).size() > 0 && text.par(pit + 1).is_newline(0) {
            text.par_mut(pit + 1).erase_forced(0);
        }
    }

    debug!(pit, pos, keep_layout, "paragraph break");
    cur.set(pit + 1, 0, false);
    true
}
