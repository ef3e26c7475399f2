// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The command surface: one enum for GUIs and key binders, one
//! dispatcher that runs the operation and reports how much needs
//! re-layout.

use crate::context::{EditContext, LayoutContext};
use crate::cursor::{
    cursor_left, cursor_left_one_word, cursor_right, cursor_right_one_word, DocCursor,
};
use crate::inset::Inset;
use crate::layout::TextLayout;
use crate::text::Text;

use super::delete::{
    backspace, delete_empty_paragraph_mechanism, delete_word_backward, delete_word_forward, erase,
    erase_selection,
};
use super::insert::{break_paragraph, insert_char, insert_inset};
use super::review::{accept_or_reject_changes, change_case, chars_transpose, CaseMode};

/// How much of the display a dispatched command invalidated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Update {
    None,
    /// The current paragraph changed content.
    Partial,
    /// Paragraph structure changed; everything below must relayout.
    Full,
}

/// Outcome of [`dispatch`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DispatchResult {
    /// False asks the enclosing scope to handle the command instead.
    pub dispatched: bool,
    pub update: Update,
}

/// The command surface exposed to GUIs and key binders.
#[derive(Debug)]
pub enum EditCommand {
    InsertChar(char),
    InsertInset(Box<dyn Inset>),
    BreakParagraph { inverse_logic: bool },
    Backspace,
    DeleteForward,
    DeleteWordForward,
    DeleteWordBackward,
    ChangeCase(CaseMode),
    AcceptChanges,
    RejectChanges,
    CharsTranspose,
    MoveLeft,
    MoveRight,
    MoveLeftOneWord { mac_like: bool },
    MoveRightOneWord { mac_like: bool },
    MoveUp,
    MoveDown,
    SetCursorFromCoordinates { x: f32, y: f32 },
}

/// Execute one command against the document.
///
/// Typing refusals (second space, empty-paragraph break) count as
/// dispatched no-ops; only commands that fall off the edge of the
/// document come back undispatched.
pub fn dispatch(
    root: &mut Text,
    cx: &mut EditContext<'_>,
    layout: &mut TextLayout,
    cur: &mut DocCursor,
    cmd: EditCommand,
) -> DispatchResult {
    use EditCommand::*;

    let old = cur.cursor_pos();
    let old_depth = cur.depth();
    let old_root_pit = cur.root_pit();
    let pars_before = cur.current_text(root).len();
    let multi_par_selection = cur
        .selection()
        .is_some_and(|sel| sel.start.pit != sel.end.pit);
    let movement = matches!(
        &cmd,
        MoveLeft
            | MoveRight
            | MoveUp
            | MoveDown
            | MoveLeftOneWord { .. }
            | MoveRightOneWord { .. }
            | SetCursorFromCoordinates { .. }
    );

    let (dispatched, mut update) = match cmd {
        InsertChar(c) => {
            let text = cur.current_text_mut(root);
            let inserted = insert_char(text, cx, cur, c);
            (true, if inserted { Update::Partial } else { Update::None })
        }
        InsertInset(inset) => {
            let text = cur.current_text_mut(root);
            let ok = insert_inset(text, cx, cur, inset);
            (ok, Update::Full)
        }
        BreakParagraph { inverse_logic } => {
            let text = cur.current_text_mut(root);
            let broke = break_paragraph(text, cx, cur, inverse_logic);
            (true, if broke { Update::Full } else { Update::None })
        }
        Backspace => {
            let text = cur.current_text_mut(root);
            let ok = if cur.selection().is_some_and(|sel| !sel.is_empty()) {
                erase_selection(text, cx, cur)
            } else {
                backspace(text, cx, cur)
            };
            (ok, if ok { Update::Partial } else { Update::None })
        }
        DeleteForward => {
            let text = cur.current_text_mut(root);
            let ok = if cur.selection().is_some_and(|sel| !sel.is_empty()) {
                erase_selection(text, cx, cur)
            } else {
                erase(text, cx, cur)
            };
            (ok, if ok { Update::Partial } else { Update::None })
        }
        DeleteWordForward => {
            let text = cur.current_text_mut(root);
            let ok = delete_word_forward(text, cx, cur);
            (ok, if ok { Update::Partial } else { Update::None })
        }
        DeleteWordBackward => {
            let text = cur.current_text_mut(root);
            let ok = delete_word_backward(text, cx, cur);
            (ok, if ok { Update::Partial } else { Update::None })
        }
        ChangeCase(mode) => {
            let text = cur.current_text_mut(root);
            let ok = change_case(text, cx, cur, mode);
            (ok, if ok { Update::Partial } else { Update::None })
        }
        AcceptChanges => {
            let text = cur.current_text_mut(root);
            let ok = accept_or_reject_changes(text, cx, cur, true);
            (ok, if ok { Update::Full } else { Update::None })
        }
        RejectChanges => {
            let text = cur.current_text_mut(root);
            let ok = accept_or_reject_changes(text, cx, cur, false);
            (ok, if ok { Update::Full } else { Update::None })
        }
        CharsTranspose => {
            let text = cur.current_text_mut(root);
            let ok = chars_transpose(text, cx, cur);
            (ok, if ok { Update::Partial } else { Update::None })
        }
        MoveLeft => (cursor_left(root, &cx.layout(), cur), Update::None),
        MoveRight => (cursor_right(root, &cx.layout(), cur), Update::None),
        MoveLeftOneWord { mac_like } => (
            cursor_left_one_word(root, &cx.layout(), cur, mac_like),
            Update::None,
        ),
        MoveRightOneWord { mac_like } => (
            cursor_right_one_word(root, &cx.layout(), cur, mac_like),
            Update::None,
        ),
        MoveUp => (cursor_up(root, &cx.layout(), layout, cur), Update::None),
        MoveDown => (cursor_down(root, &cx.layout(), layout, cur), Update::None),
        SetCursorFromCoordinates { x, y } => (
            set_cursor_from_coordinates(root, &cx.layout(), layout, cur, x, y),
            Update::None,
        ),
    };

    // A multi-paragraph selection edit touches rows in every spanned
    // paragraph.
    if dispatched && update == Update::Partial && multi_par_selection {
        update = Update::Full;
    }

    // Structural edits shift paragraph indices below the edit point.
    if dispatched && cur.depth() == old_depth && cur.current_text(root).len() != pars_before {
        update = Update::Full;
    }

    // Leaving a paragraph triggers the empty-paragraph cleanup.
    if dispatched && movement && cur.depth() == old_depth && cur.pit() != old.pit {
        let text = cur.current_text_mut(root);
        if delete_empty_paragraph_mechanism(text, cx, cur, old) {
            update = Update::Full;
        }
    }

    match update {
        Update::None => {}
        Update::Partial => layout.invalidate(cur.root_pit()),
        Update::Full => {
            let mut from = cur.root_pit();
            if old_depth == 1 {
                from = from.min(old_root_pit);
            }
            layout.invalidate_from(from);
        }
    }

    DispatchResult { dispatched, update }
}

// --- MARK: Coordinate movement ---

fn vertical_move(
    text: &Text,
    cx: &LayoutContext<'_>,
    cache: &mut TextLayout,
    cur: &mut DocCursor,
    up: bool,
) -> bool {
    let (pit, pos, boundary) = (cur.pit(), cur.pos(), cur.boundary());
    let x = cache.cursor_x(text, cx, pit, pos, boundary);
    let rows = cache.ensure(text, cx, pit).rows.len();
    let row_idx = {
        let pm = cache.par_metrics(pit).expect("just ensured");
        if boundary && pos > 0 {
            pm.row_index_for_pos(pos - 1)
        } else {
            pm.row_index_for_pos(pos)
        }
    };

    let (target_pit, target_row) = if up {
        if row_idx > 0 {
            (pit, row_idx - 1)
        } else if pit > 0 {
            let prev_rows = cache.ensure(text, cx, pit - 1).rows.len();
            (pit - 1, prev_rows - 1)
        } else {
            return false;
        }
    } else if row_idx + 1 < rows {
        (pit, row_idx + 1)
    } else if pit + 1 < text.len() {
        (pit + 1, 0)
    } else {
        return false;
    };

    let (new_pos, new_boundary) = cache.column_near_x(text, cx, target_pit, target_row, x);
    cur.set(target_pit, new_pos, new_boundary);
    true
}

/// Move one visual row up, keeping the horizontal offset.
pub fn cursor_up(
    root: &Text,
    cx: &LayoutContext<'_>,
    cache: &mut TextLayout,
    cur: &mut DocCursor,
) -> bool {
    if cur.depth() == 1 {
        vertical_move(root, cx, cache, cur, true)
    } else {
        // Nested texts have no persistent cache of their own.
        let inner = cur.current_text(root);
        let mut scratch = TextLayout::new(cache.max_width());
        vertical_move(inner, cx, &mut scratch, cur, true)
    }
}

/// Move one visual row down; mirror of [`cursor_up`].
pub fn cursor_down(
    root: &Text,
    cx: &LayoutContext<'_>,
    cache: &mut TextLayout,
    cur: &mut DocCursor,
) -> bool {
    if cur.depth() == 1 {
        vertical_move(root, cx, cache, cur, false)
    } else {
        let inner = cur.current_text(root);
        let mut scratch = TextLayout::new(cache.max_width());
        vertical_move(inner, cx, &mut scratch, cur, false)
    }
}

/// Place the cursor at the position nearest to document coordinates,
/// popping out of any nested inset first.
pub fn set_cursor_from_coordinates(
    root: &Text,
    cx: &LayoutContext<'_>,
    cache: &mut TextLayout,
    cur: &mut DocCursor,
    x: f32,
    y: f32,
) -> bool {
    cur.pop_to_root();

    let mut top = 0.0;
    let mut pit = root.len() - 1;
    for p in 0..root.len() {
        let h = cache.par_dimension(root, cx, p).height();
        if y < top + h {
            pit = p;
            break;
        }
        if p + 1 < root.len() {
            top += h;
        }
    }

    let heights: Vec<f32> = cache
        .ensure(root, cx, pit)
        .rows
        .iter()
        .map(|r| r.dim.height())
        .collect();
    let mut row_index = heights.len() - 1;
    let mut offset = top;
    for (i, h) in heights.iter().enumerate() {
        offset += h;
        if y < offset {
            row_index = i;
            break;
        }
    }

    let (pos, boundary) = cache.column_near_x(root, cx, pit, row_index, x);
    cur.set(pit, pos, boundary);
    true
}
