// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change review and run-based rewriting: accept/reject over a
//! selection, case change and character transposition.

use crate::context::EditContext;
use crate::cursor::DocCursor;
use crate::font::Font;
use crate::paragraph::{Change, CharClass, Paragraph};
use crate::text::{CursorPos, DocRange, Text};

use super::delete::delete_empty_paragraphs;
use super::{deletion_mark, insertion_mark};

/// Resolve every tracked change in the current selection, then clean up
/// the paragraphs the resolution touched. Returns false without a
/// selection.
pub fn accept_or_reject_changes(
    text: &mut Text,
    cx: &mut EditContext<'_>,
    cur: &mut DocCursor,
    accept: bool,
) -> bool {
    let Some(sel) = cur.selection() else {
        return false;
    };
    if sel.is_empty() {
        return false;
    }
    let last = sel.end.pit.min(text.len() - 1);
    cx.undo.record(text, sel.start.pit..last + 1);
    if accept {
        text.accept_changes(sel);
    } else {
        text.reject_changes(sel);
    }
    cur.clear_selection();
    delete_empty_paragraphs(text, cx, cur, sel);

    // Resolution may have shortened or merged paragraphs under the
    // cursor.
    let pit = cur.pit().min(text.len() - 1);
    let pos = cur.pos().min(text.par(pit).size());
    cur.set(pit, pos, false);
    true
}

// --- MARK: Case change ---

/// Case transformation applied by [`change_case`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CaseMode {
    Upper,
    Lower,
    /// Uppercase the first letter of each word, leave the rest.
    Capitalize,
}

fn recased(par: &Paragraph, pos: usize, mode: CaseMode) -> Option<char> {
    let c = par.char_at(pos)?;
    let new = match mode {
        CaseMode::Upper => c.to_uppercase().next().unwrap_or(c),
        CaseMode::Lower => c.to_lowercase().next().unwrap_or(c),
        CaseMode::Capitalize => {
            if pos == 0 || !par.is_letter(pos - 1) {
                c.to_uppercase().next().unwrap_or(c)
            } else {
                c
            }
        }
    };
    (new != c).then_some(new)
}

/// Change the case of the selection, or of the rest of the word right
/// of the cursor when nothing is selected.
///
/// Characters are rewritten in maximal runs. Under change tracking each
/// run is inserted before the old one, which is then marked deleted;
/// the range end is re-expanded past the insertions so a following
/// operation still sees the whole affected region.
pub fn change_case(
    text: &mut Text,
    cx: &mut EditContext<'_>,
    cur: &mut DocCursor,
    mode: CaseMode,
) -> bool {
    let range = match cur.selection().filter(|s| !s.is_empty()) {
        Some(sel) => sel,
        None => {
            let start = cur.cursor_pos();
            let par = text.par(start.pit);
            let mut end = start.pos;
            while end < par.size() && par.class_at(end) == CharClass::Letter {
                end += 1;
            }
            if end == start.pos {
                return false;
            }
            DocRange::new(start, CursorPos::new(start.pit, end))
        }
    };

    let last = range.end.pit.min(text.len() - 1);
    cx.undo.record(text, range.start.pit..last + 1);
    let mut end = range.end;
    for pit in range.start.pit..=last {
        let from = if pit == range.start.pit {
            range.start.pos
        } else {
            0
        };
        let to = if pit == end.pit {
            end.pos
        } else {
            text.par(pit).size()
        };
        recase_runs(text, cx, pit, from, to, mode, &mut end);
    }

    let end_pit = end.pit.min(text.len() - 1);
    cur.set(end_pit, end.pos.min(text.par(end_pit).size()), false);
    true
}

/// Rewrite `from..to` of one paragraph in maximal changed runs,
/// skipping insets and already-deleted positions. `end` is pushed right
/// for every deletion mark the tracked insert-before-erase sequence
/// leaves behind.
fn recase_runs(
    text: &mut Text,
    cx: &mut EditContext<'_>,
    pit: usize,
    from: usize,
    to: usize,
    mode: CaseMode,
    end: &mut CursorPos,
) {
    let track = cx.params.track_changes;
    let mut pos = from;
    let mut limit = to.min(text.par(pit).size());
    while pos < limit {
        let par = text.par(pit);
        if par.is_deleted(pos) || par.is_inset(pos) || recased(par, pos, mode).is_none() {
            pos += 1;
            continue;
        }
        let run_start = pos;
        let mut run: Vec<(char, Font, Change)> = Vec::new();
        while pos < limit {
            let par = text.par(pit);
            if par.is_deleted(pos) || par.is_inset(pos) {
                break;
            }
            match recased(par, pos, mode) {
                Some(c) => {
                    run.push((c, par.font_override(pos), par.change(pos)));
                    pos += 1;
                }
                None => break,
            }
        }
        let run_len = run.len();
        let par = text.par_mut(pit);
        if track {
            let mark = insertion_mark(cx);
            for (i, (c, font, _)) in run.iter().enumerate() {
                par.insert_char(run_start + i, *c, *font, mark);
            }
            // Originals that were themselves pending insertions are
            // removed physically and shift the tail left; only the
            // surviving deletion marks widen the region.
            let del = deletion_mark(cx);
            let mut at = run_start + run_len;
            let mut kept = 0;
            for _ in 0..run_len {
                if !par.erase(at, true, del) {
                    at += 1;
                    kept += 1;
                }
            }
            pos += kept;
            limit += kept;
            if end.pit == pit {
                end.pos += kept;
            }
        } else {
            for (i, (c, font, change)) in run.iter().enumerate() {
                par.erase_forced(run_start + i);
                par.insert_char(run_start + i, *c, *font, *change);
            }
        }
    }
}

// --- MARK: Transposition ---

/// Swap the two characters around the cursor, skipping deleted
/// positions; fonts travel with their characters. Refused next to
/// insets or at the paragraph edges.
pub fn chars_transpose(text: &mut Text, cx: &mut EditContext<'_>, cur: &mut DocCursor) -> bool {
    let (pit, pos) = (cur.pit(), cur.pos());
    let par = text.par(pit);
    let size = par.size();

    let mut p2 = pos;
    while p2 < size && par.is_deleted(p2) {
        p2 += 1;
    }
    let mut left = pos;
    while left > 0 && par.is_deleted(left - 1) {
        left -= 1;
    }
    if p2 >= size || left == 0 {
        return false;
    }
    let p1 = left - 1;

    let (Some(c1), Some(c2)) = (par.char_at(p1), par.char_at(p2)) else {
        return false; // at least one side is an inset
    };
    let (f1, f2) = (par.font_override(p1), par.font_override(p2));

    cx.undo.record(text, pit..pit + 1);
    if cx.params.track_changes {
        // The swapped pair is a fresh insertion. Originals stay marked
        // deleted, except ones that were themselves pending insertions;
        // those are removed physically and shift everything after them.
        let mark = insertion_mark(cx);
        let par = text.par_mut(pit);
        par.insert_char(p2 + 1, c1, f1, mark);
        par.insert_char(p2 + 1, c2, f2, mark);
        let del = deletion_mark(cx);
        let mut after = p2 + 3;
        let removed = par.erase(p1, true, del);
        if removed {
            after -= 1;
        }
        let p2_now = if removed { p2 - 1 } else { p2 };
        if par.erase(p2_now, true, del) {
            after -= 1;
        }
        cur.set(pit, after, false);
    } else {
        let (ch1, ch2) = (par.change(p1), par.change(p2));
        let par = text.par_mut(pit);
        par.erase_forced(p2);
        par.erase_forced(p1);
        par.insert_char(p1, c2, f2, ch2);
        par.insert_char(p2, c1, f1, ch1);
        cur.set(pit, p2 + 1, false);
    }
    true
}
