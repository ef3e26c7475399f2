// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deletion: backspace, forward erase, word deletion and the
//! empty-paragraph cleanup.

use tracing::debug;

use crate::context::EditContext;
use crate::cursor::DocCursor;
use crate::paragraph::CharClass;
use crate::text::{CursorPos, DocRange, Text};

use super::deletion_mark;

/// Delete backwards over one position.
///
/// At position 0 the adjoining paragraph break is marked deleted when
/// change tracking is active (and the break is not itself pending
/// insertion); otherwise the paragraphs are merged. Returns false at the
/// very start of the text.
pub fn backspace(text: &mut Text, cx: &mut EditContext<'_>, cur: &mut DocCursor) -> bool {
    let (pit, pos) = (cur.pit(), cur.pos());
    if pos > 0 {
        cx.undo.record(text, pit..pit + 1);
        let track = cx.params.track_changes;
        text.par_mut(pit).erase(pos - 1, track, deletion_mark(cx));
        cur.set(pit, pos - 1, false);
        return true;
    }
    if pit == 0 {
        return false;
    }
    let prev_mark = text.par(pit - 1).end_mark();
    if cx.params.track_changes && !prev_mark.is_inserted() {
        // The break stays in place, pending review.
        cx.undo.record(text, pit - 1..pit + 1);
        text.par_mut(pit - 1).set_end_mark(deletion_mark(cx));
        cur.set(pit - 1, text.par(pit - 1).size(), false);
        return true;
    }
    backspace_pos0(text, cx, cur)
}

/// Delete forwards over one position; mirror of [`backspace`].
pub fn erase(text: &mut Text, cx: &mut EditContext<'_>, cur: &mut DocCursor) -> bool {
    let (pit, pos) = (cur.pit(), cur.pos());
    if pos < text.par(pit).size() {
        cx.undo.record(text, pit..pit + 1);
        let track = cx.params.track_changes;
        let removed = text.par_mut(pit).erase(pos, track, deletion_mark(cx));
        if !removed {
            // The char stays, marked deleted; step over it.
            cur.set(pit, pos + 1, false);
        }
        return true;
    }
    if pit + 1 == text.len() {
        return false;
    }
    if cx.params.track_changes && !text.par(pit).end_mark().is_inserted() {
        cx.undo.record(text, pit..pit + 2);
        text.par_mut(pit).set_end_mark(deletion_mark(cx));
        cur.set(pit + 1, 0, false);
        return true;
    }
    merge_at(text, cx, cur, pit)
}

/// The three-way merge decision for a backspace at position 0.
fn backspace_pos0(text: &mut Text, cx: &mut EditContext<'_>, cur: &mut DocCursor) -> bool {
    let pit = cur.pit();
    debug_assert!(pit > 0 && cur.pos() == 0, "backspace_pos0 needs a preceding paragraph");
    merge_at(text, cx, cur, pit - 1)
}

/// Remove the break between `pit` and `pit + 1`: drop whichever of the
/// two paragraphs is logically empty, or physically merge them when
/// their layouts match (or the second one has the default layout).
fn merge_at(text: &mut Text, cx: &mut EditContext<'_>, cur: &mut DocCursor, pit: usize) -> bool {
    let head_size = text.par(pit).size();
    if text.par(pit + 1).is_really_empty() {
        cx.undo.record(text, pit..pit + 2);
        text.remove_par(pit + 1);
        cur.set(pit, head_size, false);
        return true;
    }
    if text.par(pit).is_really_empty() {
        cx.undo.record(text, pit..pit + 2);
        text.remove_par(pit);
        cur.set(pit, 0, false);
        return true;
    }
    let tail_layout = text.par(pit + 1).params.layout;
    if tail_layout != text.par(pit).params.layout && tail_layout != cx.class.default_layout() {
        return false;
    }
    cx.undo.record(text, pit..pit + 2);
    text.merge_with_next(pit);
    cur.set(pit, head_size, false);
    true
}

/// Delete from the cursor to the end of the current word, separators
/// included.
pub fn delete_word_forward(text: &mut Text, cx: &mut EditContext<'_>, cur: &mut DocCursor) -> bool {
    let (pit, pos) = (cur.pit(), cur.pos());
    let par = text.par(pit);
    if pos >= par.size() {
        return false;
    }
    let mut end = pos;
    let class = par.class_at(end);
    while end < par.size() && par.class_at(end) == class {
        end += 1;
    }
    while end < par.size() && par.class_at(end) == CharClass::Separator {
        end += 1;
    }
    cx.undo.record(text, pit..pit + 1);
    let track = cx.params.track_changes;
    for p in (pos..end).rev() {
        text.par_mut(pit).erase(p, track, deletion_mark(cx));
    }
    cur.set(pit, pos, false);
    true
}

/// Delete from the start of the previous word to the cursor; mirror of
/// [`delete_word_forward`].
pub fn delete_word_backward(text: &mut Text, cx: &mut EditContext<'_>, cur: &mut DocCursor) -> bool {
    let (pit, pos) = (cur.pit(), cur.pos());
    if pos == 0 {
        return false;
    }
    let par = text.par(pit);
    let mut start = pos;
    while start > 0 && par.class_at(start - 1) == CharClass::Separator {
        start -= 1;
    }
    if start > 0 {
        let class = par.class_at(start - 1);
        while start > 0 && par.class_at(start - 1) == class {
            start -= 1;
        }
    }
    cx.undo.record(text, pit..pit + 1);
    let track = cx.params.track_changes;
    for p in (start..pos).rev() {
        text.par_mut(pit).erase(p, track, deletion_mark(cx));
    }
    cur.set(pit, start, false);
    true
}

/// Erase the whole selection and collapse the cursor to its start.
///
/// Tracked content stays in place marked deleted, including the breaks
/// between spanned paragraphs; untracked content is removed physically
/// and the boundary paragraphs merged. Returns false without a
/// selection.
pub fn erase_selection(text: &mut Text, cx: &mut EditContext<'_>, cur: &mut DocCursor) -> bool {
    let Some(sel) = cur.selection().filter(|s| !s.is_empty()) else {
        return false;
    };
    let track = cx.params.track_changes;
    let last = sel.end.pit.min(text.len() - 1);
    cx.undo.record(text, sel.start.pit..last + 1);

    for pit in (sel.start.pit..=last).rev() {
        let from = if pit == sel.start.pit { sel.start.pos } else { 0 };
        let to = if pit == sel.end.pit {
            sel.end.pos.min(text.par(pit).size())
        } else {
            text.par(pit).size()
        };
        for pos in (from..to).rev() {
            text.par_mut(pit).erase(pos, track, deletion_mark(cx));
        }
        if pit < last {
            // The break between this paragraph and the next is part of
            // the selection.
            if track && !text.par(pit).end_mark().is_inserted() {
                text.par_mut(pit).set_end_mark(deletion_mark(cx));
            } else {
                text.merge_with_next(pit);
            }
        }
    }

    cur.clear_selection();
    cur.set(sel.start.pit, sel.start.pos, false);
    true
}

// --- MARK: Empty-paragraph cleanup ---

/// Cleanup after the cursor left `old`: collapse a doubled separator
/// pair at the vacated position and, when the cursor changed paragraph,
/// remove the vacated paragraph if it is empty (and neither
/// last-remaining nor keep-empty) or strip its leading spaces.
///
/// Returns whether anything was mutated.
pub fn delete_empty_paragraph_mechanism(
    text: &mut Text,
    cx: &mut EditContext<'_>,
    cur: &mut DocCursor,
    old: CursorPos,
) -> bool {
    if old.pit >= text.len() {
        return false;
    }
    let mut changed = false;
    let track = cx.params.track_changes;
    let layout = cx.class.layout(text.par(old.pit).params.layout);
    let free_spacing = layout.free_spacing;
    let keep_empty = layout.keep_empty;

    if !free_spacing && old.pos > 0 && old.pos < text.par(old.pit).size() {
        let par = text.par(old.pit);
        if par.is_separator(old.pos)
            && par.is_separator(old.pos - 1)
            && !par.is_deleted(old.pos)
            && !par.is_deleted(old.pos - 1)
        {
            cx.undo.record(text, old.pit..old.pit + 1);
            let removed = text.par_mut(old.pit).erase(old.pos, track, deletion_mark(cx));
            if removed && cur.pit() == old.pit && cur.pos() > old.pos {
                cur.set(old.pit, cur.pos() - 1, cur.boundary());
            }
            changed = true;
        }
    }

    if old.pit == cur.pit() {
        return changed;
    }

    let vacated = text.par(old.pit);
    let removable = vacated.is_empty()
        && !keep_empty
        && text.len() > 1
        && (!track || vacated.end_mark().is_unchanged());
    if removable {
        cx.undo.record(text, old.pit..old.pit + 1);
        text.remove_par(old.pit);
        debug!(pit = old.pit, "removed vacated empty paragraph");
        let (tpit, tpos, tbound) = {
            let top = cur.top();
            (top.pit, top.pos, top.boundary)
        };
        if tpit > old.pit {
            cur.set(tpit - 1, tpos, tbound);
        }
        if let Some(anchor) = &mut cur.anchor {
            if anchor.pit > old.pit {
                anchor.pit -= 1;
            }
        }
        changed = true;
    } else if !free_spacing {
        // Strip the leading run of spaces instead.
        let mut pos = 0;
        let mut recorded = false;
        while pos < text.par(old.pit).size() && text.par(old.pit).is_separator(pos) {
            if text.par(old.pit).is_deleted(pos) {
                pos += 1;
                continue;
            }
            if !recorded {
                cx.undo.record(text, old.pit..old.pit + 1);
                recorded = true;
            }
            let removed = text.par_mut(old.pit).erase(pos, track, deletion_mark(cx));
            changed = true;
            if removed {
                if cur.pit() == old.pit && cur.pos() > pos {
                    cur.set(old.pit, cur.pos() - 1, cur.boundary());
                }
            } else {
                pos += 1;
            }
        }
    }

    changed
}

/// Run the empty-paragraph cleanup over a whole range: collapse every
/// doubled separator pair and remove every empty paragraph inside it.
/// Repeated invocation reaches a fixed point.
pub fn delete_empty_paragraphs(
    text: &mut Text,
    cx: &mut EditContext<'_>,
    cur: &mut DocCursor,
    range: DocRange,
) -> bool {
    let mut changed = false;
    let track = cx.params.track_changes;
    let last = range.end.pit.min(text.len() - 1);
    for pit in (range.start.pit..=last).rev() {
        if pit >= text.len() {
            continue;
        }
        let layout = cx.class.layout(text.par(pit).params.layout);
        let free_spacing = layout.free_spacing;
        let keep_empty = layout.keep_empty;

        if !free_spacing {
            let mut pos = 1;
            let mut recorded = false;
            while pos < text.par(pit).size() {
                let par = text.par(pit);
                let doubled = par.is_separator(pos)
                    && par.is_separator(pos - 1)
                    && !par.is_deleted(pos)
                    && !par.is_deleted(pos - 1);
                if !doubled {
                    pos += 1;
                    continue;
                }
                if !recorded {
                    cx.undo.record(text, pit..pit + 1);
                    recorded = true;
                }
                let removed = text.par_mut(pit).erase(pos, track, deletion_mark(cx));
                changed = true;
                if removed {
                    if cur.pit() == pit && cur.pos() > pos {
                        cur.set(pit, cur.pos() - 1, cur.boundary());
                    }
                } else {
                    pos += 1;
                }
            }
        }

        let par = text.par(pit);
        let removable = par.is_empty()
            && !keep_empty
            && text.len() > 1
            && (!track || par.end_mark().is_unchanged());
        if removable {
            cx.undo.record(text, pit..pit + 1);
            text.remove_par(pit);
            changed = true;
            let (tpit, tpos, tbound) = {
                let top = cur.top();
                (top.pit, top.pos, top.boundary)
            };
            if tpit > pit {
                cur.set(tpit - 1, tpos, tbound);
            } else if tpit == pit {
                let npit = pit.min(text.len() - 1);
                cur.set(npit, cur.pos().min(text.par(npit).size()), false);
            }
            if let Some(anchor) = &mut cur.anchor {
                if anchor.pit > pit {
                    anchor.pit -= 1;
                }
            }
        }
    }
    changed
}
