// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editing operations and the command dispatcher.
//!
//! Every operation records undo before mutating and leaves the cursor
//! valid. [`dispatch`] is the single entry point for callers: it runs
//! the operation, triggers the empty-paragraph cleanup when the cursor
//! left a paragraph, and reports how much needs re-layout.

mod commands;
mod delete;
mod insert;
mod review;

pub use commands::{
    cursor_down, cursor_up, dispatch, set_cursor_from_coordinates, DispatchResult, EditCommand,
    Update,
};
pub use delete::{
    backspace, delete_empty_paragraph_mechanism, delete_empty_paragraphs, delete_word_backward,
    delete_word_forward, erase, erase_selection,
};
pub use insert::{break_paragraph, insert_char, insert_inset};
pub use review::{accept_or_reject_changes, change_case, chars_transpose, CaseMode};

use crate::context::EditContext;
use crate::paragraph::Change;

/// A tracked insertion mark, or `Unchanged` when tracking is off.
fn insertion_mark(cx: &EditContext<'_>) -> Change {
    if cx.params.track_changes {
        Change::inserted(cx.params.author, cx.params.time)
    } else {
        Change::Unchanged
    }
}

/// The deletion mark for the current author; only consulted when
/// tracking is on.
fn deletion_mark(cx: &EditContext<'_>) -> Change {
    Change::deleted(cx.params.author, cx.params.time)
}
