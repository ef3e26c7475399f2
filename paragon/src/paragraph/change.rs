// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The change-tracking overlay of a paragraph.
//!
//! Every content position carries a [`Change`], and one extra trailing
//! slot tracks the paragraph break itself, so merging or splitting a
//! paragraph is itself a reviewable edit. The table is dense: its length
//! is always `size + 1`.

use core::ops::Range;

use crate::error::{Diagnostic, DiagnosticKind, ErrorList};

/// Identifies an author in the document's author table.
pub type AuthorId = usize;

/// Change state of one position.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Change {
    #[default]
    Unchanged,
    Inserted {
        author: AuthorId,
        time: u64,
    },
    Deleted {
        author: AuthorId,
        time: u64,
    },
}

impl Change {
    pub fn inserted(author: AuthorId, time: u64) -> Self {
        Self::Inserted { author, time }
    }

    pub fn deleted(author: AuthorId, time: u64) -> Self {
        Self::Deleted { author, time }
    }

    pub fn is_unchanged(self) -> bool {
        self == Self::Unchanged
    }

    pub fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted { .. })
    }

    pub fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted { .. })
    }

    pub fn author(self) -> Option<AuthorId> {
        match self {
            Self::Unchanged => None,
            Self::Inserted { author, .. } | Self::Deleted { author, .. } => Some(author),
        }
    }

    /// Validate an author index from persisted input, recovering to the
    /// first author on a bad index.
    pub fn resolve_author(
        author: AuthorId,
        author_count: usize,
        errors: &mut ErrorList,
    ) -> AuthorId {
        if author < author_count {
            author
        } else {
            errors.push(Diagnostic::new(DiagnosticKind::BadAuthor(author), None));
            0
        }
    }
}

/// Dense per-position change table of one paragraph.
///
/// Slot `size` is the end-of-paragraph mark.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Changes {
    table: Vec<Change>,
}

impl Changes {
    /// A table for a paragraph of `size` positions, all unchanged.
    pub(crate) fn new(size: usize) -> Self {
        Self {
            table: vec![Change::Unchanged; size + 1],
        }
    }

    /// Number of content positions covered (excludes the end mark).
    pub(crate) fn size(&self) -> usize {
        self.table.len() - 1
    }

    pub(crate) fn get(&self, pos: usize) -> Change {
        self.table[pos]
    }

    pub(crate) fn set(&mut self, pos: usize, change: Change) {
        self.table[pos] = change;
    }

    pub(crate) fn end_mark(&self) -> Change {
        *self.table.last().unwrap()
    }

    pub(crate) fn set_end_mark(&mut self, change: Change) {
        *self.table.last_mut().unwrap() = change;
    }

    /// Record an insertion of one position at `pos`.
    pub(crate) fn insert(&mut self, pos: usize, change: Change) {
        debug_assert!(pos < self.table.len(), "change insert out of range");
        self.table.insert(pos, change);
    }

    /// Drop the slot at `pos` after the content was physically erased.
    pub(crate) fn erase(&mut self, pos: usize) {
        debug_assert!(pos + 1 < self.table.len(), "cannot erase the end mark");
        self.table.remove(pos);
    }

    /// Whether any position in `range` (content slots only) is changed.
    pub(crate) fn is_changed(&self, range: Range<usize>) -> bool {
        self.table[range].iter().any(|c| !c.is_unchanged())
    }

    /// Split the table at `pos` for a paragraph break.
    ///
    /// `self` keeps `[0, pos)` plus a fresh end mark for the new break;
    /// the returned table gets `[pos, size)` plus the old end mark.
    pub(crate) fn split_at(&mut self, pos: usize, break_mark: Change) -> Self {
        let tail = self.table.split_off(pos);
        self.table.push(break_mark);
        Self { table: tail }
    }

    /// Append `other` for a paragraph merge, discarding our end mark.
    pub(crate) fn merge(&mut self, other: Self) {
        self.table.pop();
        self.table.extend(other.table);
    }
}
