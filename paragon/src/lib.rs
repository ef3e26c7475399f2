// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph-centric text layout and editing.
//!
//! The document is a [`Text`]: an arena of paragraphs holding characters
//! and embedded [insets](inset::Inset), with per-position font and
//! change-tracking overlays. On top of that sit a greedy row breaker
//! with bidirectional support ([`layout`]), a frame-stack cursor that
//! can descend into editable insets ([`cursor`]), and the editing
//! operations behind a single [`dispatch`](editing::dispatch) entry
//! point.
//!
//! The engine owns no fonts, undo history or rendering machinery; those
//! arrive through the capability traits in [`context`].

pub mod context;
pub mod cursor;
pub mod editing;
pub mod error;
pub mod font;
pub mod inset;
pub mod layout;
pub mod paragraph;
pub mod style;
pub mod text;

pub use context::{DocumentParams, EditContext, FontMetrics, LayoutContext, NoUndo, UndoRecorder};
pub use cursor::DocCursor;
pub use editing::{dispatch, DispatchResult, EditCommand, Update};
pub use font::{Font, Language};
pub use layout::TextLayout;
pub use paragraph::{Change, Paragraph};
pub use style::{LayoutStyle, TextClass};
pub use text::{CursorPos, DocRange, Text};

#[cfg(test)]
mod tests;
