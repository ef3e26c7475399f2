// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability interfaces and the passed-down editing context.
//!
//! The engine owns no fonts, undo history or rendering machinery; it
//! consumes them through the traits here. All formerly-global state
//! (current font, tracking flags, document parameters) travels in
//! [`EditContext`] instead.

use core::ops::Range;

use crate::font::{Font, Language};
use crate::paragraph::AuthorId;
use crate::style::TextClass;
use crate::text::Text;

/// Font metric provider, side-effect-free and cacheable per
/// `(font, codepoint)`.
pub trait FontMetrics {
    fn width(&self, c: char, font: &Font) -> f32;
    fn ascent(&self, font: &Font) -> f32;
    fn descent(&self, font: &Font) -> f32;

    /// Rendered width of a string, additive over its characters.
    fn string_width(&self, s: &str, font: &Font) -> f32 {
        s.chars().map(|c| self.width(c, font)).sum()
    }
}

/// Undo recording capability. The engine calls this before every
/// mutation and never reads history back.
pub trait UndoRecorder {
    /// Snapshot the paragraphs of `pars` before they are mutated.
    fn record(&mut self, text: &Text, pars: Range<usize>);
}

/// Recorder that drops every snapshot, for documents without history.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoUndo;

impl UndoRecorder for NoUndo {
    fn record(&mut self, _text: &Text, _pars: Range<usize>) {}
}

/// An author in the document's author table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub name: String,
}

/// Document-wide parameters.
#[derive(Clone, Debug)]
pub struct DocumentParams {
    /// Fully resolved document default font.
    pub font: Font,
    /// Base language; its direction is the paragraph base direction.
    pub language: Language,
    pub track_changes: bool,
    /// Author new tracked changes are attributed to.
    pub author: AuthorId,
    pub authors: Vec<Author>,
    /// Timestamp source value for new change records.
    pub time: u64,
}

impl DocumentParams {
    pub fn new(language: Language) -> Self {
        Self {
            font: Font::plain(language),
            language,
            track_changes: false,
            author: 0,
            authors: vec![Author {
                name: "unknown".into(),
            }],
            time: 0,
        }
    }
}

impl Default for DocumentParams {
    fn default() -> Self {
        Self::new(Language::ENGLISH)
    }
}

/// Read-only context threaded through layout computations.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub metrics: &'a dyn FontMetrics,
    pub class: &'a TextClass,
    pub params: &'a DocumentParams,
}

impl core::fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutContext")
            .field("class", &self.class)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Context threaded through editing transactions.
pub struct EditContext<'a> {
    pub metrics: &'a dyn FontMetrics,
    pub class: &'a TextClass,
    pub params: &'a DocumentParams,
    pub undo: &'a mut dyn UndoRecorder,
    /// Font applied to newly typed characters.
    pub current_font: Font,
}

impl<'a> EditContext<'a> {
    pub fn layout(&self) -> LayoutContext<'_> {
        LayoutContext {
            metrics: self.metrics,
            class: self.class,
            params: self.params,
        }
    }
}

impl core::fmt::Debug for EditContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EditContext")
            .field("params", &self.params)
            .field("current_font", &self.current_font)
            .finish_non_exhaustive()
    }
}
