// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph layout styles and the text class that provides them.
//!
//! A [`TextClass`] is an immutable table of [`LayoutStyle`]s looked up by
//! name. Unknown names recover to the default layout and report a
//! diagnostic instead of failing the load.

use hashbrown::HashMap;

use crate::error::{Diagnostic, DiagnosticKind, ErrorList};
use crate::font::Font;

/// How the left margin of a paragraph is computed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MarginKind {
    /// Base margin plus the layout label, if one is present.
    #[default]
    Dynamic,
    /// The label is typed into the paragraph text and sized by the
    /// paragraph's label-width string.
    Manual,
    /// Base margin scaled down with nesting depth.
    Static,
    /// Margin differs before and after begin-of-body.
    FirstDynamic,
    /// Flushed-right address block; approximated as half the width.
    RightAddressBox,
}

/// Label placement class of a layout.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LabelKind {
    #[default]
    None,
    /// Fixed label string from the layout.
    Static,
    /// Label text typed by the user, terminated at begin-of-body.
    Manual,
    /// Label depends on surrounding context (e.g. captions); such
    /// paragraphs may be broken even when empty.
    Sensitive,
    Top,
    Centered,
    Bibliography,
}

/// Horizontal alignment of rows within a paragraph.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Alignment {
    /// Justified block; extra width is distributed across separators.
    #[default]
    Block,
    Left,
    Right,
    Center,
}

/// Identifier of a layout within its [`TextClass`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct LayoutId(pub(crate) usize);

/// Immutable style attributes of one paragraph layout.
///
/// Margin and indent quantities are stored as strings whose rendered
/// width (in the relevant font) gives the pixel amount, so margins scale
/// with the font metrics provider.
#[derive(Clone, Debug)]
pub struct LayoutStyle {
    pub name: String,
    pub margin: MarginKind,
    pub label: LabelKind,
    /// Body font, realized against outer layers.
    pub font: Font,
    /// Font for the label region.
    pub label_font: Font,
    /// Fixed label text for `LabelKind::Static`.
    pub label_string: String,
    /// Width of this string separates label from body.
    pub label_sep: String,
    pub label_indent: String,
    pub left_margin: String,
    /// Width of this string is the first-line paragraph indent.
    pub par_indent: String,
    pub align: Alignment,
    pub is_environment: bool,
    pub keep_empty: bool,
    pub free_spacing: bool,
    /// Paragraphs with this layout never receive a first-line indent.
    pub never_indent: bool,
    /// Name of the layout that replaces this one, if obsolete.
    pub obsoleted_by: Option<String>,
}

impl LayoutStyle {
    /// A minimal body-text layout with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            margin: MarginKind::Static,
            label: LabelKind::None,
            font: Font::INHERIT,
            label_font: Font::INHERIT,
            label_string: String::new(),
            label_sep: "M".into(),
            label_indent: String::new(),
            left_margin: String::new(),
            par_indent: "MM".into(),
            align: Alignment::Block,
            is_environment: false,
            keep_empty: false,
            free_spacing: false,
            never_indent: false,
            obsoleted_by: None,
        }
    }

    /// Whether paragraphs of this layout may be broken while empty.
    pub fn allows_empty_break(&self) -> bool {
        self.keep_empty || self.label == LabelKind::Sensitive
    }
}

/// The layout table of a document class.
#[derive(Clone, Debug)]
pub struct TextClass {
    layouts: Vec<LayoutStyle>,
    by_name: HashMap<String, LayoutId>,
    default: LayoutId,
}

impl TextClass {
    /// Build a class from its layouts. The first layout is the default.
    ///
    /// # Panics
    ///
    /// Panics if `layouts` is empty; a class without a default layout
    /// cannot recover from unknown layout names.
    pub fn new(layouts: Vec<LayoutStyle>) -> Self {
        assert!(!layouts.is_empty(), "a text class needs a default layout");
        let by_name = layouts
            .iter()
            .enumerate()
            .map(|(i, l)| (l.name.clone(), LayoutId(i)))
            .collect();
        Self {
            layouts,
            by_name,
            default: LayoutId(0),
        }
    }

    /// A single-layout class, handy for tests and plain documents.
    pub fn plain() -> Self {
        Self::new(vec![LayoutStyle::new("Standard")])
    }

    pub fn default_layout(&self) -> LayoutId {
        self.default
    }

    pub fn layout(&self, id: LayoutId) -> &LayoutStyle {
        &self.layouts[id.0]
    }

    /// Look up a layout by name, following the obsoleted-by chain.
    ///
    /// An unknown name (or a cycle in the obsolescence chain) recovers to
    /// the default layout and appends a diagnostic.
    pub fn layout_id(&self, name: &str, errors: &mut ErrorList) -> LayoutId {
        let mut name = name;
        // The chain cannot be longer than the table without a cycle.
        for _ in 0..=self.layouts.len() {
            match self.by_name.get(name) {
                Some(&id) => match &self.layouts[id.0].obsoleted_by {
                    Some(successor) => name = successor,
                    None => return id,
                },
                None => break,
            }
        }
        errors.push(Diagnostic::new(
            DiagnosticKind::UnknownLayout(name.to_owned()),
            None,
        ));
        self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class() -> TextClass {
        let mut old = LayoutStyle::new("Old");
        old.obsoleted_by = Some("New".into());
        TextClass::new(vec![LayoutStyle::new("Standard"), old, LayoutStyle::new("New")])
    }

    #[test]
    fn lookup_follows_obsoleted_by() {
        let class = class();
        let mut errors = ErrorList::default();
        let id = class.layout_id("Old", &mut errors);
        assert_eq!(class.layout(id).name, "New");
        assert!(errors.is_empty());
    }

    #[test]
    fn unknown_layout_recovers_to_default() {
        let class = class();
        let mut errors = ErrorList::default();
        let id = class.layout_id("Missing", &mut errors);
        assert_eq!(id, class.default_layout());
        assert_eq!(errors.len(), 1);
    }
}
