// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed capability interface for embedded objects.
//!
//! An inset occupies one position in a paragraph. The text engine treats
//! every kind uniformly through [`Inset`]; nothing downcasts beyond the
//! [`as_text`](Inset::as_text) accessor the cursor uses to descend into
//! editable insets.

use core::fmt::Debug;

use crate::context::LayoutContext;
use crate::layout::Dimension;
use crate::text::Text;

/// Whether an inset flows inline with text or breaks the row.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DisplayStyle {
    #[default]
    Inline,
    /// The row breaker places boundaries before and after the inset.
    Block,
}

/// Painter primitives an inset may draw with. Backends implement this;
/// the engine itself never draws.
pub trait InsetPainter {
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn text(&mut self, x: f32, y: f32, s: &str, font: &crate::font::Font);
}

/// Capability set of an embedded object.
pub trait Inset: Debug {
    /// Dimensions when laid out into at most `max_width` pixels.
    fn metrics(&self, cx: &LayoutContext<'_>, max_width: f32) -> Dimension;

    /// Draw at the given baseline origin.
    fn draw(&self, painter: &mut dyn InsetPainter, cx: &LayoutContext<'_>, x: f32, y: f32);

    /// Whether the cursor may enter this inset.
    fn editable(&self) -> bool {
        false
    }

    fn display(&self) -> DisplayStyle {
        DisplayStyle::Inline
    }

    /// Behaves like a character for word movement and deletion.
    fn is_char(&self) -> bool {
        false
    }

    /// Counts as a letter for word classification.
    fn is_letter(&self) -> bool {
        false
    }

    /// The nested text, for insets the cursor can descend into.
    fn as_text(&self) -> Option<&InsetText> {
        None
    }

    fn as_text_mut(&mut self) -> Option<&mut InsetText> {
        None
    }

    /// Clone into a box; insets live in paragraphs, which are `Clone`.
    fn clone_box(&self) -> Box<dyn Inset>;

    /// Append a plain-text rendition, used for extraction and labels.
    fn plain_text(&self, out: &mut String);
}

impl Clone for Box<dyn Inset> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// An editable inset holding its own paragraph sequence.
///
/// This is the recursion point of the document model: the cursor stack
/// pushes a frame when it enters one of these.
#[derive(Clone, Debug, Default)]
pub struct InsetText {
    pub text: Text,
    pub display: DisplayStyle,
}

impl InsetText {
    pub fn new(text: Text) -> Self {
        Self {
            text,
            display: DisplayStyle::Inline,
        }
    }

    pub fn display(text: Text) -> Self {
        Self {
            text,
            display: DisplayStyle::Block,
        }
    }
}

impl Inset for InsetText {
    fn metrics(&self, cx: &LayoutContext<'_>, max_width: f32) -> Dimension {
        // Fresh layout per query; the enclosing paragraph's metrics cache
        // bounds how often this runs.
        let mut layout = crate::layout::TextLayout::new(max_width);
        let dim = layout.text_dimension(&self.text, cx);
        Dimension {
            width: dim.width,
            ascent: dim.ascent,
            descent: dim.descent,
        }
    }

    fn draw(&self, painter: &mut dyn InsetPainter, cx: &LayoutContext<'_>, x: f32, y: f32) {
        let dim = self.metrics(cx, f32::INFINITY);
        painter.rect(x, y - dim.ascent, dim.width, dim.ascent + dim.descent);
    }

    fn editable(&self) -> bool {
        true
    }

    fn display(&self) -> DisplayStyle {
        self.display
    }

    fn as_text(&self) -> Option<&InsetText> {
        Some(self)
    }

    fn as_text_mut(&mut self) -> Option<&mut InsetText> {
        Some(self)
    }

    fn clone_box(&self) -> Box<dyn Inset> {
        Box::new(self.clone())
    }

    fn plain_text(&self, out: &mut String) {
        self.text.plain_text(out);
    }
}

/// A fixed-size opaque object, e.g. a graphic placeholder.
#[derive(Clone, Debug)]
pub struct InsetBox {
    pub dim: Dimension,
    pub display: DisplayStyle,
}

impl Inset for InsetBox {
    fn metrics(&self, _cx: &LayoutContext<'_>, _max_width: f32) -> Dimension {
        self.dim
    }

    fn draw(&self, painter: &mut dyn InsetPainter, _cx: &LayoutContext<'_>, x: f32, y: f32) {
        painter.rect(
            x,
            y - self.dim.ascent,
            self.dim.width,
            self.dim.ascent + self.dim.descent,
        );
    }

    fn display(&self) -> DisplayStyle {
        self.display
    }

    fn is_char(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Inset> {
        Box::new(self.clone())
    }

    fn plain_text(&self, out: &mut String) {
        out.push('\u{fffc}');
    }
}
