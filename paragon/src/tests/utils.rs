// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::context::{DocumentParams, EditContext, FontMetrics, LayoutContext, NoUndo};
use crate::font::Font;
use crate::style::TextClass;
use crate::text::Text;

/// Fixed-advance metrics: every glyph 10 px wide, 8 px ascent, 2 px
/// descent, independent of font. Keeps expected positions computable by
/// hand.
pub struct MonoMetrics;

impl FontMetrics for MonoMetrics {
    fn width(&self, _c: char, _font: &Font) -> f32 {
        10.0
    }

    fn ascent(&self, _font: &Font) -> f32 {
        8.0
    }

    fn descent(&self, _font: &Font) -> f32 {
        2.0
    }
}

pub struct TestEnv {
    pub metrics: MonoMetrics,
    pub class: TextClass,
    pub params: DocumentParams,
    pub undo: NoUndo,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_class(TextClass::plain())
    }

    pub fn with_class(class: TextClass) -> Self {
        Self {
            metrics: MonoMetrics,
            class,
            params: DocumentParams::default(),
            undo: NoUndo,
        }
    }

    pub fn layout_cx(&self) -> LayoutContext<'_> {
        LayoutContext {
            metrics: &self.metrics,
            class: &self.class,
            params: &self.params,
        }
    }

    pub fn edit_cx(&mut self) -> EditContext<'_> {
        EditContext {
            metrics: &self.metrics,
            class: &self.class,
            params: &self.params,
            undo: &mut self.undo,
            current_font: Font::INHERIT,
        }
    }

    pub fn text(&self, source: &str) -> Text {
        Text::from_plain(source, self.class.default_layout(), Font::INHERIT)
    }
}

/// The surviving document content, paragraphs joined with newlines.
pub fn plain(text: &Text) -> String {
    let mut out = String::new();
    text.plain_text(&mut out);
    out
}
