// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The left-margin calculator.
//!
//! Pure function of (paragraph state, layout, width): given the same
//! inputs it must always produce the same pixel offset, since both the
//! row breaker and the painters call it independently.

use crate::context::LayoutContext;
use crate::inset::DisplayStyle;
use crate::style::{Alignment, LabelKind, MarginKind};
use crate::text::Text;

/// Left margin of paragraph `pit` at `pos`, in pixels.
pub fn left_margin(
    text: &Text,
    cx: &LayoutContext<'_>,
    max_width: f32,
    pit: usize,
    pos: usize,
) -> f32 {
    let par = text.par(pit);
    let layout = cx.class.layout(par.params.layout);
    let body = par.begin_of_body(layout);
    let metrics = cx.metrics;
    let label_font = text.font_at(cx, pit, 0);
    let base_font = &cx.params.font;

    let mut margin = 0.0;

    match layout.margin {
        MarginKind::Dynamic => {
            margin += metrics.string_width(&layout.left_margin, base_font);
            if !layout.label_string.is_empty() {
                margin += metrics.string_width(&layout.label_indent, base_font);
                margin += metrics.string_width(&layout.label_string, &label_font);
                margin += metrics.string_width(&layout.label_sep, &label_font);
            }
        }
        MarginKind::Manual => {
            margin += metrics.string_width(&layout.label_indent, base_font);
            // The label itself is part of the text; only body positions
            // are pushed past the reserved label width.
            if pos >= body && !par.is_empty() {
                margin += metrics.string_width(&par.params.label_width_string, &label_font);
                margin += metrics.string_width(&layout.label_sep, &label_font);
            }
        }
        MarginKind::Static => {
            let base = metrics.string_width(&layout.left_margin, base_font);
            // Diminishing margin with nesting depth; intentional.
            margin += base * 4.0 / (par.params.depth as f32 + 4.0);
        }
        MarginKind::FirstDynamic => {
            let exempt = matches!(
                layout.label,
                LabelKind::Top | LabelKind::Centered | LabelKind::Bibliography
            );
            if pos >= body || exempt {
                margin += metrics.string_width(&layout.left_margin, base_font);
            } else {
                margin += metrics.string_width(&layout.label_indent, base_font);
            }
        }
        MarginKind::RightAddressBox => {
            // The ideal computation would size against the widest row;
            // this is the acknowledged simplification.
            margin += max_width / 2.0;
        }
    }

    // Nested environments inherit the margin of the paragraph that
    // opened them.
    if let Some(outer) = text.outer_hook(pit) {
        margin += left_margin(text, cx, max_width, outer, text.par(outer).size());
    }

    // Explicit per-paragraph indent.
    margin += par.params.left_indent;

    // First-line paragraph indent.
    if pos == 0
        && par.effective_align(layout) == Alignment::Block
        && !par.params.noindent
        && !layout.never_indent
        && !first_cell_is_display_inset(text, pit)
    {
        margin += metrics.string_width(&layout.par_indent, base_font);
    }

    margin
}

fn first_cell_is_display_inset(text: &Text, pit: usize) -> bool {
    text.par(pit)
        .inset_at(0)
        .is_some_and(|inset| inset.display() == DisplayStyle::Block)
}
