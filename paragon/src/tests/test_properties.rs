// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use proptest::prelude::*;

use crate::cursor::DocCursor;
use crate::editing::{backspace, chars_transpose, delete_empty_paragraphs, insert_char};
use crate::layout::{Row, RowBidi, TextLayout};
use crate::text::{CursorPos, DocRange};

use super::utils::{plain, TestEnv};

/// Letters, Hebrew letters and separators mixed freely.
fn mixed_chars() -> impl Strategy<Value = String> {
    prop::collection::vec(0u8..3, 1..16).prop_map(|kinds| {
        kinds
            .into_iter()
            .map(|k| match k {
                0 => 'a',
                1 => 'א',
                _ => ' ',
            })
            .collect()
    })
}

fn word_and_pos() -> impl Strategy<Value = (String, usize)> {
    "[a-z]{2,12}".prop_flat_map(|s| {
        let len = s.len();
        (Just(s), 1..len)
    })
}

proptest! {
    #[test]
    fn rows_always_tile(s in "[ a-z]{0,60}", width in 30.0f32..400.0) {
        let env = TestEnv::new();
        let cx = env.layout_cx();
        let text = env.text(&s);
        let mut layout = TextLayout::new(width);
        layout.ensure(&text, &cx, 0);
        let pm = layout.par_metrics(0).unwrap();
        let size = text.par(0).size();
        let mut expected = 0;
        for row in &pm.rows {
            if row.range.is_empty() {
                prop_assert_eq!(row.range.start, size);
                continue;
            }
            prop_assert_eq!(row.range.start, expected);
            prop_assert!(row.range.end > row.range.start);
            expected = row.range.end;
        }
        prop_assert_eq!(expected, size);
    }

    #[test]
    fn bidi_permutation_is_a_bijection(s in mixed_chars()) {
        let env = TestEnv::new();
        let cx = env.layout_cx();
        let text = env.text(&s);
        let size = text.par(0).size();
        let row = Row {
            range: 0..size,
            ..Row::default()
        };
        let bidi = RowBidi::compute(&text, &cx, 0, &row);
        let mut seen = vec![false; size];
        for pos in 0..size {
            let v = bidi.log2vis(pos);
            prop_assert!(!seen[v], "two positions map to visual {}", v);
            seen[v] = true;
            prop_assert_eq!(bidi.vis2log(v), pos);
        }
    }

    #[test]
    fn cursor_x_round_trips_for_any_direction_mix(s in mixed_chars()) {
        let env = TestEnv::new();
        let cx = env.layout_cx();
        let text = env.text(&s);
        let mut layout = TextLayout::new(10_000.0);
        layout.ensure(&text, &cx, 0);
        for pos in 0..=text.par(0).size() {
            let x = layout.cursor_x(&text, &cx, 0, pos, false);
            let (near, boundary) = layout.column_near_x(&text, &cx, 0, 0, x);
            let back = layout.cursor_x(&text, &cx, 0, near, boundary);
            prop_assert!((back - x).abs() < 0.5, "pos {}: {} vs {}", pos, back, x);
        }
    }

    #[test]
    fn typing_then_backspacing_leaves_nothing(s in "[a-z]{0,20}") {
        let mut env = TestEnv::new();
        let mut cx = env.edit_cx();
        let mut text = crate::text::Text::new(cx.class.default_layout());
        let mut cur = DocCursor::new();
        for c in s.chars() {
            prop_assert!(insert_char(&mut text, &mut cx, &mut cur, c));
        }
        prop_assert_eq!(plain(&text), s.clone());
        for _ in 0..s.chars().count() {
            prop_assert!(backspace(&mut text, &mut cx, &mut cur));
        }
        prop_assert!(text.par(0).is_really_empty());
        prop_assert_eq!(cur.cursor_pos(), CursorPos::new(0, 0));
    }

    #[test]
    fn transposing_twice_restores_the_word((s, pos) in word_and_pos()) {
        let mut env = TestEnv::new();
        let mut text = env.text(&s);
        let mut cx = env.edit_cx();
        let mut cur = DocCursor::new();
        cur.set(0, pos, false);
        prop_assert!(chars_transpose(&mut text, &mut cx, &mut cur));
        cur.set(0, pos, false);
        prop_assert!(chars_transpose(&mut text, &mut cx, &mut cur));
        prop_assert_eq!(plain(&text), s);
    }

    #[test]
    fn separator_cleanup_reaches_a_fixed_point(s in "[ a-z]{0,30}") {
        let mut env = TestEnv::new();
        let mut text = env.text(&s);
        let mut cx = env.edit_cx();
        let mut cur = DocCursor::new();
        let range = DocRange::new(CursorPos::new(0, 0), text.end_pos());
        delete_empty_paragraphs(&mut text, &mut cx, &mut cur, range);
        let settled = plain(&text);
        let range = DocRange::new(CursorPos::new(0, 0), text.end_pos());
        prop_assert!(!delete_empty_paragraphs(&mut text, &mut cx, &mut cur, range));
        prop_assert!(!settled.contains("  "));
        prop_assert_eq!(plain(&text), settled);
    }
}
