// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::cursor::DocCursor;
use crate::editing::{
    accept_or_reject_changes, backspace, break_paragraph, change_case, chars_transpose,
    delete_empty_paragraph_mechanism, delete_empty_paragraphs, delete_word_backward, dispatch,
    erase, erase_selection, insert_char, CaseMode, EditCommand, Update,
};
use crate::font::{Font, Language};
use crate::layout::TextLayout;
use crate::text::{CursorPos, DocRange};

use super::utils::{plain, TestEnv};

#[test]
fn typing_builds_a_paragraph() {
    let mut env = TestEnv::new();
    let mut cx = env.edit_cx();
    let mut text = crate::text::Text::new(cx.class.default_layout());
    let mut cur = DocCursor::new();
    for c in "hi there".chars() {
        assert!(insert_char(&mut text, &mut cx, &mut cur, c));
    }
    assert_eq!(plain(&text), "hi there");
    assert_eq!(cur.pos(), 8);
}

#[test]
fn space_refusals() {
    let mut env = TestEnv::new();
    let mut cx = env.edit_cx();
    let mut text = crate::text::Text::new(cx.class.default_layout());
    let mut cur = DocCursor::new();

    // No space at paragraph start.
    assert!(!insert_char(&mut text, &mut cx, &mut cur, ' '));
    assert!(insert_char(&mut text, &mut cx, &mut cur, 'a'));
    assert!(insert_char(&mut text, &mut cx, &mut cur, ' '));
    // No doubled space while typing.
    assert!(!insert_char(&mut text, &mut cx, &mut cur, ' '));
    assert_eq!(plain(&text), "a ");
}

#[test]
fn loaded_double_space_collapses_under_depm() {
    let mut env = TestEnv::new();
    let mut text = env.text("Hello  world");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();

    // The cursor between the two spaces: typing another is refused.
    cur.set(0, 6, false);
    assert!(!insert_char(&mut text, &mut cx, &mut cur, ' '));

    // The loaded doubled pair goes away the next time the cleanup runs.
    let range = DocRange::new(CursorPos::new(0, 0), text.end_pos());
    assert!(delete_empty_paragraphs(&mut text, &mut cx, &mut cur, range));
    assert_eq!(plain(&text), "Hello world");
    // Fixed point: a second pass has nothing left to do.
    let range = DocRange::new(CursorPos::new(0, 0), text.end_pos());
    assert!(!delete_empty_paragraphs(&mut text, &mut cx, &mut cur, range));
}

#[test]
fn break_splits_at_the_cursor() {
    let mut env = TestEnv::new();
    let mut text = env.text("abcdef");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(0, 3, false);

    assert!(break_paragraph(&mut text, &mut cx, &mut cur, false));
    assert_eq!(text.len(), 2);
    assert_eq!(plain(&text), "abc\ndef");
    assert_eq!(cur.cursor_pos(), CursorPos::new(1, 0));
}

#[test]
fn break_refuses_on_empty_paragraph() {
    let mut env = TestEnv::new();
    let mut text = env.text("");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    assert!(!break_paragraph(&mut text, &mut cx, &mut cur, false));
    assert_eq!(text.len(), 1);
}

#[test]
fn break_allowed_on_empty_keepempty_paragraph() {
    let mut env = {
        let mut layout = crate::style::LayoutStyle::new("Caption");
        layout.keep_empty = true;
        TestEnv::with_class(crate::style::TextClass::new(vec![layout]))
    };
    let mut text = env.text("");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    assert!(break_paragraph(&mut text, &mut cx, &mut cur, false));
    assert_eq!(text.len(), 2);
    // The cursor stays with the original (now second) paragraph.
    assert_eq!(cur.cursor_pos(), CursorPos::new(1, 0));
}

#[test]
fn break_erases_the_separator_at_the_break_point() {
    let mut env = TestEnv::new();
    let mut text = env.text("one two");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(0, 4, false);
    assert!(break_paragraph(&mut text, &mut cx, &mut cur, false));
    assert_eq!(plain(&text), "one\ntwo");
}

#[test]
fn environment_layout_of_the_tail_follows_inverse_logic() {
    let mut env = {
        let standard = crate::style::LayoutStyle::new("Standard");
        let mut quote = crate::style::LayoutStyle::new("Quote");
        quote.is_environment = true;
        TestEnv::with_class(crate::style::TextClass::new(vec![standard, quote]))
    };
    let mut errors = crate::error::ErrorList::default();
    let quote_id = env.class.layout_id("Quote", &mut errors);
    let default_id = env.class.default_layout();

    let mut text = env.text("quoted text");
    text.par_mut(0).params.layout = quote_id;
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(0, 6, false);
    assert!(break_paragraph(&mut text, &mut cx, &mut cur, false));
    // Environments keep their layout across a plain break.
    assert_eq!(text.par(1).params.layout, quote_id);

    // With inverse logic the tail drops to the default layout.
    let mut text = env.text("quoted text");
    text.par_mut(0).params.layout = quote_id;
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(0, 6, false);
    assert!(break_paragraph(&mut text, &mut cx, &mut cur, true));
    assert_eq!(text.par(1).params.layout, default_id);
}

#[test]
fn backspace_merges_and_deletes() {
    let mut env = TestEnv::new();
    let mut text = env.text("ab\ncd");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(1, 0, false);

    assert!(backspace(&mut text, &mut cx, &mut cur));
    assert_eq!(text.len(), 1);
    assert_eq!(plain(&text), "abcd");
    assert_eq!(cur.cursor_pos(), CursorPos::new(0, 2));

    assert!(backspace(&mut text, &mut cx, &mut cur));
    assert_eq!(plain(&text), "acd");
    assert_eq!(cur.pos(), 1);

    cur.set(0, 0, false);
    assert!(!backspace(&mut text, &mut cx, &mut cur));
}

#[test]
fn backspace_at_pos0_drops_an_empty_paragraph() {
    let mut env = TestEnv::new();
    let mut text = env.text("ab\n\ncd");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(2, 0, false);

    // The empty middle paragraph is removed, not merged through.
    assert!(backspace(&mut text, &mut cx, &mut cur));
    assert_eq!(text.len(), 2);
    assert_eq!(plain(&text), "ab\ncd");
    assert_eq!(cur.cursor_pos(), CursorPos::new(1, 0));
}

#[test]
fn tracked_backspace_marks_the_break_deleted() {
    let mut env = TestEnv::new();
    env.params.track_changes = true;
    let mut text = env.text("ab\ncd");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(1, 0, false);

    assert!(backspace(&mut text, &mut cx, &mut cur));
    assert_eq!(text.len(), 2, "the break stays, pending review");
    assert!(text.par(0).end_mark().is_deleted());
    assert_eq!(cur.cursor_pos(), CursorPos::new(0, 2));
}

#[test]
fn tracked_erase_marks_and_steps_over() {
    let mut env = TestEnv::new();
    env.params.track_changes = true;
    let mut text = env.text("abc");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(0, 1, false);

    assert!(erase(&mut text, &mut cx, &mut cur));
    assert_eq!(text.par(0).size(), 3);
    assert!(text.par(0).is_deleted(1));
    assert_eq!(cur.pos(), 2, "stepped over the pending deletion");
    assert_eq!(plain(&text), "ac");
}

#[test]
fn depm_removes_the_vacated_empty_paragraph() {
    let mut env = TestEnv::new();
    let mut text = env.text("ab\n\ncd");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    // The cursor was in the empty paragraph 1 and moved to paragraph 2.
    cur.set(2, 0, false);
    assert!(delete_empty_paragraph_mechanism(
        &mut text,
        &mut cx,
        &mut cur,
        CursorPos::new(1, 0),
    ));
    assert_eq!(text.len(), 2);
    assert_eq!(plain(&text), "ab\ncd");
    assert_eq!(cur.cursor_pos(), CursorPos::new(1, 0), "index shifted down");
}

#[test]
fn depm_collapses_the_doubled_separator_left_behind() {
    let mut env = TestEnv::new();
    let mut text = env.text("a  b");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(0, 0, false);
    assert!(delete_empty_paragraph_mechanism(
        &mut text,
        &mut cx,
        &mut cur,
        CursorPos::new(0, 2),
    ));
    assert_eq!(plain(&text), "a b");
}

#[test]
fn depm_strips_leading_spaces_of_a_left_paragraph() {
    let mut env = TestEnv::new();
    let mut text = env.text("  ab\ncd");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(1, 0, false);
    assert!(delete_empty_paragraph_mechanism(
        &mut text,
        &mut cx,
        &mut cur,
        CursorPos::new(0, 0),
    ));
    assert_eq!(plain(&text), "ab\ncd");
}

#[test]
fn erase_selection_spans_paragraphs() {
    let mut env = TestEnv::new();
    let mut text = env.text("abc\ndef\nghi");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.anchor = Some(CursorPos::new(0, 2));
    cur.set(2, 1, false);

    assert!(erase_selection(&mut text, &mut cx, &mut cur));
    assert_eq!(text.len(), 1);
    assert_eq!(plain(&text), "abhi");
    assert_eq!(cur.cursor_pos(), CursorPos::new(0, 2));
    assert!(cur.selection().is_none());
}

#[test]
fn tracked_erase_selection_marks_everything() {
    let mut env = TestEnv::new();
    env.params.track_changes = true;
    let mut text = env.text("abc\ndef");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.anchor = Some(CursorPos::new(0, 2));
    cur.set(1, 1, false);

    assert!(erase_selection(&mut text, &mut cx, &mut cur));
    // Nothing is removed yet; content and break await review.
    assert_eq!(text.len(), 2);
    assert!(text.par(0).is_deleted(2));
    assert!(text.par(0).end_mark().is_deleted());
    assert!(text.par(1).is_deleted(0));
    assert!(!text.par(1).is_deleted(1));
    assert_eq!(plain(&text), "ab\nef");
    assert_eq!(cur.cursor_pos(), CursorPos::new(0, 2));
}

#[test]
fn dispatch_backspace_consumes_the_selection() {
    let mut env = TestEnv::new();
    let mut text = env.text("hello world");
    let mut cx = env.edit_cx();
    let mut layout = TextLayout::new(500.0);
    let mut cur = DocCursor::new();
    cur.anchor = Some(CursorPos::new(0, 5));
    cur.set(0, 11, false);

    let res = dispatch(&mut text, &mut cx, &mut layout, &mut cur, EditCommand::Backspace);
    assert!(res.dispatched);
    assert_eq!(plain(&text), "hello");
    assert_eq!(cur.pos(), 5);
    assert!(cur.selection().is_none());
}

#[test]
fn accept_over_selection_cleans_up() {
    let mut env = TestEnv::new();
    env.params.track_changes = true;
    let mut text = env.text("keep\ngone");
    for pos in 0..4 {
        text.par_mut(1).set_change(pos, crate::paragraph::Change::deleted(0, 1));
    }
    text.par_mut(0).set_end_mark(crate::paragraph::Change::deleted(0, 1));
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.anchor = Some(CursorPos::new(0, 0));
    cur.set(1, 4, false);

    assert!(accept_or_reject_changes(&mut text, &mut cx, &mut cur, true));
    assert_eq!(plain(&text), "keep");
    assert_eq!(text.len(), 1);
    assert!(cur.selection().is_none());
    assert!(cur.pos() <= text.par(0).size());
}

#[test]
fn change_case_over_selection() {
    let mut env = TestEnv::new();
    let mut text = env.text("hello world");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.anchor = Some(CursorPos::new(0, 0));
    cur.set(0, 5, false);

    assert!(change_case(&mut text, &mut cx, &mut cur, CaseMode::Upper));
    assert_eq!(plain(&text), "HELLO world");
}

#[test]
fn change_case_without_selection_takes_the_word_tail() {
    let mut env = TestEnv::new();
    let mut text = env.text("hello world");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(0, 8, false);
    assert!(change_case(&mut text, &mut cx, &mut cur, CaseMode::Upper));
    assert_eq!(plain(&text), "hello woRLD");
    assert_eq!(cur.pos(), 11);
}

#[test]
fn capitalize_uppercases_word_initials_only() {
    let mut env = TestEnv::new();
    let mut text = env.text("two words");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.anchor = Some(CursorPos::new(0, 0));
    cur.set(0, 9, false);
    assert!(change_case(&mut text, &mut cx, &mut cur, CaseMode::Capitalize));
    assert_eq!(plain(&text), "Two Words");
}

#[test]
fn tracked_change_case_inserts_before_erasing() {
    let mut env = TestEnv::new();
    env.params.track_changes = true;
    let mut text = env.text("abc");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.anchor = Some(CursorPos::new(0, 0));
    cur.set(0, 3, false);

    assert!(change_case(&mut text, &mut cx, &mut cur, CaseMode::Upper));
    // Both the new and the old run are present, old one pending delete.
    assert_eq!(text.par(0).size(), 6);
    assert_eq!(plain(&text), "ABC");
    assert!(text.par(0).is_inserted(0));
    assert!(text.par(0).is_deleted(3));
    // The selection end was re-expanded past the insertions.
    assert_eq!(cur.pos(), 6);
}

#[test]
fn change_case_of_pending_insertions_replaces_them() {
    let mut env = TestEnv::new();
    env.params.track_changes = true;
    let mut cx = env.edit_cx();
    let mut text = crate::text::Text::new(cx.class.default_layout());
    let mut cur = DocCursor::new();
    for c in "ab".chars() {
        assert!(insert_char(&mut text, &mut cx, &mut cur, c));
    }
    cur.anchor = Some(CursorPos::new(0, 0));
    cur.set(0, 2, false);

    assert!(change_case(&mut text, &mut cx, &mut cur, CaseMode::Upper));
    // The old run was itself pending insertion, so no deletion marks
    // survive it.
    assert_eq!(text.par(0).size(), 2);
    assert_eq!(plain(&text), "AB");
    assert!(text.par(0).is_inserted(0));
    assert!(text.par(0).is_inserted(1));
    assert_eq!(cur.pos(), 2);
}

#[test]
fn transpose_of_pending_insertions_keeps_the_cursor_in_range() {
    let mut env = TestEnv::new();
    env.params.track_changes = true;
    let mut cx = env.edit_cx();
    let mut text = crate::text::Text::new(cx.class.default_layout());
    let mut cur = DocCursor::new();
    for c in "ab".chars() {
        assert!(insert_char(&mut text, &mut cx, &mut cur, c));
    }
    cur.set(0, 1, false);

    assert!(chars_transpose(&mut text, &mut cx, &mut cur));
    assert_eq!(plain(&text), "ba");
    assert_eq!(text.par(0).size(), 2);
    assert!(cur.pos() <= text.par(0).size());
    // Typing right after the transposition must stay in range.
    assert!(insert_char(&mut text, &mut cx, &mut cur, 'c'));
    assert_eq!(plain(&text), "bac");
}

#[test]
fn transpose_swaps_around_the_cursor() {
    let mut env = TestEnv::new();
    let mut text = env.text("abcd");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(0, 2, false);
    assert!(chars_transpose(&mut text, &mut cx, &mut cur));
    assert_eq!(plain(&text), "acbd");
    assert_eq!(cur.pos(), 3);

    cur.set(0, 0, false);
    assert!(!chars_transpose(&mut text, &mut cx, &mut cur));
}

#[test]
fn transpose_skips_deleted_positions() {
    let mut env = TestEnv::new();
    let mut text = env.text("axb");
    text.par_mut(0).set_change(1, crate::paragraph::Change::deleted(0, 1));
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(0, 1, false);
    assert!(chars_transpose(&mut text, &mut cx, &mut cur));
    assert_eq!(plain(&text), "ba");
}

#[test]
fn delete_word_backward_takes_the_previous_word() {
    let mut env = TestEnv::new();
    let mut text = env.text("one two");
    let mut cx = env.edit_cx();
    let mut cur = DocCursor::new();
    cur.set(0, 7, false);
    assert!(delete_word_backward(&mut text, &mut cx, &mut cur));
    assert_eq!(plain(&text), "one ");
    assert_eq!(cur.pos(), 4);
}

#[test]
fn separator_between_directions_takes_the_base_language() {
    let mut env = TestEnv::new();
    let mut cx = env.edit_cx();
    let mut text = crate::text::Text::new(cx.class.default_layout());
    let mut cur = DocCursor::new();
    for c in "abc ".chars() {
        assert!(insert_char(&mut text, &mut cx, &mut cur, c));
    }
    // The Hebrew word arrives in a Hebrew font.
    cx.current_font.language = Some(Language::HEBREW);
    assert!(insert_char(&mut text, &mut cx, &mut cur, 'א'));

    // Once both neighbors exist the separator belongs to the paragraph
    // base language, not to the word typed last.
    assert_eq!(
        text.par(0).font_override(3).language,
        Some(Language::ENGLISH)
    );
    assert_eq!(text.par(0).font_override(4).language, Some(Language::HEBREW));
}

#[test]
fn separator_between_same_direction_words_keeps_its_language() {
    let mut env = TestEnv::new();
    let mut cx = env.edit_cx();
    let mut text = crate::text::Text::new(cx.class.default_layout());
    let mut cur = DocCursor::new();
    for c in "ab".chars() {
        assert!(insert_char(&mut text, &mut cx, &mut cur, c));
    }
    cx.current_font.language = Some(Language::HEBREW);
    assert!(insert_char(&mut text, &mut cx, &mut cur, ' '));
    cx.current_font = Font::INHERIT;
    assert!(insert_char(&mut text, &mut cx, &mut cur, 'c'));
    // Neighbors agree in direction; the space keeps its typed language.
    assert_eq!(text.par(0).font_override(2).language, Some(Language::HEBREW));
}

#[test]
fn dispatch_reports_update_scope() {
    let mut env = TestEnv::new();
    let mut cx = env.edit_cx();
    let mut text = crate::text::Text::new(cx.class.default_layout());
    let mut layout = TextLayout::new(200.0);
    let mut cur = DocCursor::new();

    let res = dispatch(&mut text, &mut cx, &mut layout, &mut cur, EditCommand::InsertChar('x'));
    assert!(res.dispatched);
    assert_eq!(res.update, Update::Partial);

    let res = dispatch(
        &mut text,
        &mut cx,
        &mut layout,
        &mut cur,
        EditCommand::BreakParagraph { inverse_logic: false },
    );
    assert!(res.dispatched);
    assert_eq!(res.update, Update::Full);

    // A refused space is consumed but changes nothing.
    let res = dispatch(&mut text, &mut cx, &mut layout, &mut cur, EditCommand::InsertChar(' '));
    assert!(res.dispatched);
    assert_eq!(res.update, Update::None);

    // Falling off the document edge is undispatched.
    let res = dispatch(&mut text, &mut cx, &mut layout, &mut cur, EditCommand::MoveRight);
    assert!(!res.dispatched);
}

#[test]
fn dispatch_runs_depm_when_leaving_a_paragraph() {
    let mut env = TestEnv::new();
    let mut text = env.text("ab\n\ncd");
    let mut cx = env.edit_cx();
    let mut layout = TextLayout::new(200.0);
    let mut cur = DocCursor::new();
    cur.set(1, 0, false);

    let res = dispatch(&mut text, &mut cx, &mut layout, &mut cur, EditCommand::MoveDown);
    assert!(res.dispatched);
    assert_eq!(res.update, Update::Full, "the vacated empty paragraph went away");
    assert_eq!(text.len(), 2);
    assert_eq!(plain(&text), "ab\ncd");
}
