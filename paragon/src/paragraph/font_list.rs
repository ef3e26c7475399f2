// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse run-length storage for per-character font overrides.
//!
//! A span covers the half-open position range from the end of the
//! previous span to its own `end`. Positions past the last span carry no
//! override (the all-inherit font). Spans never overlap and their `end`
//! values are strictly increasing.

use smallvec::SmallVec;

use crate::font::Font;

#[derive(Clone, Debug, PartialEq)]
struct FontSpan {
    /// Exclusive end position.
    end: usize,
    font: Font,
}

/// Run-length font override list of one paragraph.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FontList {
    spans: SmallVec<[FontSpan; 4]>,
}

impl FontList {
    fn span_index(&self, pos: usize) -> Option<usize> {
        self.spans.iter().position(|s| pos < s.end)
    }

    /// The override at `pos`, or the all-inherit font.
    pub(crate) fn get(&self, pos: usize) -> Font {
        match self.span_index(pos) {
            Some(i) => self.spans[i].font,
            None => Font::INHERIT,
        }
    }

    /// Set the override over `[start, end)`.
    pub(crate) fn set_range(&mut self, start: usize, end: usize, font: Font) {
        if start >= end {
            return;
        }
        let mut spans: SmallVec<[FontSpan; 4]> = SmallVec::new();
        let mut prev_end = 0;
        let mut pushed = false;
        for span in self.spans.drain(..) {
            let span_start = prev_end;
            prev_end = span.end;
            // Left remainder of a span overlapping the new range.
            if span_start < start && span.end > start {
                spans.push(FontSpan {
                    end: start,
                    font: span.font,
                });
            } else if span.end <= start {
                spans.push(span);
                continue;
            }
            if !pushed {
                spans.push(FontSpan { end, font });
                pushed = true;
            }
            // Right remainder.
            if span.end > end {
                spans.push(FontSpan {
                    end: span.end,
                    font: span.font,
                });
            }
        }
        if !pushed {
            if start > prev_end {
                spans.push(FontSpan {
                    end: start,
                    font: Font::INHERIT,
                });
            }
            spans.push(FontSpan { end, font });
        }
        self.spans = spans;
        self.coalesce();
    }

    /// Account for one position inserted at `pos`, extending the span
    /// covering it.
    pub(crate) fn insert(&mut self, pos: usize, font: Font) {
        match self.span_index(pos) {
            Some(i) => {
                for span in &mut self.spans[i..] {
                    span.end += 1;
                }
                if self.spans[i].font != font {
                    // Split the covering span around the new position.
                    let start = if i == 0 { 0 } else { self.spans[i - 1].end };
                    let covering = self.spans[i].clone();
                    let mut replacement: SmallVec<[FontSpan; 4]> = SmallVec::new();
                    if pos > start {
                        replacement.push(FontSpan {
                            end: pos,
                            font: covering.font,
                        });
                    }
                    replacement.push(FontSpan { end: pos + 1, font });
                    if covering.end > pos + 1 {
                        replacement.push(FontSpan {
                            end: covering.end,
                            font: covering.font,
                        });
                    }
                    self.spans.remove(i);
                    for (offset, span) in replacement.into_iter().enumerate() {
                        self.spans.insert(i + offset, span);
                    }
                    self.coalesce();
                }
            }
            None => {
                if font != Font::INHERIT {
                    let prev_end = self.spans.last().map(|s| s.end).unwrap_or(0);
                    if pos > prev_end {
                        self.spans.push(FontSpan {
                            end: pos,
                            font: Font::INHERIT,
                        });
                    }
                    self.spans.push(FontSpan {
                        end: pos + 1,
                        font,
                    });
                }
            }
        }
    }

    /// Account for the position at `pos` being erased.
    pub(crate) fn erase(&mut self, pos: usize) {
        if let Some(i) = self.span_index(pos) {
            for span in &mut self.spans[i..] {
                span.end -= 1;
            }
            let start = if i == 0 { 0 } else { self.spans[i - 1].end };
            if self.spans[i].end == start {
                self.spans.remove(i);
            }
            self.coalesce();
        }
    }

    /// Split for a paragraph break at `pos`; returns the tail list
    /// rebased to position zero.
    pub(crate) fn split_at(&mut self, pos: usize) -> Self {
        let mut tail = Self::default();
        let mut head: SmallVec<[FontSpan; 4]> = SmallVec::new();
        for span in self.spans.drain(..) {
            if span.end <= pos {
                head.push(span);
            } else {
                if head.last().map(|s| s.end).unwrap_or(0) < pos {
                    head.push(FontSpan {
                        end: pos,
                        font: span.font,
                    });
                }
                tail.spans.push(FontSpan {
                    end: span.end - pos,
                    font: span.font,
                });
            }
        }
        self.spans = head;
        self.coalesce();
        tail.coalesce();
        tail
    }

    /// Append `other` for a paragraph merge; `offset` is our size.
    pub(crate) fn merge(&mut self, mut other: Self, offset: usize) {
        if other.spans.is_empty() {
            return;
        }
        if self.spans.last().map(|s| s.end).unwrap_or(0) < offset {
            self.spans.push(FontSpan {
                end: offset,
                font: Font::INHERIT,
            });
        }
        for span in other.spans.drain(..) {
            self.spans.push(FontSpan {
                end: span.end + offset,
                font: span.font,
            });
        }
        self.coalesce();
    }

    fn coalesce(&mut self) {
        self.spans.dedup_by(|next, prev| {
            if next.font == prev.font {
                prev.end = next.end;
                true
            } else {
                false
            }
        });
    }
}
