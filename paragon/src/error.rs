// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable load-time diagnostics.
//!
//! Malformed persisted input never aborts a load; the reader substitutes
//! a safe default and appends a [`Diagnostic`] here. Programming
//! invariants are asserted instead, and user-level refusals are silent
//! no-ops.

use core::fmt;
use core::ops::Range;

use thiserror::Error;

/// The kinds of malformed input the read path recovers from.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum DiagnosticKind {
    #[error("unknown layout `{0}`, using the default layout")]
    UnknownLayout(String),
    #[error("unknown token `{0}`")]
    UnknownToken(String),
    #[error("change record references unknown author {0}")]
    BadAuthor(usize),
}

/// Location of a diagnostic within the document, when known.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DiagnosticSpan {
    /// Paragraph index.
    pub par: usize,
    /// Position range within the paragraph.
    pub range: Range<usize>,
}

/// One recovered error: kind, human message and optional span.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Option<DiagnosticSpan>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Option<DiagnosticSpan>) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some(span) => write!(
                f,
                "{} (paragraph {}, positions {}..{})",
                self.message, span.par, span.range.start, span.range.end
            ),
            None => f.write_str(&self.message),
        }
    }
}

/// Accumulator for diagnostics over one load.
#[derive(Clone, Debug, Default)]
pub struct ErrorList {
    entries: Vec<Diagnostic>,
}

impl ErrorList {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}
