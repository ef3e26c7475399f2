// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font descriptions and the inherit-merge cascade.
//!
//! Every attribute of a [`Font`] is tri-state: a concrete value or
//! [inherit](FontInherit::is_inherit). Resolution layers a per-character
//! override against the layout font, the fonts of enclosing environments
//! and finally the document default, which must be fully concrete.

use core::fmt;

/// Font family selector.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum Family {
    #[default]
    Inherit,
    Roman,
    Sans,
    Typewriter,
}

/// Font weight class.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum Series {
    #[default]
    Inherit,
    Medium,
    Bold,
}

/// Glyph shape class.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum Shape {
    #[default]
    Inherit,
    Upright,
    Italic,
    Slanted,
    SmallCaps,
}

/// Relative font size step.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum FontSize {
    #[default]
    Inherit,
    Tiny,
    Small,
    Normal,
    Large,
    Huge,
}

/// A language tag with its writing direction.
///
/// The direction is what the layout engine actually consumes; the code is
/// carried for spell-checking and export collaborators.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Language {
    pub code: &'static str,
    pub rtl: bool,
}

impl Language {
    pub const ENGLISH: Self = Self {
        code: "en",
        rtl: false,
    };
    pub const HEBREW: Self = Self {
        code: "he",
        rtl: true,
    };
    pub const ARABIC: Self = Self {
        code: "ar",
        rtl: true,
    };
}

trait FontInherit {
    fn is_inherit(&self) -> bool;
}

macro_rules! impl_inherit {
    ($($ty:ident),*) => {
        $(impl FontInherit for $ty {
            fn is_inherit(&self) -> bool {
                matches!(self, Self::Inherit)
            }
        })*
    };
}

impl_inherit!(Family, Series, Shape, FontSize);

/// A possibly partial font description.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Font {
    pub family: Family,
    pub series: Series,
    pub shape: Shape,
    pub size: FontSize,
    /// `None` means "inherit the language".
    pub language: Option<Language>,
}

impl Font {
    /// The all-inherit font, used as the neutral per-character override.
    pub const INHERIT: Self = Self {
        family: Family::Inherit,
        series: Series::Inherit,
        shape: Shape::Inherit,
        size: FontSize::Inherit,
        language: None,
    };

    /// A fully concrete font suitable as a document default.
    pub fn plain(language: Language) -> Self {
        Self {
            family: Family::Roman,
            series: Series::Medium,
            shape: Shape::Upright,
            size: FontSize::Normal,
            language: Some(language),
        }
    }

    /// Fill every inherited attribute from `outer`. Attributes already
    /// set are never overridden.
    pub fn realize(&mut self, outer: &Self) {
        if self.family.is_inherit() {
            self.family = outer.family;
        }
        if self.series.is_inherit() {
            self.series = outer.series;
        }
        if self.shape.is_inherit() {
            self.shape = outer.shape;
        }
        if self.size.is_inherit() {
            self.size = outer.size;
        }
        if self.language.is_none() {
            self.language = outer.language;
        }
    }

    /// Whether every attribute has a concrete value.
    pub fn is_resolved(&self) -> bool {
        !self.family.is_inherit()
            && !self.series.is_inherit()
            && !self.shape.is_inherit()
            && !self.size.is_inherit()
            && self.language.is_some()
    }

    /// The resolved language, defaulting to English for unresolved fonts.
    ///
    /// Cascade resolution always realizes against the document font, so a
    /// `None` here only occurs on fonts that never went through
    /// [`realize`](Self::realize).
    pub fn language_or_default(&self) -> Language {
        self.language.unwrap_or(Language::ENGLISH)
    }

    /// Direction of the resolved language.
    pub fn is_rtl(&self) -> bool {
        self.language_or_default().rtl
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("family", &self.family)
            .field("series", &self.series)
            .field("shape", &self.shape)
            .field("size", &self.size)
            .field("language", &self.language.map(|l| l.code))
            .finish()
    }
}
