// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line breaking, justification and glyph placement.

mod alignment;
mod draw;
mod journal;
mod line_break;

pub(crate) use alignment::{evaluate_align, justify};
pub(crate) use journal::{decoration_strokes, DecorationInput};
pub use journal::{LastLinePolicy, TypesetJournal};
pub(crate) use line_break::LineBreaker;
pub use line_break::{Justifiable, LineSpan};

/// Where the caret goes before the next line is placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum VerticalPositioning {
    /// The caret already sits on the baseline.
    Baseline,
    /// The caret sits on the previous baseline, move down one line height.
    PrevBaseline,
    /// The caret sits on the top of the box, move down by the ascender.
    TopBound,
}

/// A typeset paragraph with the extremes its placement depends on.
///
/// All values are in bitmap pixels at the scale the paragraph was drawn at.
#[derive(Clone, Debug, Default)]
pub struct DrawResult {
    /// The placed glyphs and decorations.
    pub journal: TypesetJournal,
    /// Largest descender of the last line, not positive.
    pub last_line_descender: f32,
    /// Largest ascender of the first line.
    pub first_ascender: f32,
    /// Largest descender of the first line, not positive.
    pub first_descender: f32,
    /// Line height of the first line.
    pub first_line_height: f32,
    /// Face recommended line height of the first line.
    pub first_line_default_height: f32,
    /// Tallest glyph bearing of the first line.
    pub first_line_bearing: f32,
    /// Widest line, or the box width when one was given.
    pub max_line_width: f32,
    /// Leftmost line start.
    pub leftmost: f32,
    /// Left edge of the first line.
    pub left_first: f32,
}
