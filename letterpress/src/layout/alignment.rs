// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{Justifiable, LineSpan};
use crate::analysis::is_whitespace;
use crate::format::{HorizontalAlign, TextDirection};
use crate::shape::GlyphShape;

/// Widest stretch of spaces before the letters start to stretch too.
const MAX_SPACE_STRETCH: f32 = 2.8;

/// Fraction of the free space left of a line for an alignment.
pub(crate) fn evaluate_align(align: HorizontalAlign, direction: TextDirection) -> f32 {
    match align {
        HorizontalAlign::Right => 1.0,
        HorizontalAlign::Center => 0.5,
        HorizontalAlign::Start if direction.is_rtl() => 1.0,
        HorizontalAlign::End if !direction.is_rtl() => 1.0,
        _ => 0.0,
    }
}

/// Advance multipliers of a justified line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Justification {
    /// Multiplier of whitespace advances.
    pub(crate) space: f32,
    /// Multiplier of every other advance.
    pub(crate) non_space: f32,
    /// Width of the line before stretching.
    pub(crate) line_width: f32,
}

/// Computes how a line is stretched to `width`.
///
/// Returns `None` when the line does not index into `glyphs`.
pub(crate) fn justify(
    glyphs: &[GlyphShape],
    line: &LineSpan,
    width: f32,
    justify_ambiguous: bool,
    limit_space_width: bool,
) -> Option<Justification> {
    let first = glyphs.get(line.start)?;
    let mut result = Justification {
        space: 1.0,
        non_space: 1.0,
        line_width: line.line_width,
    };
    let should_justify = first.format.align == HorizontalAlign::Justify
        && (line.justifiable == Justifiable::Positive
            || (line.justifiable == Justifiable::Document && justify_ambiguous));
    if !should_justify {
        return Some(result);
    }

    let mut space_width = 0.0;
    let mut non_space_width = 0.0;
    for glyph in &glyphs[line.start..line.end.min(glyphs.len())] {
        let advance = glyph.advance + glyph.format.letter_spacing;
        if is_whitespace(glyph.character) {
            space_width += advance;
        } else {
            non_space_width += advance;
        }
    }
    let debt = width - line.line_width;
    result.space = 1.0 + debt / space_width;
    if (result.space > MAX_SPACE_STRETCH && limit_space_width) || !result.space.is_finite() {
        result.space = MAX_SPACE_STRETCH;
        result.non_space += (debt - (MAX_SPACE_STRETCH - 1.0) * space_width) / non_space_width;
    }
    if !result.space.is_finite() || !result.non_space.is_finite() {
        result.space = 1.0;
        result.non_space = 1.0;
    }
    Some(result)
}
