// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character classes, line break opportunities and bidi runs.

use icu_properties::props::Emoji;
use icu_properties::CodePointSetData;
use icu_segmenter::options::LineBreakOptions;
use icu_segmenter::LineSegmenter;
use unicode_bidi::{BidiInfo, Direction, Level};

use crate::format::TextDirection;

/// Blank line placeholder and explicit line separator.
pub(crate) const LINE_SEPARATOR: char = '\u{2028}';

/// Legacy end of text marker, treated as a line separator.
pub(crate) const END_OF_TEXT: char = '\u{3}';

/// Replacement for tabs when no tab stops are set.
pub(crate) const EM_SPACE: char = '\u{2003}';

/// Zero width joiner, skipped by shaping.
pub(crate) const ZERO_WIDTH_JOINER: char = '\u{200D}';

/// Characters that separate words.
pub(crate) fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | LINE_SEPARATOR)
}

pub(crate) fn is_tab_stop(ch: char) -> bool {
    ch == '\t'
}

/// Characters that end a line without ending the paragraph.
pub(crate) fn is_soft_break(ch: char) -> bool {
    matches!(ch, LINE_SEPARATOR | END_OF_TEXT)
}

/// Characters that end a paragraph.
pub(crate) fn is_paragraph_break(ch: char) -> bool {
    matches!(ch, '\r' | '\n' | '\u{2029}')
}

/// Characters that fall back to the emoji face when the selected face lacks them.
pub(crate) fn is_emoji(ch: char) -> bool {
    CodePointSetData::new::<Emoji>().contains(ch)
}

/// Marks the characters a line may start at.
///
/// The returned vector has one entry per character plus one for the end of
/// the text.
pub(crate) fn line_break_opportunities(text: &[char]) -> Option<Vec<bool>> {
    if text.is_empty() {
        return None;
    }
    let s: String = text.iter().collect();
    // Byte offset to character index.
    let mut char_at = vec![usize::MAX; s.len() + 1];
    for (i, (byte, _)) in s.char_indices().enumerate() {
        char_at[byte] = i;
    }
    char_at[s.len()] = text.len();

    let mut opportunities = vec![false; text.len() + 1];
    let segmenter = LineSegmenter::new_auto(LineBreakOptions::default());
    for byte in segmenter.segment_str(&s) {
        let idx = *char_at.get(byte)?;
        if idx == usize::MAX {
            return None;
        }
        opportunities[idx] = true;
    }
    Some(opportunities)
}

/// A range of characters laid out in one direction.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualRun {
    /// First character or glyph of the run.
    pub start: usize,
    /// One past the last character or glyph of the run.
    pub end: usize,
    /// Direction of the run.
    pub direction: TextDirection,
    /// Width of the run, filled in by line breaking.
    pub width: f32,
}

impl VisualRun {
    pub(crate) fn new(start: usize, end: usize, direction: TextDirection) -> Self {
        Self {
            start,
            end,
            direction,
            width: 0.0,
        }
    }

    /// Number of characters or glyphs in the run.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the run is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Outcome of the bidi analysis of one paragraph.
#[derive(Clone, Debug, Default)]
pub(crate) struct BidiRuns {
    pub(crate) base_direction: TextDirection,
    /// Visual runs in display order.
    pub(crate) runs: Vec<VisualRun>,
    /// Resolved direction of every character.
    pub(crate) directions: Vec<TextDirection>,
}

/// Runs the bidi algorithm over a paragraph with a left-to-right embedding.
///
/// The base direction is taken from the first strong character. Returns
/// `None` when no runs could be resolved.
pub(crate) fn analyze_bidi(text: &[char]) -> Option<BidiRuns> {
    let s: String = text.iter().collect();
    let base_direction = match unicode_bidi::get_base_direction(s.as_str()) {
        Direction::Rtl => TextDirection::RightToLeft,
        Direction::Ltr | Direction::Mixed => TextDirection::LeftToRight,
    };

    let mut char_at = vec![0; s.len() + 1];
    for (i, (byte, ch)) in s.char_indices().enumerate() {
        char_at[byte..byte + ch.len_utf8()].fill(i);
    }
    char_at[s.len()] = text.len();

    let info = BidiInfo::new(&s, Some(Level::ltr()));
    let mut runs = Vec::new();
    let mut directions = vec![TextDirection::LeftToRight; text.len()];
    for paragraph in &info.paragraphs {
        let (levels, level_runs) = info.visual_runs(paragraph, paragraph.range.clone());
        for run in level_runs {
            if run.start >= run.end {
                continue;
            }
            let direction = match levels.get(run.start) {
                Some(level) if level.is_rtl() => TextDirection::RightToLeft,
                _ => TextDirection::LeftToRight,
            };
            let start = char_at[run.start];
            let end = char_at[run.end];
            directions[start..end].fill(direction);
            runs.push(VisualRun::new(start, end, direction));
        }
    }
    if runs.is_empty() {
        return None;
    }
    Some(BidiRuns {
        base_direction,
        runs,
        directions,
    })
}
