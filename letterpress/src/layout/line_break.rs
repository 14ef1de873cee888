// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breaking shaped paragraphs into lines.

use crate::analysis::{is_soft_break, is_tab_stop, is_whitespace, VisualRun};
use crate::format::TextDirection;
use crate::shape::GlyphShape;

/// Whether a line may be stretched by justification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Justifiable {
    /// The line can be justified.
    Positive,
    /// The line is never justified, like the last line of a paragraph.
    Negative,
    /// The line ends with an explicit line separator. Whether it is
    /// justified is a configuration choice.
    Document,
}

/// A line of glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSpan {
    /// First glyph of the line.
    pub start: usize,
    /// One past the last glyph, excluding trailing whitespace.
    pub end: usize,
    /// Runs of the line in display order.
    pub visual_runs: Vec<VisualRun>,
    /// Width of the line, excluding trailing whitespace.
    pub line_width: f32,
    /// Base direction of the paragraph.
    pub base_direction: TextDirection,
    /// Justification class.
    pub justifiable: Justifiable,
}

impl LineSpan {
    fn new(
        start: usize,
        end: usize,
        line_width: f32,
        base_direction: TextDirection,
        justifiable: Justifiable,
    ) -> Self {
        Self {
            start,
            end,
            visual_runs: Vec::new(),
            line_width,
            base_direction,
            justifiable,
        }
    }

    /// Number of glyphs covered by the visual runs of the line.
    pub fn len(&self) -> usize {
        self.visual_runs.iter().map(VisualRun::len).sum()
    }

    /// Returns `true` if the visual runs cover no glyphs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct Widths {
    /// Width of the committed words.
    line: f32,
    /// Width of the pending word.
    word: f32,
    /// Width of the pending whitespace.
    space: f32,
    line_start: usize,
    line_end: usize,
}

impl Widths {
    fn reset_line(&mut self) {
        self.line = 0.0;
        self.word = 0.0;
        self.space = 0.0;
    }
}

/// Greedy line breaker over the break opportunities of the glyphs.
pub(crate) struct LineBreaker<'a> {
    glyphs: &'a [GlyphShape],
    runs: &'a [VisualRun],
    base_direction: TextDirection,
    lines: Vec<LineSpan>,
}

impl<'a> LineBreaker<'a> {
    pub(crate) fn new(
        glyphs: &'a [GlyphShape],
        runs: &'a [VisualRun],
        base_direction: TextDirection,
    ) -> Self {
        Self {
            glyphs,
            runs,
            base_direction,
            lines: Vec::new(),
        }
    }

    /// Breaks the glyphs into lines no wider than `max_width`, or into
    /// explicit lines only when `max_width` is not positive.
    pub(crate) fn break_lines(mut self, max_width: i32) -> Vec<LineSpan> {
        if self.glyphs.is_empty() {
            return Vec::new();
        }
        let mut w = Widths::default();

        if self.glyphs[0].line_start.is_none() {
            log::warn!("line break opportunities not present");
            for i in 0..self.glyphs.len() {
                self.advance(i, &mut w);
            }
            let width = w.word + w.space;
            self.insert_line(&mut w, 0, self.glyphs.len(), width, Justifiable::Positive);
            self.perform_bidi();
            self.remove_trailing_spaces();
            return self.lines;
        }

        let mut i = 0;
        while i < self.glyphs.len() {
            if is_soft_break(self.glyphs[i].character) {
                if w.line_start == i {
                    // Blank line holding only the separator.
                    self.insert_line(&mut w, i, i + 1, 0.0, Justifiable::Negative);
                } else {
                    let (start, width) = (w.line_start, w.line + w.word + w.space);
                    self.insert_line(&mut w, start, i, width, Justifiable::Document);
                    if i == self.glyphs.len() - 1 {
                        self.insert_line(&mut w, i, i + 1, 0.0, Justifiable::Negative);
                    }
                }
                w.line_start = i + 1;
                w.line_end = i + 1;
                i += 1;
                continue;
            }

            if i > 0 && self.glyphs[i].line_start == Some(true) {
                w.line += w.word + w.space;
                w.word = 0.0;
                w.space = 0.0;
                w.line_end = i;
            }

            self.advance(i, &mut w);

            #[expect(
                clippy::cast_possible_truncation,
                reason = "line widths fit in i32"
            )]
            let overflows = max_width > 0 && (w.line + w.word).floor() as i32 > max_width;
            if overflows {
                let width = w.line;
                let (start, end) = (w.line_start, w.line_end);
                if self.insert_line(&mut w, start, end, width, Justifiable::Positive) {
                    i = w.line_end;
                    w.line_start = w.line_end;
                    self.advance(i, &mut w);
                }
            }
            i += 1;
        }
        let width = w.line + w.word + w.space;
        let start = w.line_start;
        self.insert_line(&mut w, start, self.glyphs.len(), width, Justifiable::Negative);

        self.perform_bidi();
        self.remove_trailing_spaces();
        self.lines
    }

    fn insert_line(
        &mut self,
        w: &mut Widths,
        start: usize,
        end: usize,
        width: f32,
        justifiable: Justifiable,
    ) -> bool {
        if start == end {
            return false;
        }
        self.lines
            .push(LineSpan::new(start, end, width, self.base_direction, justifiable));
        w.reset_line();
        // Wrapped lines start at the second tab stop.
        w.space = self.glyphs[end - 1]
            .format
            .tab_stops
            .newline_offset()
            .unwrap_or(0.0);
        true
    }

    fn advance(&self, i: usize, w: &mut Widths) {
        let glyph = &self.glyphs[i];
        let advance = glyph.advance + glyph.format.letter_spacing;
        if is_tab_stop(glyph.character) {
            let caret = w.space + w.word + w.line;
            if let Some(stop) = glyph.format.tab_stops.next_after(caret) {
                w.line = stop;
                w.space = 0.0;
                w.word = 0.0;
            }
        } else if is_whitespace(glyph.character) {
            w.space += advance;
        } else {
            w.word += advance;
        }
    }

    fn sum_widths(&self, start: usize, end: usize) -> f32 {
        let mut w = Widths::default();
        for j in start..end {
            self.advance(j, &mut w);
        }
        w.word + w.space
    }

    /// Distributes the paragraph's visual runs over the lines, splitting runs
    /// that continue on the next line.
    fn perform_bidi(&mut self) {
        for run in self.runs {
            let Some(i) = self
                .lines
                .iter()
                .position(|line| run.start >= line.start && run.start < line.end)
            else {
                continue;
            };
            let line_end = self.lines[i].end;
            if run.end <= line_end {
                let width = self.sum_widths(run.start, run.end);
                self.lines[i].visual_runs.push(VisualRun {
                    width,
                    ..run.clone()
                });
                continue;
            }
            let width = self.sum_widths(run.start, line_end);
            self.lines[i]
                .visual_runs
                .push(VisualRun {
                    start: run.start,
                    end: line_end,
                    direction: run.direction,
                    width,
                });
            for j in i + 1..self.lines.len() {
                let prev_end = self.lines[j - 1].end;
                let (start, end) = (self.lines[j].start, self.lines[j].end);
                let run_end = run.end.min(end);
                let width = self.sum_widths(prev_end, run_end);
                self.lines[j].visual_runs.push(VisualRun {
                    start,
                    end: run_end,
                    direction: run.direction,
                    width,
                });
                if run.end <= end {
                    break;
                }
            }
        }
    }

    /// Drops trailing whitespace from the end and width of every line.
    fn remove_trailing_spaces(&mut self) {
        for line in &mut self.lines {
            for i in (line.start..line.end).rev() {
                let glyph = &self.glyphs[i];
                if is_whitespace(glyph.character) {
                    line.line_width -= glyph.advance + glyph.format.letter_spacing;
                } else {
                    line.end = i + 1;
                    break;
                }
            }
        }
    }
}
