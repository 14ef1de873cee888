// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use letterpress_fonts::FaceMetrics;

use crate::format::Decoration;
use crate::geometry::{ceil_px, trunc_px, IPoint, IRect};
use crate::raster::{Glyph, RgbaTarget};

/// Strike-through position as a fraction of the face height.
const STRIKE_THROUGH_HEIGHT: f32 = 0.25;

/// Whether a line that only partly fits the box is drawn.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub enum LastLinePolicy {
    /// Every line is drawn.
    #[default]
    Force,
    /// The first line crossing the bottom of the box and everything after it
    /// is dropped.
    Cut,
}

/// A horizontal stroke under, through or below a range of glyphs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct DecorationRecord {
    pub(crate) decoration: Decoration,
    pub(crate) color: u32,
    /// First and one past the last column.
    pub(crate) range: (i32, i32),
    /// Row of the stroke.
    pub(crate) offset: i32,
    pub(crate) thickness: f32,
    /// First and last glyph index covered.
    pub(crate) indices: (usize, usize),
}

/// Input of [`TypesetJournal::add_decoration`].
#[derive(Copy, Clone, Debug)]
pub(crate) struct DecorationInput<'a> {
    pub(crate) decoration: Decoration,
    pub(crate) color: u32,
    pub(crate) start: IPoint,
    pub(crate) end: IPoint,
    pub(crate) metrics: &'a FaceMetrics,
}

/// The glyphs and decorations of one line.
///
/// Slots without a bitmap keep the glyph count equal to the line's glyph
/// count.
#[derive(Clone, Debug, Default)]
pub(crate) struct LineRecord {
    pub(crate) glyphs: Vec<Option<Glyph>>,
    pub(crate) decorations: Vec<DecorationRecord>,
}

impl LineRecord {
    fn rendered(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter().flatten()
    }

    /// Lowest row covered by a glyph, at least zero.
    fn low_point(&self) -> i32 {
        self.rendered()
            .map(|g| g.bitmap_bounds().b())
            .fold(0, i32::max)
    }

    /// Top row and bottom row of the glyph bitmaps.
    fn extremes(&self) -> Option<(i32, i32)> {
        let high = self.rendered().map(|g| g.destination.y).min()?;
        Some((high, self.low_point()))
    }
}

/// Everything a paragraph drew, line by line, ready to be blitted or
/// measured.
#[derive(Clone, Debug, Default)]
pub struct TypesetJournal {
    pub(crate) lines: Vec<LineRecord>,
    last_line_policy: LastLinePolicy,
}

impl TypesetJournal {
    /// Number of lines recorded.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of glyph slots in every line, placeholders included.
    pub fn glyph_counts(&self) -> Vec<usize> {
        self.lines.iter().map(|line| line.glyphs.len()).collect()
    }

    /// The policy for lines crossing the bottom of the box.
    pub fn last_line_policy(&self) -> LastLinePolicy {
        self.last_line_policy
    }

    pub(crate) fn set_last_line_policy(&mut self, policy: LastLinePolicy) {
        self.last_line_policy = policy;
    }

    pub(crate) fn start_line(&mut self) {
        self.lines.push(LineRecord::default());
    }

    /// Appends a glyph slot to the current line, `None` for characters that
    /// draw nothing.
    pub(crate) fn add_glyph(&mut self, glyph: Option<Glyph>) {
        if self.lines.is_empty() {
            self.lines.push(LineRecord::default());
        }
        if let Some(line) = self.lines.last_mut() {
            line.glyphs.push(glyph);
        }
    }

    /// Records the decoration of glyph `index`, extending the last or second
    /// to last decoration of the line when it ends at the previous glyph.
    pub(crate) fn add_decoration(&mut self, input: &DecorationInput<'_>, scale: f32, index: usize) {
        let Some(line) = self.lines.last_mut() else {
            return;
        };
        let n = line.decorations.len();
        for record in line.decorations[n.saturating_sub(2)..].iter_mut().rev() {
            if record.indices.1 + 1 == index && record.decoration == input.decoration {
                record.range.1 = input.end.x;
                record.indices.1 = index;
                return;
            }
        }
        let position = if input.decoration == Decoration::StrikeThrough {
            STRIKE_THROUGH_HEIGHT * input.metrics.height
        } else {
            input.metrics.underline_position
        };
        let offset = input.start.y - trunc_px(position * scale);
        line.decorations.push(DecorationRecord {
            decoration: input.decoration,
            color: input.color,
            range: (input.start.x, input.end.x),
            offset,
            thickness: input.metrics.underline_thickness * scale,
            indices: (index, index),
        });
    }

    /// Union of the glyph bitmaps of the lines down to `y_max`, or of every
    /// line when `y_max` is not positive, moved down by `y_offset`.
    pub(crate) fn stretched_bounds(&self, y_offset: i32, y_max: i32) -> IRect {
        let mut bounds = IRect::default();
        for line in &self.lines {
            let Some((high, low)) = line.extremes() else {
                continue;
            };
            if y_max > 0 && high > y_max {
                break;
            }
            if self.last_line_policy == LastLinePolicy::Cut && high <= y_max && low > y_max {
                break;
            }
            for glyph in line.rendered() {
                bounds = bounds | glyph.bitmap_bounds();
            }
            if y_max > 0 && low > y_max {
                break;
            }
        }
        bounds.t += y_offset;
        bounds
    }

    /// Blits the glyphs that intersect `view_area` and strokes the
    /// decorations.
    ///
    /// Returns the number of glyphs blitted.
    pub(crate) fn draw(
        &self,
        target: &mut RgbaTarget<'_>,
        bitmap_bounds: IRect,
        text_height: i32,
        view_area: IRect,
        offset: IPoint,
    ) -> usize {
        let mut rendered = 0;
        for line in &self.lines {
            if self.last_line_policy == LastLinePolicy::Cut
                && line.low_point() + offset.y > text_height
            {
                break;
            }
            for glyph in line.rendered() {
                let placed = bitmap_bounds
                    .offset_by(glyph.bitmap_bounds())
                    .translate(offset.x, offset.y);
                if !(placed & view_area).is_non_empty() {
                    continue;
                }
                glyph.blit(target, offset);
                rendered += 1;
            }
        }
        self.draw_decorations(target, offset);
        rendered
    }

    fn draw_decorations(&self, target: &mut RgbaTarget<'_>, offset: IPoint) {
        for record in self.lines.iter().flat_map(|line| &line.decorations) {
            let strokes = decoration_strokes(
                record.decoration,
                record.thickness,
                (record.range.0 + offset.x, record.range.1 + offset.x),
                record.offset + offset.y,
            );
            for stroke in strokes {
                target.fill(stroke, record.color);
            }
        }
    }
}

/// Pixel rectangles of a decoration over columns `x.0..x.1` on row `y`.
///
/// A single stroke grows up from the row. The two strokes of a double
/// underline are two thirds of `thickness` each and sit half a stroke above
/// and below the row.
pub(crate) fn decoration_strokes(
    decoration: Decoration,
    thickness: f32,
    x: (i32, i32),
    y: i32,
) -> [IRect; 2] {
    let width = x.1 - x.0;
    match decoration {
        Decoration::None => [IRect::default(); 2],
        Decoration::DoubleUnderline => {
            let stroke = ceil_px(thickness * 2.0 / 3.0);
            let gap = stroke / 2;
            [
                IRect::new(x.0, y - gap - stroke + 1, width, stroke),
                IRect::new(x.0, y + gap, width, stroke),
            ]
        }
        Decoration::Underline | Decoration::StrikeThrough => {
            let stroke = ceil_px(thickness);
            [IRect::new(x.0, y - stroke + 1, width, stroke), IRect::default()]
        }
    }
}
