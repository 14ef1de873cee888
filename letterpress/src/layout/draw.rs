// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use letterpress_fonts::FaceTable;

use super::{evaluate_align, justify, DecorationInput, DrawResult, LineSpan, VerticalPositioning};
use crate::analysis::{is_tab_stop, is_whitespace, LINE_SEPARATOR};
use crate::config::Config;
use crate::format::Decoration;
use crate::geometry::{floor_px, round_px, IPoint, Point};
use crate::raster::acquire_glyph;
use crate::shape::ParagraphShape;

/// Pen position in layout precision.
#[derive(Copy, Clone, Debug, Default)]
struct Pen {
    x: f32,
    y: f32,
}

/// Vertical extremes of a line at a scale.
#[derive(Copy, Clone, Debug, Default)]
struct LineMetrics {
    ascender: f32,
    descender: f32,
    line_height: f32,
    default_line_height: f32,
    bearing: f32,
}

impl ParagraphShape {
    fn line_metrics(&self, line: &LineSpan, scale: f32) -> LineMetrics {
        let end = line.end.min(self.glyphs.len());
        let start = line.start.min(end);
        let mut m = LineMetrics::default();
        for glyph in &self.glyphs[start..end] {
            m.ascender = m.ascender.max(glyph.ascender * scale);
            m.descender = m.descender.min(glyph.descender * scale);
            m.line_height = m.line_height.max(glyph.line_height * scale);
            m.default_line_height = m.default_line_height.max(glyph.default_line_height * scale);
            m.bearing = m.bearing.max(glyph.bearing_y * scale);
        }
        m
    }

    /// Places every line of the paragraph into a journal.
    ///
    /// `y` is the caret row on entry and the top of the next paragraph on
    /// return. A `width` of zero lays every line out at its natural width.
    pub(crate) fn draw(
        &self,
        faces: &FaceTable,
        config: &Config,
        width: i32,
        y: &mut f32,
        positioning: &mut VerticalPositioning,
        scale: f32,
        last: bool,
    ) -> DrawResult {
        let mut result = DrawResult::default();
        let Some(first) = self.glyphs.first() else {
            log::warn!("no glyphs in paragraph");
            return result;
        };
        let align = evaluate_align(first.format.align, first.direction);
        let width_f = width as f32;

        let mut caret = Pen { x: 0.0, y: *y };
        let line_count = self.line_spans.len();
        for (line_index, line) in self.line_spans.iter().enumerate() {
            result.journal.start_line();
            let metrics = self.line_metrics(line, scale);

            caret.y += match *positioning {
                VerticalPositioning::Baseline => 0.0,
                VerticalPositioning::PrevBaseline => metrics.line_height.round(),
                VerticalPositioning::TopBound if self.load_bearing => metrics.bearing,
                VerticalPositioning::TopBound => metrics.ascender,
            };
            *positioning = VerticalPositioning::Baseline;

            let justify_width = if width > 0 {
                width_f / scale
            } else {
                line.line_width
            };
            let Some(justification) = justify(
                &self.glyphs,
                line,
                justify_width,
                config.justify_ambiguous,
                config.limit_justify_space_width,
            ) else {
                log::warn!("line {line_index} starts past the end of the paragraph");
                *positioning = VerticalPositioning::PrevBaseline;
                continue;
            };

            let line_width = justification.line_width * scale;
            let left_limit = align * (width_f - line_width);
            let right_limit = width_f - (1.0 - align) * (width_f - line_width);

            let first_line = line_index == 0;
            if first_line {
                result.first_ascender = metrics.ascender;
                result.first_descender = metrics.descender;
                result.first_line_height = metrics.line_height;
                result.first_line_default_height = metrics.default_line_height;
                result.first_line_bearing = metrics.bearing;
                result.left_first = left_limit;
            }
            if line_index + 1 == line_count {
                result.last_line_descender = metrics.descender;
            }

            let line_rtl = line.base_direction.is_rtl();
            caret.x = if line_rtl { right_limit } else { left_limit };
            if first_line {
                caret.x += first.format.paragraph_indent * scale;
            }

            for (run_index, run) in line.visual_runs.iter().enumerate() {
                let run_rtl = run.direction.is_rtl() && config.enable_rtl;
                let direction = if run_rtl { -1.0 } else { 1.0 };
                let run_width = run.width * scale;
                // Runs against the line direction are drawn from their far end.
                if run_rtl != line_rtl {
                    caret.x -= direction * run_width;
                }

                for j in run.start..run.end {
                    let Some(shape) = self.glyphs.get(j) else {
                        result.journal.add_glyph(None);
                        continue;
                    };
                    if shape.character == LINE_SEPARATOR {
                        *positioning = VerticalPositioning::PrevBaseline;
                        result.journal.add_glyph(None);
                        continue;
                    }
                    let scaled = shape.scaled(scale);
                    let tab = is_tab_stop(shape.character);
                    let mut fixed_advance = false;

                    if j == run.start && !first_line && run_index == 0 && !tab {
                        if let Some(offset) = shape.format.tab_stops.newline_offset() {
                            caret.x = offset * scale;
                        }
                    }
                    if tab {
                        if let Some(stop) = shape.format.tab_stops.next_after(caret.x / scale) {
                            caret.x = stop * scale;
                            fixed_advance = true;
                        }
                    }

                    let Some(face) = faces.face(&shape.format.face) else {
                        log::warn!("missing font face \"{}\" while drawing", shape.format.face);
                        result.journal.add_glyph(None);
                        continue;
                    };

                    let desired_size = if face.is_scalable() {
                        shape.format.size
                    } else {
                        scaled.size
                    };
                    let strike = face.select_size(desired_size);
                    let glyph_scale = if !face.is_scalable() && strike > 0.0 {
                        scaled.ascender / strike
                    } else {
                        1.0
                    };
                    let offset = (caret.x - caret.x.floor(), caret.y - caret.y.floor());
                    let glyph = acquire_glyph(
                        face,
                        shape.codepoint,
                        desired_size,
                        offset,
                        scale,
                        glyph_scale,
                        !config.disable_hinting,
                    );

                    if config.allow_true_type_kerning
                        && j > line.start
                        && (!face.has_feature(*b"kern") || config.force_true_type_kerning)
                        && face.has_kerning()
                        && shape.format.kerning
                    {
                        let prev = self.glyphs[j - 1].codepoint;
                        caret.x += direction * face.kerning(prev, shape.codepoint, strike) * scale;
                    }

                    let bearing = glyph.as_ref().map(|g| g.bearing).unwrap_or_default();
                    let (bearing_x, bearing_y) = (bearing.x as f32, bearing.y as f32);
                    if j == line.start && config.disregard_first_bearing {
                        caret.x -= direction * bearing_x;
                    }
                    let mut coord = Pen {
                        x: caret.x + bearing_x,
                        y: caret.y - bearing_y,
                    };

                    let advance = if fixed_advance { 0.0 } else { scaled.advance };
                    let letter_spacing = if config.disregard_last_spacing && j + 1 == line.end {
                        0.0
                    } else {
                        scaled.letter_spacing
                    };
                    if run_rtl {
                        coord.x -= advance + letter_spacing;
                    }
                    let coef = if is_whitespace(shape.character) {
                        justification.space
                    } else {
                        justification.non_space
                    };
                    caret.x += direction * coef * (advance + letter_spacing);

                    let Some(mut glyph) = glyph else {
                        result.journal.add_glyph(None);
                        continue;
                    };
                    caret.x += (glyph.rsb_delta - glyph.lsb_delta) * scale;

                    glyph.destination = IPoint::new(floor_px(coord.x), floor_px(coord.y));
                    glyph.origin = Point::new(f64::from(coord.x - bearing_x), f64::from(caret.y));
                    glyph.set_color(shape.color);

                    if shape.format.decoration != Decoration::None {
                        let face_metrics = face.metrics(strike);
                        let row = floor_px(caret.y);
                        let glyph_width = i32::try_from(glyph.width()).unwrap_or(0);
                        let input = DecorationInput {
                            decoration: shape.format.decoration,
                            color: shape.color,
                            start: IPoint::new(glyph.destination.x, row),
                            end: IPoint::new(round_px(coord.x) + glyph_width, row),
                            metrics: &face_metrics,
                        };
                        result.journal.add_decoration(&input, scale, j);
                    }

                    result.journal.add_glyph((!tab).then_some(glyph));
                }

                if run_rtl != line_rtl {
                    caret.x -= direction * run_width;
                }
            }

            *positioning = VerticalPositioning::PrevBaseline;
            if width != 0 {
                result.max_line_width = width_f;
            } else {
                let current = (caret.x - left_limit).max(line_width).ceil();
                result.max_line_width = result.max_line_width.max(current);
            }
            let left = if line_rtl {
                line.line_width - left_limit
            } else {
                left_limit
            };
            result.leftmost = result.leftmost.min(left);
        }
        *y = caret.y
            + if last {
                0.0
            } else {
                first.format.paragraph_spacing * scale
            };
        result
    }
}
