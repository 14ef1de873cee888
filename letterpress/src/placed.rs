// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placed glyphs and decorations that can be redrawn at any scale.

use hashbrown::HashMap;
use letterpress_fonts::{FontFace, GlyphId};

use crate::format::Decoration;
use crate::geometry::{floor_px, narrow, round_px, Affine, IPoint, Point, Rect};
use crate::layout::decoration_strokes;
use crate::raster::{acquire_glyph, Glyph, RgbaTarget};

/// Four corners of a glyph's bitmap box.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct Quad {
    /// Top-left corner.
    pub top_left: Point,
    /// Top-right corner.
    pub top_right: Point,
    /// Bottom-left corner.
    pub bottom_left: Point,
    /// Bottom-right corner.
    pub bottom_right: Point,
}

impl Quad {
    /// Maps every corner through `m`.
    pub fn transformed(&self, m: Affine) -> Self {
        Self {
            top_left: m * self.top_left,
            top_right: m * self.top_right,
            bottom_left: m * self.bottom_left,
            bottom_right: m * self.bottom_right,
        }
    }
}

/// A glyph positioned in unscaled text space.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedGlyph {
    /// Glyph identifier within its face.
    pub codepoint: GlyphId,
    /// Straight `0xAABBGGRR` colour.
    pub color: u32,
    /// Font size the glyph was shaped at.
    pub font_size: f32,
    /// Index of the source character in the text.
    pub index: usize,
    /// Pen position on the baseline.
    pub origin: Point,
    /// Bitmap extent at scale one.
    pub(crate) bitmap_box: Rect,
}

impl PlacedGlyph {
    /// Bitmap extent of the glyph at scale one.
    pub fn bitmap_box(&self) -> Rect {
        self.bitmap_box
    }

    /// The corners of [`Self::bitmap_box`].
    pub fn quad(&self) -> Quad {
        let b = self.bitmap_box;
        Quad {
            top_left: Point::new(b.x0, b.y0),
            top_right: Point::new(b.x1, b.y0),
            bottom_left: Point::new(b.x0, b.y1),
            bottom_right: Point::new(b.x1, b.y1),
        }
    }
}

/// A decoration stroke in unscaled text space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedDecoration {
    /// Kind of the stroke.
    pub decoration: Decoration,
    /// Straight `0xAABBGGRR` colour.
    pub color: u32,
    /// Left end of the stroke.
    pub start: Point,
    /// Right end of the stroke.
    pub end: Point,
    /// Stroke thickness.
    pub thickness: f32,
}

/// The result of shaping a text: glyphs grouped by face, decorations, and
/// the frame they were placed in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacedTextData {
    /// Placed glyphs keyed by face.
    pub glyphs: HashMap<String, Vec<PlacedGlyph>>,
    /// Decorations in line order.
    pub decorations: Vec<PlacedDecoration>,
    /// Text frame stretched over the glyphs, before the transform.
    pub bounds: Rect,
    /// Text space to canvas transform.
    pub transform: Affine,
    /// Distance of the first baseline from the top of the frame.
    pub baseline: f32,
}

impl PlacedTextData {
    /// [`Self::bounds`] mapped through [`Self::transform`].
    pub fn transformed_bounds(&self) -> Rect {
        self.transform.transform_rect_bbox(self.bounds)
    }

    /// Total number of placed glyphs.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.values().map(Vec::len).sum()
    }

    /// Placed glyphs of every face ordered by source index.
    pub fn glyphs_in_text_order(&self) -> Vec<(&str, &PlacedGlyph)> {
        let mut all: Vec<_> = self
            .glyphs
            .iter()
            .flat_map(|(face, glyphs)| glyphs.iter().map(move |g| (face.as_str(), g)))
            .collect();
        all.sort_by_key(|(_, g)| g.index);
        all
    }
}

/// Renders a placed glyph for drawing at `scale`.
pub(crate) fn render_placed_glyph(
    face: &dyn FontFace,
    placed: &PlacedGlyph,
    scale: f32,
    hint: bool,
) -> Option<Glyph> {
    let mut glyph_scale = 1.0;
    if !face.is_scalable() {
        let strike = face.select_size(placed.font_size);
        if strike > 0.0 {
            let ascender = face.metrics(strike).ascender * (placed.font_size / strike);
            glyph_scale = ascender * scale / strike;
        }
    }

    let x = placed.origin.x * f64::from(scale);
    let y = placed.origin.y * f64::from(scale);
    let offset = (narrow(x - x.floor()), narrow(y - y.floor()));
    let mut glyph = acquire_glyph(
        face,
        placed.codepoint,
        placed.font_size,
        offset,
        scale,
        glyph_scale,
        hint,
    )?;
    glyph.destination = IPoint::new(
        floor_px(x) + glyph.bearing.x,
        floor_px(y) - glyph.bearing.y,
    );
    glyph.set_color(placed.color);
    Some(glyph)
}

/// Strokes a placed decoration at `scale`.
pub(crate) fn draw_decoration(
    target: &mut RgbaTarget<'_>,
    decoration: &PlacedDecoration,
    scale: f32,
) {
    let scale64 = f64::from(scale);
    let strokes = decoration_strokes(
        decoration.decoration,
        decoration.thickness * scale,
        (
            floor_px(decoration.start.x * scale64),
            round_px(decoration.end.x * scale64),
        ),
        floor_px(decoration.start.y * scale64),
    );
    for stroke in strokes {
        target.fill(stroke, decoration.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_corners_follow_the_box() {
        let glyph = PlacedGlyph {
            codepoint: 3,
            color: 0xFF00_0000,
            font_size: 10.0,
            index: 0,
            origin: Point::new(1.0, 8.0),
            bitmap_box: Rect::new(1.0, 0.0, 7.0, 8.0),
        };
        let quad = glyph.quad();
        assert_eq!(quad.top_left, Point::new(1.0, 0.0), "top left");
        assert_eq!(quad.top_right, Point::new(7.0, 0.0), "top right");
        assert_eq!(quad.bottom_left, Point::new(1.0, 8.0), "bottom left");
        assert_eq!(quad.bottom_right, Point::new(7.0, 8.0), "bottom right");

        let moved = quad.transformed(Affine::translate((10.0, 20.0)));
        assert_eq!(moved.top_left, Point::new(11.0, 20.0), "translated corner");
    }

    #[test]
    fn decoration_strokes_one_pixel_columns() {
        let mut data = vec![0_u8; 4 * 8 * 8];
        let mut target = RgbaTarget::new(&mut data, 8, 8);
        let decoration = PlacedDecoration {
            decoration: Decoration::Underline,
            color: 0xFF00_00FF,
            start: Point::new(2.0, 5.0),
            end: Point::new(6.0, 5.0),
            thickness: 1.0,
        };
        draw_decoration(&mut target, &decoration, 1.0);
        let pixel = |x: usize, y: usize| {
            let i = 4 * (y * 8 + x);
            u32::from_le_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]])
        };
        for x in 2..6 {
            assert_eq!(pixel(x, 5), 0xFF00_00FF, "column {x} stroked");
        }
        assert_eq!(pixel(1, 5), 0, "left of the stroke");
        assert_eq!(pixel(6, 5), 0, "right of the stroke");
        assert_eq!(pixel(3, 4), 0, "above the stroke");
    }

    #[test]
    fn double_underline_splits_the_thickness() {
        let mut data = vec![0_u8; 4 * 4 * 12];
        let mut target = RgbaTarget::new(&mut data, 4, 12);
        let decoration = PlacedDecoration {
            decoration: Decoration::DoubleUnderline,
            color: 0xFFFF_FFFF,
            start: Point::new(0.0, 6.0),
            end: Point::new(1.0, 6.0),
            thickness: 1.2,
        };
        // Each stroke is ceil(1.2 * 2 / 3) = 1 pixel, half a stroke apart
        // from the row.
        draw_decoration(&mut target, &decoration, 1.0);
        let rows: Vec<usize> = (0..12).filter(|&y| data[4 * (y * 4)] != 0).collect();
        assert_eq!(rows, vec![6], "strokes meet on the decoration row");
    }

    #[test]
    fn double_underline_scales_before_splitting() {
        let mut data = vec![0_u8; 4 * 4 * 12];
        let mut target = RgbaTarget::new(&mut data, 4, 12);
        let decoration = PlacedDecoration {
            decoration: Decoration::DoubleUnderline,
            color: 0xFFFF_FFFF,
            start: Point::new(0.0, 2.0),
            end: Point::new(1.0, 2.0),
            thickness: 0.5,
        };
        // At scale 4 each stroke is ceil(2 * 2 / 3) = 2 pixels, one pixel
        // away from row 8.
        draw_decoration(&mut target, &decoration, 4.0);
        let rows: Vec<usize> = (0..12).filter(|&y| data[4 * (y * 4)] != 0).collect();
        assert_eq!(rows, vec![6, 7, 9, 10], "two strokes around the row");
        assert_ne!(data[4 * (9 * 4 + 3)], 0, "stroke reaches the end column");
    }
}
