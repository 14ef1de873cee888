// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use letterpress_fonts::{
    FaceMetrics, FontFace, FontFeature, GlyphId, GlyphImage, GlyphPixels, RenderRequest,
    ShapedGlyph,
};

/// A synthetic face drawing every printable ASCII character and Hebrew
/// letter as a solid box.
///
/// At size `s` the ascender is `0.8 s`, the descender `-0.2 s` and the line
/// height `1.2 s`. Glyphs advance by `advance * s` and render as a box
/// `advance * s` wide and `0.7 s` tall sitting on the baseline. Spaces render
/// nothing.
pub(crate) struct BoxFace {
    name: String,
    advance: f32,
    kerning: Option<f32>,
    strike: Option<f32>,
}

impl BoxFace {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            advance: 0.5,
            kerning: None,
            strike: None,
        }
    }

    /// Makes the face a bitmap face with a single strike at `ppem`.
    pub(crate) fn with_strike(mut self, ppem: f32) -> Self {
        self.strike = Some(ppem);
        self
    }

    /// Changes the advance, as a fraction of the size.
    pub(crate) fn with_advance(mut self, advance: f32) -> Self {
        self.advance = advance;
        self
    }

    /// Adds a legacy kerning table moving every pair by `k * size`.
    pub(crate) fn with_kerning(mut self, k: f32) -> Self {
        self.kerning = Some(k);
        self
    }

    pub(crate) fn boxed(self) -> Box<dyn FontFace> {
        Box::new(self)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "test glyphs are a few pixels wide"
)]
fn px(v: f32) -> u32 {
    v.round().max(0.0) as u32
}

impl FontFace for BoxFace {
    fn postscript_name(&self) -> &str {
        &self.name
    }

    fn is_scalable(&self) -> bool {
        self.strike.is_none()
    }

    fn select_size(&self, size: f32) -> f32 {
        self.strike.unwrap_or(size)
    }

    fn glyph_index(&self, ch: char) -> Option<GlyphId> {
        let hebrew = ('\u{5D0}'..='\u{5EA}').contains(&ch);
        (ch == ' ' || ch.is_ascii_graphic() || hebrew).then_some(u32::from(ch))
    }

    fn has_feature(&self, _tag: [u8; 4]) -> bool {
        false
    }

    fn metrics(&self, size: f32) -> FaceMetrics {
        FaceMetrics {
            ascender: size * 0.8,
            descender: -size * 0.2,
            height: size * 1.2,
            underline_position: -size * 0.1,
            underline_thickness: size * 0.05,
        }
    }

    fn glyph_advance(&self, _glyph: GlyphId, size: f32) -> f32 {
        size * self.advance
    }

    fn glyph_bearing(&self, glyph: GlyphId, size: f32) -> (f32, f32) {
        if glyph == u32::from(' ') {
            (0.0, 0.0)
        } else {
            (0.0, size * 0.7)
        }
    }

    fn has_kerning(&self) -> bool {
        self.kerning.is_some()
    }

    fn kerning(&self, _left: GlyphId, _right: GlyphId, size: f32) -> f32 {
        self.kerning.map_or(0.0, |k| k * size)
    }

    fn shape(
        &self,
        text: &[char],
        size: f32,
        _features: &[FontFeature],
        rtl: bool,
    ) -> Vec<ShapedGlyph> {
        let mut glyphs: Vec<_> = text
            .iter()
            .enumerate()
            .map(|(i, &ch)| ShapedGlyph {
                id: self.glyph_index(ch).unwrap_or(0),
                cluster: u32::try_from(i).unwrap(),
                x_advance: size * self.advance,
            })
            .collect();
        if rtl {
            glyphs.reverse();
        }
        glyphs
    }

    fn render_glyph(&self, glyph: GlyphId, request: &RenderRequest) -> Option<GlyphImage> {
        if glyph == 0 || glyph == u32::from(' ') {
            return None;
        }
        let width = px(request.size * self.advance);
        let height = px(request.size * 0.7);
        let len = usize::try_from(width * height).unwrap();
        Some(GlyphImage {
            left: 0,
            top: i32::try_from(height).unwrap(),
            width,
            height,
            pixels: GlyphPixels::Mask(vec![u8::MAX; len]),
            lsb_delta: 0.0,
            rsb_delta: 0.0,
            is_bitmap: self.strike.is_some(),
        })
    }
}
