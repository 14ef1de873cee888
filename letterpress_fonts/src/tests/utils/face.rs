// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{FaceMetrics, FontFace, FontFeature, GlyphId, GlyphImage, RenderRequest, ShapedGlyph};

/// A face that maps ASCII letters and renders nothing.
pub(crate) struct StubFace {
    name: String,
}

impl StubFace {
    pub(crate) fn boxed(name: &str) -> Box<dyn FontFace> {
        Box::new(Self { name: name.into() })
    }
}

impl FontFace for StubFace {
    fn postscript_name(&self) -> &str {
        &self.name
    }

    fn is_scalable(&self) -> bool {
        true
    }

    fn glyph_index(&self, ch: char) -> Option<GlyphId> {
        ch.is_ascii_alphabetic().then_some(u32::from(ch))
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
        size * 0.5
    }

    fn glyph_bearing(&self, _glyph: GlyphId, _size: f32) -> (f32, f32) {
        (0.0, 0.0)
    }

    fn shape(
        &self,
        text: &[char],
        size: f32,
        _features: &[FontFeature],
        _rtl: bool,
    ) -> Vec<ShapedGlyph> {
        (0..text.len())
            .map(|i| ShapedGlyph {
                id: self.glyph_index(text[i]).unwrap_or(0),
                cluster: u32::try_from(i).unwrap(),
                x_advance: size * 0.5,
            })
            .collect()
    }

    fn render_glyph(&self, _glyph: GlyphId, _request: &RenderRequest) -> Option<GlyphImage> {
        None
    }
}
