// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The face abstraction consumed by the layout engine.

use core::fmt;

/// Identifier of a glyph within a face.
pub type GlyphId = u32;

/// An OpenType feature setting.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct FontFeature {
    /// The four byte feature tag, for example `*b"liga"`.
    pub tag: [u8; 4],
    /// The feature value, `0` disables and `1` enables boolean features.
    pub value: u32,
}

impl FontFeature {
    /// Creates a feature setting from a tag and value.
    pub const fn new(tag: [u8; 4], value: u32) -> Self {
        Self { tag, value }
    }

    /// Parses a tag written as up to four ASCII characters, padding with spaces.
    pub fn parse_tag(s: &str) -> Option<[u8; 4]> {
        if s.is_empty() || s.len() > 4 || !s.is_ascii() {
            return None;
        }
        let mut tag = [b' '; 4];
        tag[..s.len()].copy_from_slice(s.as_bytes());
        Some(tag)
    }
}

impl fmt::Display for FontFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.tag {
            write!(f, "{}", char::from(b))?;
        }
        write!(f, "={}", self.value)
    }
}

/// Vertical metrics of a face at a given pixel size.
///
/// The descender is negative below the baseline.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct FaceMetrics {
    /// Distance from the baseline to the top of the line box.
    pub ascender: f32,
    /// Distance from the baseline to the bottom of the line box, negative.
    pub descender: f32,
    /// Recommended distance between consecutive baselines.
    pub height: f32,
    /// Offset of the underline from the baseline, negative below it.
    pub underline_position: f32,
    /// Thickness of the underline stroke.
    pub underline_thickness: f32,
}

/// One glyph produced by shaping a run of text.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct ShapedGlyph {
    /// The glyph identifier within the face, `0` for a missing glyph.
    pub id: GlyphId,
    /// Index of the first character of the cluster, relative to the shaped text.
    pub cluster: u32,
    /// Horizontal advance in pixels.
    pub x_advance: f32,
}

/// Parameters for rasterizing one glyph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// Pixel size to render at.
    pub size: f32,
    /// Sub-pixel offset of the pen position, each component in `[0, 1)`.
    pub offset: (f32, f32),
    /// Whether outlines should be hinted.
    pub hint: bool,
}

/// Pixel content of a rendered glyph.
#[derive(Clone, PartialEq)]
pub enum GlyphPixels {
    /// 8-bit coverage values, one per pixel.
    Mask(Vec<u8>),
    /// Premultiplied RGBA packed as `0xAABBGGRR`, one per pixel.
    Color(Vec<u32>),
}

impl fmt::Debug for GlyphPixels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mask(data) => write!(f, "Mask({} px)", data.len()),
            Self::Color(data) => write!(f, "Color({} px)", data.len()),
        }
    }
}

/// A rasterized glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphImage {
    /// Horizontal offset from the pen position to the left edge of the bitmap.
    pub left: i32,
    /// Vertical offset from the baseline up to the top edge of the bitmap.
    pub top: i32,
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Pixel content.
    pub pixels: GlyphPixels,
    /// Change of the left side bearing caused by hinting.
    pub lsb_delta: f32,
    /// Change of the right side bearing caused by hinting.
    pub rsb_delta: f32,
    /// `true` if the image is a fixed-size strike bitmap that was not resized
    /// to the requested size.
    pub is_bitmap: bool,
}

impl GlyphImage {
    /// Returns `true` if the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A loaded typeface.
///
/// All sizes and returned metrics are in pixels. Implementations are free to
/// cache internally but every method takes `&self`.
pub trait FontFace {
    /// The PostScript name recorded in the face.
    fn postscript_name(&self) -> &str;

    /// Returns `true` for outline faces that can render at any size.
    fn is_scalable(&self) -> bool;

    /// Returns `true` if the face carries colour glyphs.
    fn is_color(&self) -> bool {
        false
    }

    /// Maps a character to its nominal glyph.
    fn glyph_index(&self, ch: char) -> Option<GlyphId>;

    /// Returns `true` if the face maps the character to a glyph.
    fn has_glyph(&self, ch: char) -> bool {
        self.glyph_index(ch).is_some_and(|id| id != 0)
    }

    /// Returns `true` if the face implements the given OpenType feature.
    fn has_feature(&self, tag: [u8; 4]) -> bool;

    /// Returns the size the face actually renders at for a requested size.
    ///
    /// Scalable faces return `size`; bitmap faces return the closest strike.
    fn select_size(&self, size: f32) -> f32 {
        size
    }

    /// Vertical metrics at the given size.
    fn metrics(&self, size: f32) -> FaceMetrics;

    /// Default advance of a glyph at the given size.
    fn glyph_advance(&self, glyph: GlyphId, size: f32) -> f32;

    /// Horizontal and vertical bearing of a glyph outline at the given size.
    fn glyph_bearing(&self, glyph: GlyphId, size: f32) -> (f32, f32);

    /// Returns `true` if the face has a legacy TrueType kerning table.
    fn has_kerning(&self) -> bool {
        false
    }

    /// Kerning adjustment between two glyphs from the legacy kerning table.
    fn kerning(&self, left: GlyphId, right: GlyphId, size: f32) -> f32 {
        let _ = (left, right, size);
        0.0
    }

    /// Shapes a run of uniformly formatted text.
    ///
    /// Returned glyphs are in visual order (reversed for right-to-left runs)
    /// and their clusters index into `text`.
    fn shape(&self, text: &[char], size: f32, features: &[FontFeature], rtl: bool)
        -> Vec<ShapedGlyph>;

    /// Rasterizes a glyph, or returns `None` when the face cannot render it.
    fn render_glyph(&self, glyph: GlyphId, request: &RenderRequest) -> Option<GlyphImage>;
}

impl fmt::Debug for dyn FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("postscript_name", &self.postscript_name())
            .field("scalable", &self.is_scalable())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::FontFeature;

    #[test]
    fn short_tags_are_padded() {
        assert_eq!(FontFeature::parse_tag("liga"), Some(*b"liga"), "full tag");
        assert_eq!(FontFeature::parse_tag("cv"), Some(*b"cv  "), "padded with spaces");
        assert_eq!(FontFeature::parse_tag(""), None, "empty tag");
        assert_eq!(FontFeature::parse_tag("kerns"), None, "too long");
        assert_eq!(
            FontFeature::new(*b"kern", 0).to_string(),
            "kern=0",
            "display form"
        );
    }
}
