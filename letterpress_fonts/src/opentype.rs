// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`FontFace`] backed by OpenType data.
//!
//! Metrics and character mapping come from skrifa, shaping from harfrust and
//! rasterization from swash.

use core::cell::RefCell;
use core::fmt;

use harfrust::{Direction, Feature, Script, ShapePlan, ShaperData, UnicodeBuffer};
use linebender_resource_handle::Blob;
use read_fonts::tables::kern::{Kern, SubtableKind};
use read_fonts::TableProvider as _;
use skrifa::bitmap::BitmapStrikes;
use skrifa::instance::{LocationRef, Size};
use skrifa::raw::types::Tag;
use skrifa::raw::TableProvider as _;
use skrifa::string::StringId;
use skrifa::{GlyphId as SkrifaGlyphId, MetadataProvider as _};
use smallvec::SmallVec;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno;

use crate::face::{
    FaceMetrics, FontFace, FontFeature, GlyphId, GlyphImage, GlyphPixels, RenderRequest,
    ShapedGlyph,
};
use crate::lru_cache::{LookupKey, LruCache};

const MAX_CACHED_PLANS: usize = 16;

type PlanId = (Direction, Script, Box<[Feature]>);

struct PlanKey<'a> {
    direction: Direction,
    script: Script,
    features: &'a [Feature],
}

impl LookupKey<PlanId> for PlanKey<'_> {
    fn eq(&self, other: &PlanId) -> bool {
        self.direction == other.0 && self.script == other.1 && *self.features == *other.2
    }

    fn to_id(self) -> PlanId {
        (self.direction, self.script, self.features.into())
    }
}

/// A face from an OpenType font file or collection.
pub struct OpenTypeFace {
    data: Blob<u8>,
    index: u32,
    postscript_name: String,
    units_per_em: f32,
    scalable: bool,
    color: bool,
    legacy_kerning: bool,
    strikes: SmallVec<[f32; 4]>,
    features: Vec<[u8; 4]>,
    shaper_data: ShaperData,
    plans: RefCell<LruCache<PlanId, ShapePlan>>,
    scale_context: RefCell<ScaleContext>,
}

impl OpenTypeFace {
    /// Parses the face at `index` of a font file or collection.
    pub fn new(data: Blob<u8>, index: u32) -> Option<Self> {
        let font = skrifa::FontRef::from_index(data.as_ref(), index).ok()?;
        let shaper_font = harfrust::FontRef::from_index(data.as_ref(), index).ok()?;
        let shaper_data = ShaperData::new(&shaper_font);

        let postscript_name = font
            .localized_strings(StringId::POSTSCRIPT_NAME)
            .english_or_first()
            .map(|name| name.to_string())
            .unwrap_or_default();
        let units_per_em = font.head().ok()?.units_per_em();
        let has_table = |tag: &[u8; 4]| font.table_data(Tag::new(tag)).is_some();
        let scalable = has_table(b"glyf") || has_table(b"CFF ") || has_table(b"CFF2");
        let color = has_table(b"COLR") || has_table(b"CBDT") || has_table(b"sbix");
        let legacy_kerning = has_table(b"kern");

        let mut strikes: SmallVec<[f32; 4]> =
            BitmapStrikes::new(&font).iter().map(|s| s.ppem()).collect();
        strikes.sort_by(f32::total_cmp);
        strikes.dedup();

        let mut features = Vec::new();
        if let Ok(gsub) = font.gsub() {
            if let Ok(list) = gsub.feature_list() {
                features.extend(
                    list.feature_records()
                        .iter()
                        .map(|r| r.feature_tag().to_be_bytes()),
                );
            }
        }
        if let Ok(gpos) = font.gpos() {
            if let Ok(list) = gpos.feature_list() {
                features.extend(
                    list.feature_records()
                        .iter()
                        .map(|r| r.feature_tag().to_be_bytes()),
                );
            }
        }
        features.sort_unstable();
        features.dedup();

        Some(Self {
            data,
            index,
            postscript_name,
            units_per_em: f32::from(units_per_em.max(1)),
            scalable,
            color,
            legacy_kerning,
            strikes,
            features,
            shaper_data,
            plans: RefCell::new(LruCache::new(MAX_CACHED_PLANS)),
            scale_context: RefCell::new(ScaleContext::new()),
        })
    }

    /// Returns the number of faces in a font file or collection.
    pub fn face_count(data: &[u8]) -> u32 {
        match read_fonts::FileRef::new(data) {
            Ok(read_fonts::FileRef::Font(_)) => 1,
            Ok(read_fonts::FileRef::Collection(collection)) => collection.len(),
            Err(_) => 0,
        }
    }

    /// Index of this face within its file.
    pub fn index(&self) -> u32 {
        self.index
    }

    fn font(&self) -> Option<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(self.data.as_ref(), self.index).ok()
    }

    fn kern_table(&self) -> Option<Kern<'_>> {
        read_fonts::FontRef::from_index(self.data.as_ref(), self.index)
            .ok()?
            .kern()
            .ok()
    }
}

/// Sum of the horizontal format 0 pair adjustments for `(left, right)`, in
/// font units.
fn kern_pair(kern: &Kern<'_>, left: GlyphId, right: GlyphId) -> Option<i32> {
    let left = read_fonts::types::GlyphId::new(left);
    let right = read_fonts::types::GlyphId::new(right);
    let mut total = None;
    for subtable in kern.subtables().flatten() {
        if !subtable.is_horizontal() || subtable.is_cross_stream() {
            continue;
        }
        if let Ok(SubtableKind::Format0(pairs)) = subtable.kind() {
            if let Some(value) = pairs.kerning(left, right) {
                total = Some(total.unwrap_or(0) + value);
            }
        }
    }
    total
}

impl fmt::Debug for OpenTypeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenTypeFace")
            .field("postscript_name", &self.postscript_name)
            .field("index", &self.index)
            .field("scalable", &self.scalable)
            .field("color", &self.color)
            .field("strikes", &self.strikes)
            .finish_non_exhaustive()
    }
}

impl FontFace for OpenTypeFace {
    fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    fn is_scalable(&self) -> bool {
        self.scalable
    }

    fn is_color(&self) -> bool {
        self.color
    }

    fn glyph_index(&self, ch: char) -> Option<GlyphId> {
        self.font()?.charmap().map(ch).map(|id| id.to_u32())
    }

    fn has_feature(&self, tag: [u8; 4]) -> bool {
        self.features.binary_search(&tag).is_ok()
    }

    fn select_size(&self, size: f32) -> f32 {
        if self.scalable || self.strikes.is_empty() {
            return size;
        }
        // Closest strike, the smaller one on ties.
        self.strikes
            .iter()
            .copied()
            .min_by(|a, b| (a - size).abs().total_cmp(&(b - size).abs()))
            .unwrap_or(size)
    }

    fn metrics(&self, size: f32) -> FaceMetrics {
        let Some(font) = self.font() else {
            return FaceMetrics::default();
        };
        let metrics = font.metrics(Size::new(size), LocationRef::default());
        let (underline_position, underline_thickness) = metrics
            .underline
            .map(|d| (d.offset, d.thickness))
            .unwrap_or((-size / 10.0, size / 20.0));
        FaceMetrics {
            ascender: metrics.ascent,
            descender: metrics.descent,
            height: metrics.ascent - metrics.descent + metrics.leading,
            underline_position,
            underline_thickness,
        }
    }

    fn has_kerning(&self) -> bool {
        self.legacy_kerning
    }

    fn kerning(&self, left: GlyphId, right: GlyphId, size: f32) -> f32 {
        let Some(kern) = self.kern_table() else {
            return 0.0;
        };
        kern_pair(&kern, left, right)
            .map(|units| units as f32 * size / self.units_per_em)
            .unwrap_or_default()
    }

    fn glyph_advance(&self, glyph: GlyphId, size: f32) -> f32 {
        self.font()
            .and_then(|font| {
                font.glyph_metrics(Size::new(size), LocationRef::default())
                    .advance_width(SkrifaGlyphId::new(glyph))
            })
            .unwrap_or_default()
    }

    fn glyph_bearing(&self, glyph: GlyphId, size: f32) -> (f32, f32) {
        self.font()
            .and_then(|font| {
                font.glyph_metrics(Size::new(size), LocationRef::default())
                    .bounds(SkrifaGlyphId::new(glyph))
            })
            .map(|bounds| (bounds.x_min, bounds.y_max))
            .unwrap_or_default()
    }

    fn shape(
        &self,
        text: &[char],
        size: f32,
        features: &[FontFeature],
        rtl: bool,
    ) -> Vec<ShapedGlyph> {
        let Ok(font) = harfrust::FontRef::from_index(self.data.as_ref(), self.index) else {
            return Vec::new();
        };
        let shaper = self.shaper_data.shaper(&font).point_size(Some(size)).build();

        let mut buffer = UnicodeBuffer::new();
        buffer.reserve(text.len());
        for (i, ch) in text.iter().enumerate() {
            buffer.add(*ch, u32::try_from(i).unwrap_or(u32::MAX));
        }
        buffer.guess_segment_properties();
        let direction = if rtl {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        };
        buffer.set_direction(direction);
        let script = buffer.script();

        let features: SmallVec<[Feature; 8]> = features
            .iter()
            .map(|f| Feature::new(harfrust::Tag::new(&f.tag), f.value, ..))
            .collect();

        let mut plans = self.plans.borrow_mut();
        let plan = plans.entry(
            PlanKey {
                direction,
                script,
                features: &features,
            },
            || ShapePlan::new(&shaper, direction, Some(script), None, &features),
        );
        let glyphs = shaper.shape_with_plan(plan, buffer, &features);

        let scale = size / self.units_per_em;
        glyphs
            .glyph_infos()
            .iter()
            .zip(glyphs.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                id: info.glyph_id,
                cluster: info.cluster,
                x_advance: pos.x_advance as f32 * scale,
            })
            .collect()
    }

    fn render_glyph(&self, glyph: GlyphId, request: &RenderRequest) -> Option<GlyphImage> {
        let font = swash::FontRef::from_index(self.data.as_ref(), self.index as usize)?;
        let id = u16::try_from(glyph).ok()?;
        let mut context = self.scale_context.borrow_mut();
        let mut scaler = context
            .builder(font)
            .size(request.size)
            .hint(request.hint)
            .build();
        let image = Render::new(&[
            Source::ColorOutline(0),
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
        ])
        .format(zeno::Format::Alpha)
        .offset(zeno::Vector::new(request.offset.0, request.offset.1))
        .render(&mut scaler, id)?;

        let pixels = match image.content {
            Content::Mask => GlyphPixels::Mask(image.data),
            Content::SubpixelMask => {
                GlyphPixels::Mask(image.data.chunks_exact(4).map(|px| px[3]).collect())
            }
            Content::Color => {
                GlyphPixels::Color(image.data.chunks_exact(4).map(premultiply).collect())
            }
        };
        Some(GlyphImage {
            left: image.placement.left,
            top: image.placement.top,
            width: image.placement.width,
            height: image.placement.height,
            pixels,
            lsb_delta: 0.0,
            rsb_delta: 0.0,
            // Strikes of bitmap-only faces come back at their native size.
            is_bitmap: !self.scalable,
        })
    }
}

/// Converts a straight RGBA pixel to premultiplied `0xAABBGGRR`.
fn premultiply(px: &[u8]) -> u32 {
    let a = u32::from(px[3]);
    let mul = |c: u8| (u32::from(c) * a + 127) / 255;
    mul(px[0]) | (mul(px[1]) << 8) | (mul(px[2]) << 16) | (a << 24)
}
