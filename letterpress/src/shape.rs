// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaping paragraphs into glyphs.

use core::ops::Range;

use hashbrown::HashMap;
use letterpress_fonts::{FaceMetrics, FaceTable, FontFeature, GlyphId};

use crate::analysis::{
    is_soft_break, line_break_opportunities, VisualRun, ZERO_WIDTH_JOINER,
};
use crate::format::{ImmediateFormat, TextDirection};
use crate::layout::{LineBreaker, LineSpan};
use crate::paragraph::FormattedParagraph;

/// Why a face was reported while shaping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReportedFontReason {
    /// The face is not loaded.
    NoData,
    /// The face is registered under a key other than its PostScript name.
    PostScriptNameMismatch,
    /// The face lacks a glyph for some character.
    MissingGlyph,
}

/// A shaped glyph with its format and metrics, in user space pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphShape {
    /// Format of the source character.
    pub format: ImmediateFormat,
    /// Glyph identifier within the face.
    pub codepoint: GlyphId,
    /// The character the glyph was shaped from.
    pub character: char,
    /// The same character as it appears in the source text.
    pub source_character: char,
    /// Text colour.
    pub color: u32,
    /// Direction of the shaped run.
    pub direction: TextDirection,
    /// Horizontal advance.
    pub advance: f32,
    /// Face ascender.
    pub ascender: f32,
    /// Face descender, negative.
    pub descender: f32,
    /// Effective line height.
    pub line_height: f32,
    /// Line height recommended by the face.
    pub default_line_height: f32,
    /// Horizontal bearing of the outline, when loaded.
    pub bearing_x: f32,
    /// Vertical bearing of the outline, when loaded.
    pub bearing_y: f32,
    /// Whether a line may start at this glyph, when break data is available.
    pub line_start: Option<bool>,
}

impl GlyphShape {
    fn apply_resize_factor(&mut self, k: f32) {
        self.default_line_height *= k;
        self.advance *= k;
        self.ascender *= k;
        self.descender *= k;
        self.line_height *= k;
    }

    pub(crate) fn scaled(&self, scale: f32) -> ScaledGlyph {
        ScaledGlyph {
            advance: self.advance * scale,
            ascender: self.ascender * scale,
            size: (self.format.size * scale).ceil(),
            letter_spacing: self.format.letter_spacing * scale,
        }
    }
}

/// The metrics of a glyph at a render scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct ScaledGlyph {
    pub(crate) advance: f32,
    pub(crate) ascender: f32,
    pub(crate) size: f32,
    pub(crate) letter_spacing: f32,
}

/// Outcome of shaping one paragraph.
#[derive(Clone, Debug, Default)]
pub struct ShapeResult {
    /// Whether the paragraph produced glyphs and lines.
    pub success: bool,
    /// Faces used by the paragraph, with their fallback flag.
    pub fallbacks: HashMap<String, bool>,
}

/// A shaped and line broken paragraph.
#[derive(Clone, Debug, Default)]
pub struct ParagraphShape {
    pub(crate) glyphs: Vec<GlyphShape>,
    pub(crate) line_spans: Vec<LineSpan>,
    pub(crate) runs: Vec<VisualRun>,
    pub(crate) base_direction: TextDirection,
    reported_faces: HashMap<String, ReportedFontReason>,
    pub(crate) load_bearing: bool,
}

impl ParagraphShape {
    /// Creates an empty shape. Outline bearings are queried when
    /// `load_bearing` is set.
    pub fn new(load_bearing: bool) -> Self {
        Self {
            load_bearing,
            ..Default::default()
        }
    }

    /// The glyphs, in logical order.
    pub fn glyphs(&self) -> &[GlyphShape] {
        &self.glyphs
    }

    /// The lines, in order.
    pub fn line_spans(&self) -> &[LineSpan] {
        &self.line_spans
    }

    /// Faces reported during shaping and why.
    pub fn reported_faces(&self) -> &HashMap<String, ReportedFontReason> {
        &self.reported_faces
    }

    /// Shapes the paragraph and breaks it into lines at most `width` wide.
    ///
    /// A width of zero disables wrapping.
    pub fn shape(
        &mut self,
        paragraph: &FormattedParagraph,
        faces: &FaceTable,
        width: f32,
    ) -> ShapeResult {
        let mut result = ShapeResult::default();
        if paragraph.text.len() != paragraph.formats.len() {
            log::warn!("paragraph format does not match its text");
            return result;
        }
        self.base_direction = paragraph.base_direction;
        let breaks = line_break_opportunities(&paragraph.text);

        // Source character of every glyph.
        let mut clusters = Vec::new();
        let len = paragraph.text.len();
        let mut pos = 0;
        while pos < len {
            let start = pos;
            pos += 1;
            while pos < len && paragraph.formats[pos].same_glyph_format(&paragraph.formats[start]) {
                pos += 1;
            }
            self.shape_sequence(
                start..pos,
                paragraph,
                faces,
                breaks.as_deref(),
                &mut clusters,
                &mut result,
            );
        }
        self.runs = map_runs_to_glyphs(&paragraph.runs, &clusters);

        #[expect(
            clippy::cast_possible_truncation,
            reason = "frame widths fit in i32"
        )]
        let max_width = width.floor() as i32;
        let lines =
            LineBreaker::new(&self.glyphs, &self.runs, self.base_direction).break_lines(max_width);
        if lines.is_empty() {
            log::warn!("paragraph breaking produced no lines");
            return result;
        }
        self.line_spans = lines;
        result.success = !self.glyphs.is_empty();
        result
    }

    fn report(&mut self, face: &str, reason: ReportedFontReason) -> bool {
        if self.reported_faces.contains_key(face) {
            return false;
        }
        self.reported_faces.insert(face.to_string(), reason);
        true
    }

    fn shape_sequence(
        &mut self,
        range: Range<usize>,
        paragraph: &FormattedParagraph,
        faces: &FaceTable,
        breaks: Option<&[bool]>,
        clusters: &mut Vec<usize>,
        result: &mut ShapeResult,
    ) {
        let format = &paragraph.formats[range.start];
        let Some(entry) = faces.get(&format.face) else {
            if self.report(&format.face, ReportedFontReason::NoData) {
                log::warn!("missing font face \"{}\"", format.face);
            }
            return;
        };
        result
            .fallbacks
            .insert(format.face.clone(), entry.is_fallback());
        let face = entry.face();
        if face.postscript_name() != format.face {
            self.report(&format.face, ReportedFontReason::PostScriptNameMismatch);
        }

        let size = face.select_size(format.size);
        let resize = if size != format.size && size > 0.0 {
            format.size / size
        } else {
            1.0
        };

        for feature in &format.features {
            if !face.has_feature(feature.tag) {
                log::warn!("missing OpenType feature: {feature}");
            }
        }
        let features = setup_features(format);
        let rtl = format.direction.is_rtl();
        let mut shaped = face.shape(&paragraph.text[range.clone()], size, &features, rtl);
        if rtl {
            shaped.reverse();
        }

        let metrics = face.metrics(size);
        let mut missing_glyph = false;
        for glyph in shaped {
            let p = range.start + glyph.cluster as usize;
            if p >= range.end {
                continue;
            }
            let character = paragraph.text[p];
            if character == ZERO_WIDTH_JOINER {
                continue;
            }
            let fmt = &paragraph.formats[p];
            let advance = if glyph.x_advance != 0.0 {
                glyph.x_advance
            } else {
                face.glyph_advance(glyph.id, size)
            };
            let (bearing_x, bearing_y) = if self.load_bearing {
                face.glyph_bearing(glyph.id, size)
            } else {
                (0.0, 0.0)
            };
            if glyph.id == 0 && !is_soft_break(character) {
                missing_glyph = true;
            }
            let mut shape = GlyphShape {
                format: fmt.clone(),
                codepoint: glyph.id,
                character,
                source_character: paragraph.source[p],
                color: fmt.color,
                direction: if rtl {
                    TextDirection::RightToLeft
                } else {
                    TextDirection::LeftToRight
                },
                advance,
                ascender: metrics.ascender,
                descender: metrics.descender,
                line_height: eval_line_height(fmt, &metrics),
                default_line_height: metrics.height,
                bearing_x,
                bearing_y,
                line_start: breaks.and_then(|b| b.get(p).copied()),
            };
            if !face.is_scalable() {
                shape.apply_resize_factor(resize);
            }
            clusters.push(p);
            self.glyphs.push(shape);
        }
        if missing_glyph {
            self.report(&format.face, ReportedFontReason::MissingGlyph);
        }
    }
}

/// Features derived from the format, followed by the user features.
fn setup_features(format: &ImmediateFormat) -> Vec<FontFeature> {
    let liga = u32::from(format.ligatures.standard());
    let alt = u32::from(format.ligatures.alternative());
    let mut features = vec![
        FontFeature::new(*b"liga", liga),
        FontFeature::new(*b"dlig", alt),
        FontFeature::new(*b"hlig", alt),
        FontFeature::new(*b"clig", alt),
        FontFeature::new(*b"kern", u32::from(format.kerning)),
    ];
    features.extend_from_slice(&format.features);
    features
}

/// Line height of a glyph: the explicit one, or the face's, within the
/// format's bounds.
fn eval_line_height(format: &ImmediateFormat, metrics: &FaceMetrics) -> f32 {
    let mut lh = format.line_height;
    if lh == 0.0 {
        lh = metrics.height;
        if lh == format.size {
            // The face height carries no leading, use the ascender to
            // descender span instead.
            lh = metrics.ascender - metrics.descender;
        }
    }
    if format.min_line_height > 0.0 {
        lh = lh.max(format.min_line_height);
    }
    if format.max_line_height > 0.0 {
        lh = lh.min(format.max_line_height);
    }
    lh
}

/// Converts character ranged runs into glyph ranged runs.
///
/// `clusters` holds the source character of every glyph, ascending.
fn map_runs_to_glyphs(runs: &[VisualRun], clusters: &[usize]) -> Vec<VisualRun> {
    runs.iter()
        .filter_map(|run| {
            let start = clusters.partition_point(|&c| c < run.start);
            let end = clusters.partition_point(|&c| c < run.end);
            (start < end).then(|| VisualRun::new(start, end, run.direction))
        })
        .collect()
}
