// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaping, typesetting and drawing of whole texts.

use hashbrown::HashMap;
use letterpress_fonts::{FaceTable, FontManager};

use crate::bounds::{
    compute_draw_bounds, preserve_fixed_dimensions, resolve_baseline_offset,
    resolve_baseline_position, resolve_vertical_offset, round_caret, stretch_bounds,
    stretched_bounds,
};
use crate::config::Config;
use crate::error::{DrawError, ShapeError};
use crate::format::{BaselinePolicy, BoundsMode, FormattingParams, OverflowPolicy, VerticalAlign};
use crate::geometry::{
    inverse_or_zero, narrow, outer_rect, trunc_px, Affine, IPoint, IRect, Point, Rect, Vec2,
    INFINITE_BOUNDS,
};
use crate::layout::{DrawResult, LastLinePolicy, VerticalPositioning};
use crate::paragraph::split_text;
use crate::placed::{
    draw_decoration, render_placed_glyph, PlacedDecoration, PlacedGlyph, PlacedTextData,
};
use crate::raster::RgbaTarget;
use crate::shape::ParagraphShape;
use crate::text::FormattedText;

/// Where a draw landed.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DrawOutput {
    /// Pixel bounds of the drawn bitmap in scaled text space.
    pub bounds: IRect,
    /// Text space to canvas transform.
    pub transform: Affine,
}

/// A text with the frame and transform it is shaped into.
#[derive(Clone, Debug, Default)]
pub(crate) struct TextShapeInput {
    pub(crate) text: FormattedText,
    pub(crate) frame_size: Option<(f32, f32)>,
    pub(crate) transform: Affine,
    used_faces: Vec<String>,
}

impl TextShapeInput {
    pub(crate) fn new(
        text: FormattedText,
        frame_size: Option<(f32, f32)>,
        transform: Affine,
    ) -> Self {
        let used_faces = text.collect_used_face_names();
        Self {
            text,
            frame_size,
            transform,
            used_faces,
        }
    }

    /// Returns `true` if reloading `face` may change the result.
    pub(crate) fn uses_face(&self, face: &str) -> bool {
        self.used_faces.iter().any(|f| f == face)
    }
}

/// Shaped paragraphs with their resolved frame.
#[derive(Clone, Debug, Default)]
pub(crate) struct TextShapeData {
    pub(crate) shapes: Vec<ParagraphShape>,
    pub(crate) bounds_no_transform: Rect,
    pub(crate) baseline: f32,
}

/// Vertical placement of the typeset glyphs.
struct VerticalLayout {
    /// Offset applied by the vertical alignment.
    offset: f32,
    /// Union of the glyph bitmaps, empty when it does not matter.
    stretched: IRect,
}

fn resolve_vertical_layout(
    config: &Config,
    params: &FormattingParams,
    results: &[DrawResult],
    bounds: Rect,
    caret: f32,
    scale: f32,
) -> VerticalLayout {
    let (first, last) = match results {
        [first, .., last] => (first, last),
        [only] => (only, only),
        [] => {
            return VerticalLayout {
                offset: 0.0,
                stretched: IRect::default(),
            };
        }
    };
    let text_bottom = caret - last.last_line_descender;
    let baseline_offset =
        resolve_baseline_offset(first, params.baseline_policy, params.vertical_align);
    let offset = resolve_vertical_offset(
        params.bounds_mode,
        params.vertical_align,
        narrow(bounds.height()),
        text_bottom,
        baseline_offset * scale,
    );

    let unlimited = params.overflow_policy == OverflowPolicy::ExtendAll
        || params.bounds_mode == BoundsMode::AutoHeight
        || params.vertical_align != VerticalAlign::Top
        || config.infinite_vertical_stretch;
    let limit = if unlimited { 0 } else { trunc_px(bounds.height()) };
    let stretched = if params.bounds_mode != BoundsMode::Fixed
        || params.overflow_policy != OverflowPolicy::NoOverflow
    {
        stretched_bounds(results, trunc_px(offset), limit)
    } else {
        IRect::default()
    };
    VerticalLayout { offset, stretched }
}

/// Typesets every paragraph below the previous one.
fn draw_paragraphs(
    faces: &FaceTable,
    config: &Config,
    shapes: &[ParagraphShape],
    overflow: OverflowPolicy,
    width: i32,
    scale: f32,
    mut positioning: VerticalPositioning,
    y: &mut f32,
) -> Vec<DrawResult> {
    let mut results = Vec::with_capacity(shapes.len());
    for (i, shape) in shapes.iter().enumerate() {
        let last = i + 1 == shapes.len();
        let mut result = shape.draw(faces, config, width, y, &mut positioning, scale, last);
        if overflow == OverflowPolicy::ClipLine
            && config.cut_last_line
            && result.journal.line_count() > 1
        {
            result.journal.set_last_line_policy(LastLinePolicy::Cut);
        }
        results.push(result);
    }
    results
}

/// Shapes and typesets a text at scale one, resolving its frame and first
/// baseline.
pub(crate) fn shape_text(
    fonts: &mut FontManager,
    config: &Config,
    input: &TextShapeInput,
) -> Result<(TextShapeData, Vec<DrawResult>), ShapeError> {
    let text = &input.text;
    let params = text.params();
    let paragraphs = split_text(text, fonts);
    if paragraphs.is_empty() {
        return Err(ShapeError::no_paragraphs());
    }

    let mut max_width = match (params.bounds_mode, input.frame_size) {
        (BoundsMode::AutoWidth, _) | (_, None) => 0.0,
        (_, Some((w, _))) => w,
    };
    let load_bearing = params.baseline_policy == BaselinePolicy::OffsetBearing;
    let faces = fonts.faces();
    let shapes: Vec<ParagraphShape> = paragraphs
        .iter()
        .filter_map(|paragraph| {
            let mut shape = ParagraphShape::new(load_bearing);
            shape.shape(paragraph, faces, max_width).success.then_some(shape)
        })
        .collect();
    if shapes.is_empty() {
        return Err(ShapeError::shape(paragraphs.len()));
    }

    let mut y = 0.0;
    let mut results = draw_paragraphs(
        faces,
        config,
        &shapes,
        params.overflow_policy,
        trunc_px(max_width.floor()),
        1.0,
        VerticalPositioning::TopBound,
        &mut y,
    );
    if params.bounds_mode == BoundsMode::AutoWidth {
        log::debug!("running second pass for text '{}'", text.preview());
        y = 0.0;
        max_width = results.iter().map(|r| r.max_line_width).fold(0.0, f32::max);
        results = draw_paragraphs(
            faces,
            config,
            &shapes,
            params.overflow_policy,
            trunc_px(max_width.floor()),
            1.0,
            VerticalPositioning::TopBound,
            &mut y,
        );
    }
    let (Some(first), Some(last)) = (results.first(), results.last()) else {
        return Err(ShapeError::typeset(shapes.len()));
    };

    if config.last_line_descender_offset {
        y = (y - last.last_line_descender).round();
    }
    let first_line_height = if config.prefer_real_line_height_over_explicit {
        first.first_ascender + first.first_descender
    } else {
        first.first_line_height
    };
    let mut h = y.ceil().max(first_line_height.round());
    let mut w = results
        .iter()
        .map(|r| r.max_line_width.floor())
        .fold(0.0, f32::max);
    let (l, t) = if params.baseline_policy == BaselinePolicy::Set {
        (-first.left_first.floor(), -first.first_ascender.round())
    } else {
        (0.0, 0.0)
    };
    preserve_fixed_dimensions(params.bounds_mode, input.frame_size, &mut w, &mut h);

    let bounds_no_transform =
        Rect::from_origin_size((f64::from(l), f64::from(t)), (f64::from(w), f64::from(h)));
    let baseline = resolve_baseline_position(first, params.baseline_policy, params.vertical_align);
    let data = TextShapeData {
        shapes,
        bounds_no_transform,
        baseline,
    };
    Ok((data, results))
}

/// Typesets a shaped text at `scale` straight into `target`.
///
/// Without a target only the bounds of the bitmap are computed.
pub(crate) fn draw_text(
    faces: &FaceTable,
    config: &Config,
    input: &TextShapeInput,
    data: &TextShapeData,
    scale: f32,
    view_area: Option<IRect>,
    target: Option<&mut RgbaTarget<'_>>,
) -> Result<DrawOutput, DrawError> {
    if input.text.is_empty() {
        return Ok(DrawOutput::default());
    }
    let view = match view_area {
        Some(view) => inverse_or_zero(input.transform)
            .transform_rect_bbox(view.to_rect())
            .scale_from_origin(f64::from(scale)),
        None => INFINITE_BOUNDS.to_rect(),
    };
    let params = input.text.params();

    let bounds = data.bounds_no_transform.scale_from_origin(f64::from(scale));
    if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
        return Err(DrawError::invalid_scale(scale));
    }
    let mut caret = round_caret(data.baseline * scale, config.floor_baseline);
    let results = draw_paragraphs(
        faces,
        config,
        &data.shapes,
        params.overflow_policy,
        trunc_px(bounds.width()),
        scale,
        VerticalPositioning::Baseline,
        &mut caret,
    );
    if results.is_empty() {
        return Err(DrawError::paragraphs_typesetting(scale));
    }

    let vertical = resolve_vertical_layout(config, params, &results, bounds, caret, scale);
    let stretched_text = stretch_bounds(bounds, vertical.stretched);
    let mut bitmap_bounds = outer_rect(stretched_text);
    if !bitmap_bounds.is_non_empty() {
        return Err(DrawError::draw_bounds(scale));
    }
    let cutout = config.enable_view_area_cutout;
    if cutout {
        bitmap_bounds = outer_rect(view.intersect(stretched_text));
    }
    let output = DrawOutput {
        bounds: bitmap_bounds,
        transform: input.transform,
    };
    let Some(target) = target else {
        return Ok(output);
    };

    let mut offset = IPoint::new(0, 0);
    let mut view_bounds = INFINITE_BOUNDS;
    if cutout {
        let relative = outer_rect(stretched_text).relative_to(bitmap_bounds);
        offset = IPoint::new(relative.l, relative.t);
        view_bounds = outer_rect(view);
    }
    offset.y += trunc_px(vertical.offset - vertical.stretched.t as f32);

    let text_height = trunc_px(stretched_text.height());
    let drawn: usize = results
        .iter()
        .map(|r| r.journal.draw(target, bitmap_bounds, text_height, view_bounds, offset))
        .sum();
    log::trace!("blitted {drawn} glyphs");
    Ok(output)
}

/// Shapes a text and extracts its placed glyphs and decorations.
pub(crate) fn shape_placed_text(
    fonts: &mut FontManager,
    config: &Config,
    input: &TextShapeInput,
) -> Result<PlacedTextData, ShapeError> {
    let (data, results) = shape_text(fonts, config, input).inspect_err(|err| {
        log::error!("text shaping failed: {err}");
    })?;
    let params = input.text.params();
    let bounds = data.bounds_no_transform;

    let caret = round_caret(data.baseline, config.floor_baseline);
    let vertical = resolve_vertical_layout(config, params, &results, bounds, caret, 1.0);
    let va_offset = f64::from(vertical.offset - vertical.stretched.t as f32);

    let mut glyphs: HashMap<String, Vec<PlacedGlyph>> = HashMap::new();
    let mut decorations = Vec::new();
    let source = input.text.text();
    let mut index = 0;

    for (shape, result) in data.shapes.iter().zip(&results) {
        let lines = &result.journal.lines;
        if shape.line_spans.len() != lines.len() {
            log::warn!("typeset line count does not match the shaped paragraph");
            continue;
        }
        for (span, record) in shape.line_spans.iter().zip(lines) {
            if span.len() != record.glyphs.len() {
                log::warn!("typeset glyph count does not match the line");
                continue;
            }
            let on_line = span
                .visual_runs
                .iter()
                .flat_map(|run| run.start..run.end)
                .map(|i| shape.glyphs.get(i));
            for (glyph_shape, glyph) in on_line.zip(&record.glyphs) {
                let (Some(glyph_shape), Some(glyph)) = (glyph_shape, glyph) else {
                    index += 1;
                    continue;
                };
                let bitmap = glyph.bitmap_bounds();
                if !bitmap.is_non_empty() {
                    index += 1;
                    continue;
                }
                while index < source.len() && source[index] != glyph_shape.source_character {
                    index += 1;
                }
                glyphs
                    .entry(glyph_shape.format.face.clone())
                    .or_default()
                    .push(PlacedGlyph {
                        codepoint: glyph_shape.codepoint,
                        color: glyph_shape.format.color,
                        font_size: glyph_shape.format.size,
                        index,
                        origin: glyph.origin + Vec2::new(0.0, va_offset),
                        bitmap_box: bitmap.to_rect() + Vec2::new(0.0, va_offset),
                    });
                index += 1;
            }
            for record in &record.decorations {
                let y = f64::from(record.offset) + va_offset;
                decorations.push(PlacedDecoration {
                    decoration: record.decoration,
                    color: record.color,
                    start: Point::new(f64::from(record.range.0), y),
                    end: Point::new(f64::from(record.range.1), y),
                    thickness: record.thickness,
                });
            }
        }
    }

    let centered = Rect::new(0.0, 0.0, bounds.width(), bounds.height());
    Ok(PlacedTextData {
        glyphs,
        decorations,
        bounds: stretch_bounds(centered, vertical.stretched),
        transform: Affine::translate((bounds.x0, bounds.y0)) * input.transform,
        baseline: data.baseline,
    })
}

fn placed_draw_bounds(config: &Config, placed: &PlacedTextData, scale: f32, view: Rect) -> IRect {
    let stretched = placed.bounds.scale_from_origin(f64::from(scale));
    compute_draw_bounds(stretched, view, config.enable_view_area_cutout)
}

fn placed_view(view_area: Option<IRect>, scale: f32) -> Rect {
    match view_area {
        Some(view) => view.to_rect().scale_from_origin(f64::from(scale)),
        None => INFINITE_BOUNDS.to_rect(),
    }
}

/// Size of the bitmap [`draw_placed_text`] fills.
pub(crate) fn placed_buffer_dimensions(
    config: &Config,
    placed: &PlacedTextData,
    scale: f32,
    view_area: Option<IRect>,
) -> (i32, i32) {
    let bounds = placed_draw_bounds(config, placed, scale, placed_view(view_area, scale));
    (bounds.w, bounds.h)
}

/// Renders placed glyphs and decorations at `scale` into `target`.
pub(crate) fn draw_placed_text(
    faces: &FaceTable,
    config: &Config,
    placed: &PlacedTextData,
    scale: f32,
    view_area: Option<IRect>,
    target: &mut RgbaTarget<'_>,
) -> Result<DrawOutput, DrawError> {
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(DrawError::invalid_scale(scale));
    }
    let view = placed_view(view_area, scale);
    let view_bounds = if config.enable_view_area_cutout {
        outer_rect(view)
    } else {
        INFINITE_BOUNDS
    };

    let mut keys: Vec<&String> = placed.glyphs.keys().collect();
    keys.sort();
    for key in keys {
        let Some(face) = faces.face(key) else {
            log::warn!("missing font face \"{key}\" while drawing placed text");
            continue;
        };
        for glyph in &placed.glyphs[key] {
            let Some(rendered) = render_placed_glyph(face, glyph, scale, !config.disable_hinting)
            else {
                continue;
            };
            if (rendered.bitmap_bounds() & view_bounds).is_non_empty() {
                rendered.blit(target, IPoint::new(0, 0));
            }
        }
    }
    for decoration in &placed.decorations {
        draw_decoration(target, decoration, scale);
    }

    Ok(DrawOutput {
        bounds: placed_draw_bounds(config, placed, scale, view),
        transform: placed.transform,
    })
}

