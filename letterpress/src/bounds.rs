// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text frame, baseline and vertical alignment resolution.

use crate::format::{BaselinePolicy, BoundsMode, VerticalAlign};
use crate::geometry::{outer_rect, IRect, Rect};
use crate::layout::DrawResult;

/// Union of the glyph bitmaps of every paragraph.
///
/// A `limit` that is not positive leaves the bounds vertically unlimited.
pub(crate) fn stretched_bounds(results: &[DrawResult], y_offset: i32, limit: i32) -> IRect {
    results.iter().fold(IRect::default(), |bounds, result| {
        bounds | result.journal.stretched_bounds(y_offset, limit)
    })
}

/// Grows `base` upwards and downwards to cover `stretch`.
///
/// The horizontal extent of `base` is kept.
pub(crate) fn stretch_bounds(base: Rect, stretch: IRect) -> Rect {
    let top = base.y0 + f64::from(stretch.t.min(0));
    let height = base.height().max(f64::from(stretch.h));
    Rect::new(base.x0, top, base.x1, top + height)
}

/// Replaces the measured size by the frame size where the bounds mode fixes
/// it.
pub(crate) fn preserve_fixed_dimensions(
    mode: BoundsMode,
    frame_size: Option<(f32, f32)>,
    w: &mut f32,
    h: &mut f32,
) {
    let Some((fw, fh)) = frame_size else {
        return;
    };
    if mode == BoundsMode::AutoWidth {
        return;
    }
    if fw != 0.0 {
        *w = fw;
    }
    if mode == BoundsMode::Fixed && fh != 0.0 {
        *h = fh;
    }
}

/// Extra distance of the first baseline from the top that centers the
/// glyphs in their first line.
pub(crate) fn resolve_baseline_offset(
    first: &DrawResult,
    policy: BaselinePolicy,
    vertical_align: VerticalAlign,
) -> f32 {
    if policy != BaselinePolicy::Center || vertical_align == VerticalAlign::Center {
        return 0.0;
    }
    let line_height = if first.first_line_height != 0.0 {
        first.first_line_height
    } else {
        first.first_line_default_height
    };
    0.5 * (line_height - first.first_ascender + first.first_descender)
}

/// Distance of the first baseline from the top of the text.
pub(crate) fn resolve_baseline_position(
    first: &DrawResult,
    policy: BaselinePolicy,
    vertical_align: VerticalAlign,
) -> f32 {
    match policy {
        BaselinePolicy::Set | BaselinePolicy::OffsetAscender => first.first_ascender,
        BaselinePolicy::OffsetBearing => first.first_line_bearing,
        BaselinePolicy::Center => {
            first.first_line_bearing + resolve_baseline_offset(first, policy, vertical_align)
        }
    }
}

/// Offset moving the text down inside a fixed frame.
pub(crate) fn resolve_vertical_offset(
    mode: BoundsMode,
    vertical_align: VerticalAlign,
    frame_height: f32,
    text_bottom: f32,
    baseline_offset: f32,
) -> f32 {
    if mode != BoundsMode::Fixed {
        return 0.0;
    }
    match vertical_align {
        VerticalAlign::Top => 0.0,
        VerticalAlign::Center => ((frame_height - text_bottom) * 0.5).floor(),
        VerticalAlign::Bottom => (frame_height - text_bottom - baseline_offset).floor(),
    }
}

pub(crate) fn round_caret(position: f32, floor_baseline: bool) -> f32 {
    if floor_baseline {
        position.floor()
    } else {
        position.round()
    }
}

/// Pixel bounds of a draw, cut to the view area when `cutout` is set.
pub(crate) fn compute_draw_bounds(stretched: Rect, view_area: Rect, cutout: bool) -> IRect {
    if cutout {
        outer_rect(view_area.intersect(stretched))
    } else {
        outer_rect(stretched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_frames_keep_their_size() {
        let frame = Some((40.0, 30.0));
        let (mut w, mut h) = (25.0, 12.0);
        preserve_fixed_dimensions(BoundsMode::Fixed, frame, &mut w, &mut h);
        assert_eq!((w, h), (40.0, 30.0), "both fixed");

        let (mut w, mut h) = (25.0, 12.0);
        preserve_fixed_dimensions(BoundsMode::AutoHeight, frame, &mut w, &mut h);
        assert_eq!((w, h), (40.0, 12.0), "height follows the text");

        let (mut w, mut h) = (25.0, 12.0);
        preserve_fixed_dimensions(BoundsMode::AutoWidth, frame, &mut w, &mut h);
        assert_eq!((w, h), (25.0, 12.0), "both follow the text");

        let (mut w, mut h) = (25.0, 12.0);
        preserve_fixed_dimensions(BoundsMode::Fixed, Some((0.0, 0.0)), &mut w, &mut h);
        assert_eq!((w, h), (25.0, 12.0), "zero sizes are ignored");
    }

    #[test]
    fn vertical_alignment_only_moves_fixed_frames() {
        let offset = |mode, align| resolve_vertical_offset(mode, align, 41.0, 20.0, 3.0);
        assert_eq!(offset(BoundsMode::Fixed, VerticalAlign::Top), 0.0, "top");
        assert_eq!(
            offset(BoundsMode::Fixed, VerticalAlign::Center),
            10.0,
            "half the leftover, floored"
        );
        assert_eq!(
            offset(BoundsMode::Fixed, VerticalAlign::Bottom),
            18.0,
            "leftover minus the baseline offset"
        );
        assert_eq!(offset(BoundsMode::AutoHeight, VerticalAlign::Bottom), 0.0, "auto frames");
    }

    #[test]
    fn stretch_grows_vertically_only() {
        let base = Rect::new(0.0, 0.0, 20.0, 10.0);
        let stretched = stretch_bounds(base, IRect::new(-5, -3, 40, 16));
        assert_eq!(stretched, Rect::new(0.0, -3.0, 20.0, 13.0), "taller, same width");
        assert_eq!(stretch_bounds(base, IRect::new(0, 2, 5, 4)), base, "smaller glyphs");
    }

    #[test]
    fn caret_rounding() {
        assert_eq!(round_caret(7.6, true), 7.0, "floored");
        assert_eq!(round_caret(7.6, false), 8.0, "rounded");
    }
}
