// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph bitmaps and compositing into caller owned RGBA buffers.

use core::fmt;

use letterpress_fonts::{FontFace, GlyphId, GlyphPixels, RenderRequest};
use tiny_skia::{
    BlendMode, Color, FilterQuality, IntSize, Mask, MaskType, Paint, Pixmap, PixmapMut,
    PixmapPaint, PixmapRef, Transform,
};

use crate::geometry::{IPoint, IRect, Point};

/// Unpacks a straight `0xAABBGGRR` pixel.
fn color_from_pixel(pixel: u32) -> Color {
    let [r, g, b, a] = pixel.to_le_bytes();
    Color::from_rgba8(r, g, b, a)
}

/// A caller owned premultiplied RGBA8 buffer, red in the lowest byte.
pub(crate) struct RgbaTarget<'a> {
    pixmap: Option<PixmapMut<'a>>,
}

impl<'a> RgbaTarget<'a> {
    /// Wraps `data`. The height is clipped to the rows the buffer holds.
    pub(crate) fn new(data: &'a mut [u8], width: usize, height: usize) -> Self {
        let rows = if width == 0 { 0 } else { data.len() / (4 * width) };
        let height = height.min(rows);
        let pixmap = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => data
                .get_mut(..4 * width * height)
                .and_then(|bytes| PixmapMut::from_bytes(bytes, w, h)),
            _ => None,
        };
        Self { pixmap }
    }

    fn draw_pixmap(&mut self, x: i32, y: i32, source: PixmapRef<'_>, paint: &PixmapPaint) {
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.draw_pixmap(x, y, source, paint, Transform::identity(), None);
        }
    }

    /// Overwrites the pixels of `area` with a straight `0xAABBGGRR` colour.
    /// Pixels outside the target are dropped.
    pub(crate) fn fill(&mut self, area: IRect, color: u32) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        if !area.is_non_empty() {
            return;
        }
        let Some(rect) = tiny_skia::Rect::from_xywh(
            area.l as f32,
            area.t as f32,
            area.w as f32,
            area.h as f32,
        ) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color_from_pixel(color));
        paint.blend_mode = BlendMode::Source;
        paint.anti_alias = false;
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

impl fmt::Debug for RgbaTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.pixmap.as_ref().map(|p| (p.width(), p.height()));
        f.debug_struct("RgbaTarget").field("size", &size).finish()
    }
}

/// Pixel content of a rendered glyph.
#[derive(Clone)]
pub(crate) enum GlyphBitmap {
    /// Nothing to draw.
    Empty,
    /// Coverage tinted with a straight `0xAABBGGRR` colour.
    Gray { mask: Mask, color: u32 },
    /// Premultiplied colour pixels, faded by `alpha`.
    Color { pixmap: Pixmap, alpha: u8 },
}

impl fmt::Debug for GlyphBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Gray { mask, color } => f
                .debug_struct("Gray")
                .field("size", &(mask.width(), mask.height()))
                .field("color", &format_args!("{color:#010x}"))
                .finish(),
            Self::Color { pixmap, alpha } => f
                .debug_struct("Color")
                .field("size", &(pixmap.width(), pixmap.height()))
                .field("alpha", alpha)
                .finish(),
        }
    }
}

/// Resizes `source` by `scale` with bilinear filtering, rounding the size up.
fn resample(source: PixmapRef<'_>, scale: f32) -> Option<Pixmap> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "glyph bitmaps are small and the scale is positive"
    )]
    let dim = |v: u32| (scale * v as f32).ceil().max(0.0) as u32;
    let mut out = Pixmap::new(dim(source.width()), dim(source.height()))?;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    out.draw_pixmap(0, 0, source, &paint, Transform::from_scale(scale, scale), None);
    Some(out)
}

/// Resizes a coverage mask by `scale`, rounding the size up.
fn scale_mask(mask: &Mask, scale: f32) -> Option<Mask> {
    let mut coverage = Pixmap::new(mask.width(), mask.height())?;
    coverage.fill(Color::WHITE);
    coverage.apply_mask(mask);
    let scaled = resample(coverage.as_ref(), scale)?;
    Some(Mask::from_pixmap(scaled.as_ref(), MaskType::Alpha))
}

impl GlyphBitmap {
    fn from_pixels(width: u32, height: u32, pixels: GlyphPixels) -> Option<Self> {
        let Some(size) = IntSize::from_wh(width, height) else {
            return Some(Self::Empty);
        };
        Some(match pixels {
            GlyphPixels::Mask(coverage) => Self::Gray {
                mask: Mask::from_vec(coverage, size)?,
                color: 0,
            },
            GlyphPixels::Color(rgba) => Self::Color {
                pixmap: Pixmap::from_vec(rgba.iter().flat_map(|p| p.to_le_bytes()).collect(), size)?,
                alpha: u8::MAX,
            },
        })
    }

    fn size(&self) -> (u32, u32) {
        match self {
            Self::Empty => (0, 0),
            Self::Gray { mask, .. } => (mask.width(), mask.height()),
            Self::Color { pixmap, .. } => (pixmap.width(), pixmap.height()),
        }
    }

    fn scaled(self, scale: f32) -> Self {
        let scaled = match &self {
            Self::Empty => return self,
            Self::Gray { mask, color } => scale_mask(mask, scale).map(|mask| Self::Gray {
                mask,
                color: *color,
            }),
            Self::Color { pixmap, alpha } => {
                resample(pixmap.as_ref(), scale).map(|pixmap| Self::Color {
                    pixmap,
                    alpha: *alpha,
                })
            }
        };
        scaled.unwrap_or(Self::Empty)
    }
}

/// A rendered glyph positioned on a bitmap.
#[derive(Clone, Debug)]
pub(crate) struct Glyph {
    pub(crate) bitmap: GlyphBitmap,
    /// Offset from the pen position to the left-top corner, y up.
    pub(crate) bearing: IPoint,
    pub(crate) lsb_delta: f32,
    pub(crate) rsb_delta: f32,
    /// Left-top corner on the bitmap.
    pub(crate) destination: IPoint,
    /// Pen position the glyph was placed at.
    pub(crate) origin: Point,
}

impl Glyph {
    pub(crate) fn width(&self) -> u32 {
        self.bitmap.size().0
    }

    pub(crate) fn height(&self) -> u32 {
        self.bitmap.size().1
    }

    /// Bitmap extent at the destination.
    pub(crate) fn bitmap_bounds(&self) -> IRect {
        IRect::new(
            self.destination.x,
            self.destination.y,
            i32::try_from(self.width()).unwrap_or(i32::MAX),
            i32::try_from(self.height()).unwrap_or(i32::MAX),
        )
    }

    pub(crate) fn set_color(&mut self, color: u32) {
        match &mut self.bitmap {
            GlyphBitmap::Empty => {}
            GlyphBitmap::Gray { color: c, .. } => *c = color,
            GlyphBitmap::Color { alpha, .. } => *alpha = color.to_le_bytes()[3],
        }
    }

    /// Composites the glyph over `target` at its destination moved by
    /// `offset`.
    pub(crate) fn blit(&self, target: &mut RgbaTarget<'_>, offset: IPoint) {
        let x = self.destination.x + offset.x;
        let y = self.destination.y + offset.y;
        match &self.bitmap {
            GlyphBitmap::Empty => {}
            GlyphBitmap::Gray { mask, color } => {
                let Some(mut tinted) = Pixmap::new(mask.width(), mask.height()) else {
                    return;
                };
                tinted.fill(color_from_pixel(*color));
                tinted.apply_mask(mask);
                target.draw_pixmap(x, y, tinted.as_ref(), &PixmapPaint::default());
            }
            GlyphBitmap::Color { pixmap, alpha } => {
                let paint = PixmapPaint {
                    opacity: f32::from(*alpha) / 255.0,
                    ..PixmapPaint::default()
                };
                target.draw_pixmap(x, y, pixmap.as_ref(), &paint);
            }
        }
    }
}

/// Renders glyph `id` of `face` at a sub-pixel `offset`.
///
/// Scalable faces render at `size * scale`. Bitmap faces render the strike
/// closest to `size` and the image is resized by `glyph_scale`.
pub(crate) fn acquire_glyph(
    face: &dyn FontFace,
    id: GlyphId,
    size: f32,
    offset: (f32, f32),
    scale: f32,
    glyph_scale: f32,
    hint: bool,
) -> Option<Glyph> {
    let request = RenderRequest {
        size: if face.is_scalable() {
            size * scale
        } else {
            face.select_size(size)
        },
        offset,
        hint,
    };
    let image = face.render_glyph(id, &request)?;
    let k = if image.is_bitmap { glyph_scale } else { 1.0 };
    let mut bitmap = GlyphBitmap::from_pixels(image.width, image.height, image.pixels)?;
    if k != 1.0 {
        bitmap = bitmap.scaled(k);
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bearings are small pixel offsets"
    )]
    let bearing = IPoint::new(
        (image.left as f32 * k) as i32,
        (image.top as f32 * k) as i32,
    );
    Some(Glyph {
        bitmap,
        bearing,
        lsb_delta: image.lsb_delta * k,
        rsb_delta: image.rsb_delta * k,
        destination: IPoint::default(),
        origin: Point::ZERO,
    })
}
