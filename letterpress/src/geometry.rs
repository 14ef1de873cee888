// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel rectangles and the kurbo types used for text space geometry.
//!
//! Frames, glyph boxes and transforms are [`kurbo`] values. Bitmap bounds
//! are whole pixels, kept as an [`IRect`] with a left-top corner and a size.

use core::ops::{BitAnd, BitOr};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Rectangle large enough to contain every drawable area.
///
/// Intersecting anything with it is a no-op.
pub const INFINITE_BOUNDS: IRect = IRect {
    l: -0x2000_0000,
    t: -0x2000_0000,
    w: 0x4000_0000,
    h: 0x4000_0000,
};

/// Rectangle of whole pixels given by its left-top corner and size.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct IRect {
    /// Left edge.
    pub l: i32,
    /// Top edge.
    pub t: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl IRect {
    /// Creates a rectangle.
    pub const fn new(l: i32, t: i32, w: i32, h: i32) -> Self {
        Self { l, t, w, h }
    }

    /// Right edge (exclusive).
    pub fn r(&self) -> i32 {
        self.l + self.w
    }

    /// Bottom edge (exclusive).
    pub fn b(&self) -> i32 {
        self.t + self.h
    }

    /// Returns `true` if the rectangle covers some pixels.
    pub fn is_non_empty(&self) -> bool {
        self.w > 0 && self.h > 0
    }

    /// Half-open containment test.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.l && x < self.r() && y >= self.t && y < self.b()
    }

    /// Moves the rectangle by `(dx, dy)`.
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            l: self.l + dx,
            t: self.t + dy,
            ..self
        }
    }

    /// Places `other` relative to the left-top corner of `self`, keeping the
    /// size of `other`.
    pub fn offset_by(self, other: Self) -> Self {
        Self {
            l: self.l + other.l,
            t: self.t + other.t,
            w: other.w,
            h: other.h,
        }
    }

    /// Moves the left-top corner back by the corner of `other`, keeping the
    /// size of `self`.
    pub fn relative_to(self, other: Self) -> Self {
        Self {
            l: self.l - other.l,
            t: self.t - other.t,
            ..self
        }
    }

    /// The same pixels as a kurbo rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.l),
            f64::from(self.t),
            f64::from(self.r()),
            f64::from(self.b()),
        )
    }
}

impl BitAnd for IRect {
    type Output = Self;

    /// Intersection. The size is zero when the rectangles are disjoint.
    fn bitand(self, other: Self) -> Self {
        outer_rect(self.to_rect().intersect(other.to_rect()))
    }
}

impl BitOr for IRect {
    type Output = Self;

    /// Union, the smallest rectangle containing both.
    fn bitor(self, other: Self) -> Self {
        outer_rect(self.to_rect().union(other.to_rect()))
    }
}

/// Integer pixel position.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub(crate) struct IPoint {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl IPoint {
    pub(crate) const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates fit in i32"
)]
pub(crate) fn floor_px(v: impl Into<f64>) -> i32 {
    v.into().floor() as i32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates fit in i32"
)]
pub(crate) fn ceil_px(v: impl Into<f64>) -> i32 {
    v.into().ceil() as i32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates fit in i32"
)]
pub(crate) fn round_px(v: impl Into<f64>) -> i32 {
    v.into().round() as i32
}

/// Truncates toward zero.
#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates fit in i32"
)]
pub(crate) fn trunc_px(v: impl Into<f64>) -> i32 {
    v.into() as i32
}

/// Brings a kurbo coordinate back to layout precision.
#[expect(
    clippy::cast_possible_truncation,
    reason = "layout values are f32 widened for kurbo"
)]
pub(crate) fn narrow(v: f64) -> f32 {
    v as f32
}

/// Smallest integer rectangle enclosing `rect`.
pub fn outer_rect(rect: Rect) -> IRect {
    let l = floor_px(rect.x0);
    let t = floor_px(rect.y0);
    IRect {
        l,
        t,
        w: ceil_px(rect.x1) - l,
        h: ceil_px(rect.y1) - t,
    }
}

/// Inverse of `m`, or the zero transform when `m` is singular.
pub fn inverse_or_zero(m: Affine) -> Affine {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return Affine::new([0.0; 6]);
    }
    m.inverse()
}
