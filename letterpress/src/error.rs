// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Error produced while shaping a text.
///
/// Carries a non-exhaustive [`ShapeErrorKind`] plus the number of paragraphs
/// the text was split into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    /// The non-exhaustive category describing this error.
    kind: ShapeErrorKind,

    /// Paragraphs found in the input text.
    paragraphs: usize,
}

impl ShapeError {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ShapeErrorKind {
        self.kind
    }

    /// The number of paragraphs the input text was split into.
    pub fn paragraphs(&self) -> usize {
        self.paragraphs
    }

    pub(crate) fn no_paragraphs() -> Self {
        Self {
            kind: ShapeErrorKind::NoParagraphs,
            paragraphs: 0,
        }
    }

    pub(crate) fn shape(paragraphs: usize) -> Self {
        Self {
            kind: ShapeErrorKind::Shape,
            paragraphs,
        }
    }

    pub(crate) fn typeset(paragraphs: usize) -> Self {
        Self {
            kind: ShapeErrorKind::Typeset,
            paragraphs,
        }
    }

    pub(crate) fn invalid_handle() -> Self {
        Self {
            kind: ShapeErrorKind::InvalidHandle,
            paragraphs: 0,
        }
    }
}

impl core::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ShapeErrorKind::NoParagraphs => write!(f, "text contains no paragraphs"),
            ShapeErrorKind::Shape => write!(
                f,
                "none of {} paragraphs produced any glyphs",
                self.paragraphs
            ),
            ShapeErrorKind::Typeset => {
                write!(f, "typesetting {} paragraphs produced no lines", self.paragraphs)
            }
            ShapeErrorKind::InvalidHandle => write!(f, "text shape handle is not valid"),
        }
    }
}

impl core::error::Error for ShapeError {}

/// The non-exhaustive category of a [`ShapeError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShapeErrorKind {
    /// The text is empty.
    NoParagraphs,

    /// No paragraph produced glyphs, usually because its faces are missing.
    Shape,

    /// Laying out the shaped paragraphs produced nothing.
    Typeset,

    /// The text shape handle was destroyed or never existed.
    InvalidHandle,
}

/// Error produced while drawing a shaped text.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawError {
    /// The non-exhaustive category describing this error.
    kind: DrawErrorKind,

    /// The scale the draw was requested at.
    scale: f32,
}

impl DrawError {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> DrawErrorKind {
        self.kind
    }

    /// The scale the draw was requested at.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub(crate) fn invalid_scale(scale: f32) -> Self {
        Self {
            kind: DrawErrorKind::InvalidScale,
            scale,
        }
    }

    pub(crate) fn paragraphs_typesetting(scale: f32) -> Self {
        Self {
            kind: DrawErrorKind::ParagraphsTypesetting,
            scale,
        }
    }

    pub(crate) fn draw_bounds(scale: f32) -> Self {
        Self {
            kind: DrawErrorKind::DrawBounds,
            scale,
        }
    }

    pub(crate) fn invalid_handle(scale: f32) -> Self {
        Self {
            kind: DrawErrorKind::InvalidHandle,
            scale,
        }
    }
}

impl core::fmt::Display for DrawError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            DrawErrorKind::InvalidScale => {
                write!(f, "text bounds are empty at scale {}", self.scale)
            }
            DrawErrorKind::ParagraphsTypesetting => {
                write!(f, "no paragraph could be typeset at scale {}", self.scale)
            }
            DrawErrorKind::DrawBounds => {
                write!(f, "drawn bitmap bounds are empty at scale {}", self.scale)
            }
            DrawErrorKind::InvalidHandle => write!(f, "text shape handle is not valid"),
        }
    }
}

impl core::error::Error for DrawError {}

/// The non-exhaustive category of a [`DrawError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DrawErrorKind {
    /// The scaled text bounds have no area.
    InvalidScale,

    /// Typesetting the paragraphs produced nothing.
    ParagraphsTypesetting,

    /// The final bitmap bounds have no area.
    DrawBounds,

    /// The text shape handle was destroyed or never existed.
    InvalidHandle,
}
