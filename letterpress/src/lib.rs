// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich text shaping, layout and rasterization.
//!
//! A [`TextDocument`] describes styled text inside a frame. The [`Context`]
//! owns the fonts and turns documents into shaped texts, addressed by
//! [`TextShapeHandle`]. A shaped text keeps its glyphs in unscaled text space
//! as [`PlacedTextData`] and can be drawn into an RGBA8 buffer at any scale.
//!
//! ```no_run
//! use letterpress::{Context, TextDocument, TextStyle};
//!
//! let mut cx = Context::new();
//! let bytes = std::fs::read("Inter.ttf").unwrap();
//! cx.add_font_bytes("Inter-Regular", "Inter Regular", bytes, false).unwrap();
//!
//! let style = TextStyle {
//!     font: Some("Inter-Regular".into()),
//!     font_size: Some(16.0),
//!     ..Default::default()
//! };
//! let handle = cx.shape_text(&TextDocument::new("Hello", style)).unwrap();
//! let (w, h) = cx.draw_buffer_dimensions(handle, 2.0, None).unwrap();
//! let mut pixels = vec![0_u8; 4 * w as usize * h as usize];
//! cx.draw_text(handle, &mut pixels, w as usize, h as usize, 2.0, None).unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use letterpress_fonts;

mod analysis;
mod bounds;
mod config;
mod context;
mod document;
mod error;
pub mod format;
pub mod geometry;
pub mod layout;
mod paragraph;
mod pipeline;
mod placed;
mod raster;
mod shape;
mod text;

#[cfg(test)]
mod tests;

pub use analysis::VisualRun;
pub use config::Config;
pub use context::{Context, TextShapeHandle};
pub use document::{
    Fill, LetterCase, ParsedDocument, StyleRange, TextDocument, TextFrame, TextStyle, Underline,
};
pub use error::{DrawError, DrawErrorKind, ShapeError, ShapeErrorKind};
pub use paragraph::{split_text, FormattedParagraph};
pub use pipeline::DrawOutput;
pub use placed::{PlacedDecoration, PlacedGlyph, PlacedTextData, Quad};
pub use shape::{GlyphShape, ParagraphShape, ReportedFontReason, ShapeResult};
pub use text::FormattedText;
pub use tiny_skia::Color;
