// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font storage and face access for letterpress.
//!
//! Font bytes are kept in a [`FontStorage`], optionally wrapped in a small
//! [container](codec) format. Faces parsed from them live in a [`FaceTable`]
//! keyed by name, and the [`FontManager`] ties the two together. The layout
//! engine only talks to faces through the [`FontFace`] trait, so custom faces
//! can be registered next to the OpenType ones.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod codec;
mod error;
mod face;
mod lru_cache;
mod manager;
mod opentype;
mod storage;
mod table;

#[cfg(test)]
mod tests;

pub use linebender_resource_handle::Blob;

pub use codec::FontFormat;
pub use error::{FontError, FontErrorKind};
pub use face::{
    FaceMetrics, FontFace, FontFeature, GlyphId, GlyphImage, GlyphPixels, RenderRequest,
    ShapedGlyph,
};
pub use manager::{FontManager, DEFAULT_EMOJI_FONT};
pub use opentype::OpenTypeFace;
pub use storage::FontStorage;
pub use table::{FaceEntry, FaceTable, LoadedFace};
