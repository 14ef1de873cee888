// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owner of fonts, configuration and shaped texts.

use std::path::Path;

use letterpress_fonts::codec::ContainerKey;
use letterpress_fonts::{FontError, FontFace, FontManager};

use crate::config::Config;
use crate::document::TextDocument;
use crate::error::{DrawError, ShapeError};
use crate::geometry::{inverse_or_zero, IRect, Point, Rect};
use crate::pipeline::{
    draw_placed_text, draw_text, placed_buffer_dimensions, shape_placed_text, shape_text,
    DrawOutput, TextShapeInput,
};
use crate::placed::PlacedTextData;
use crate::raster::RgbaTarget;

/// Refers to a text shaped by a [`Context`].
///
/// Handles of destroyed shapes never resolve again, even when their slot is
/// reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextShapeHandle {
    index: u32,
    generation: u32,
}

/// A shaped text and the input it can be reshaped from.
#[derive(Clone, Debug)]
struct TextShape {
    input: TextShapeInput,
    data: PlacedTextData,
    active: bool,
    dirty: bool,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    shape: Option<TextShape>,
}

/// Fonts, configuration and the shaped texts that use them.
///
/// Reloading a face marks the texts using it dirty. Dirty texts are shaped
/// again before they are next queried.
#[derive(Debug, Default)]
pub struct Context {
    config: Config,
    fonts: FontManager,
    slots: Vec<Slot>,
}

impl Context {
    /// Creates a context with the default configuration and no fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// The configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration.
    ///
    /// Shaped texts keep their results until they are reshaped.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The font manager.
    pub fn fonts(&self) -> &FontManager {
        &self.fonts
    }

    /// Sets the key of encrypted font containers added from now on.
    pub fn set_font_key(&mut self, key: ContainerKey) {
        self.fonts.set_container_key(key);
    }

    /// Loads the face named `face_name` from a font file and registers it
    /// as `postscript_name`.
    ///
    /// With `overwrite`, texts using any face of the file are reshaped.
    pub fn add_font_file(
        &mut self,
        postscript_name: &str,
        face_name: &str,
        path: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<(), FontError> {
        let path = path.as_ref();
        let storage_key = path.to_string_lossy();
        let mut changed = if overwrite {
            self.fonts.list_faces_in_storage(&storage_key)
        } else {
            Vec::new()
        };
        if self.fonts.face_exists(postscript_name) {
            changed.push(postscript_name.to_string());
        }
        let result = self
            .fonts
            .store_file(&storage_key, path, overwrite)
            .and_then(|()| self.fonts.load_face_from_file_as(path, postscript_name, face_name));
        self.mark_dirty(&changed);
        result
    }

    /// Loads the face named `face_name` from font data and registers it as
    /// `postscript_name`.
    ///
    /// Data already stored under the name is kept unless `overwrite` is set.
    pub fn add_font_bytes(
        &mut self,
        postscript_name: &str,
        face_name: &str,
        bytes: Vec<u8>,
        overwrite: bool,
    ) -> Result<(), FontError> {
        let mut changed = if overwrite {
            self.fonts.list_faces_in_storage(postscript_name)
        } else {
            Vec::new()
        };
        if self.fonts.face_exists(postscript_name) {
            changed.push(postscript_name.to_string());
        }
        let result = self
            .fonts
            .store_bytes(postscript_name, bytes, overwrite)
            .and_then(|()| self.fonts.load_face_as(postscript_name, postscript_name, face_name));
        self.mark_dirty(&changed);
        result
    }

    /// Registers a custom face under `face_key`.
    pub fn add_face(&mut self, face_key: &str, face: Box<dyn FontFace>) {
        let existed = self.fonts.face_exists(face_key);
        self.fonts.insert_face(face_key, face);
        if existed {
            self.mark_dirty(&[face_key.to_string()]);
        }
    }

    /// Faces the document needs that are not loaded, sorted.
    pub fn list_missing_fonts(&self, document: &TextDocument) -> Vec<String> {
        document
            .parse()
            .text
            .collect_used_face_names()
            .into_iter()
            .filter(|name| !self.fonts.face_exists(name))
            .collect()
    }

    fn mark_dirty(&mut self, faces: &[String]) {
        if faces.is_empty() {
            return;
        }
        for shape in self.slots.iter_mut().filter_map(|slot| slot.shape.as_mut()) {
            if faces.iter().any(|face| shape.input.uses_face(face)) {
                shape.dirty = true;
            }
        }
    }

    fn input_from(document: &TextDocument) -> TextShapeInput {
        let parsed = document.parse();
        TextShapeInput::new(parsed.text, parsed.frame_size, parsed.transform)
    }

    /// Shapes a document.
    ///
    /// Returns `None` for an empty document or when nothing could be shaped.
    pub fn shape_text(&mut self, document: &TextDocument) -> Option<TextShapeHandle> {
        if document.value.is_empty() {
            return None;
        }
        let input = Self::input_from(document);
        let data = shape_placed_text(&mut self.fonts, &self.config, &input).ok()?;
        let shape = TextShape {
            input,
            data,
            active: true,
            dirty: false,
        };
        Some(self.insert(shape))
    }

    fn insert(&mut self, shape: TextShape) -> TextShapeHandle {
        if let Some((index, slot)) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.shape.is_none())
        {
            slot.shape = Some(shape);
            return TextShapeHandle {
                index: u32::try_from(index).unwrap_or(u32::MAX),
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            shape: Some(shape),
        });
        TextShapeHandle {
            index: u32::try_from(self.slots.len() - 1).unwrap_or(u32::MAX),
            generation: 0,
        }
    }

    fn shape_mut(&mut self, handle: TextShapeHandle) -> Option<&mut TextShape> {
        let slot = self.slots.get_mut(usize::try_from(handle.index).ok()?)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.shape.as_mut().filter(|shape| shape.active)
    }

    /// Shapes a new document into an existing handle.
    ///
    /// On failure the previous result is kept and an error is returned.
    pub fn reshape_text(
        &mut self,
        handle: TextShapeHandle,
        document: &TextDocument,
    ) -> Result<(), ShapeError> {
        if self.shape_mut(handle).is_none() {
            return Err(ShapeError::invalid_handle());
        }
        let input = Self::input_from(document);
        let data = shape_placed_text(&mut self.fonts, &self.config, &input)?;
        let Some(shape) = self.shape_mut(handle) else {
            return Err(ShapeError::invalid_handle());
        };
        shape.input = input;
        shape.data = data;
        shape.dirty = false;
        Ok(())
    }

    /// Destroys the shapes behind `handles` and frees their slots.
    ///
    /// Returns the number of shapes removed.
    pub fn destroy_text_shapes(&mut self, handles: &[TextShapeHandle]) -> usize {
        for &handle in handles {
            if let Some(shape) = self.shape_mut(handle) {
                shape.active = false;
            }
        }
        self.remove_inactive_shapes()
    }

    fn remove_inactive_shapes(&mut self) -> usize {
        let mut removed = 0;
        for slot in &mut self.slots {
            if slot.shape.as_ref().is_some_and(|shape| !shape.active) {
                slot.shape = None;
                slot.generation = slot.generation.wrapping_add(1);
                removed += 1;
            }
        }
        removed
    }

    /// Resolves a handle, reshaping a dirty shape first.
    fn sanitize(&mut self, handle: TextShapeHandle) -> Option<&TextShape> {
        let index = usize::try_from(handle.index).ok()?;
        let slot = self.slots.get_mut(index)?;
        if slot.generation != handle.generation {
            return None;
        }
        let shape = slot.shape.as_mut().filter(|shape| shape.active)?;
        if shape.dirty {
            match shape_placed_text(&mut self.fonts, &self.config, &shape.input) {
                Ok(data) => {
                    shape.data = data;
                    shape.dirty = false;
                }
                Err(err) => {
                    log::error!("text reshaping failed: {err}");
                    return None;
                }
            }
        }
        Some(shape)
    }

    /// The frame of a shaped text, before its transform.
    pub fn text_bounds(&mut self, handle: TextShapeHandle) -> Option<Rect> {
        self.sanitize(handle).map(|shape| shape.data.bounds)
    }

    /// Returns `true` if the canvas point `(x, y)` lies within `radius` of the
    /// frame of a shaped text.
    pub fn intersect(&mut self, handle: TextShapeHandle, x: f32, y: f32, radius: f32) -> bool {
        let Some(shape) = self.sanitize(handle) else {
            return false;
        };
        let data = &shape.data;
        let p = inverse_or_zero(data.transform) * Point::new(f64::from(x), f64::from(y));
        let r = f64::from(radius.max(0.0));
        let b = data.bounds;
        p.x >= b.x0 - r && p.x < b.x1 + r && p.y >= b.y0 - r && p.y < b.y1 + r
    }

    /// Width and height of the buffer [`Self::draw_text`] needs.
    pub fn draw_buffer_dimensions(
        &mut self,
        handle: TextShapeHandle,
        scale: f32,
        view_area: Option<IRect>,
    ) -> Option<(i32, i32)> {
        let config = self.config.clone();
        let shape = self.sanitize(handle)?;
        Some(placed_buffer_dimensions(&config, &shape.data, scale, view_area))
    }

    /// Draws a shaped text at `scale` into an RGBA8 buffer `width` pixels
    /// wide, red in the lowest byte.
    ///
    /// `view_area` limits the drawn area, in scaled text space.
    pub fn draw_text(
        &mut self,
        handle: TextShapeHandle,
        pixels: &mut [u8],
        width: usize,
        height: usize,
        scale: f32,
        view_area: Option<IRect>,
    ) -> Result<DrawOutput, DrawError> {
        if self.sanitize(handle).is_none() {
            return Err(DrawError::invalid_handle(scale));
        }
        let Self { config, fonts, slots } = self;
        let Some(shape) = slots
            .get(usize::try_from(handle.index).unwrap_or(usize::MAX))
            .and_then(|slot| slot.shape.as_ref())
        else {
            return Err(DrawError::invalid_handle(scale));
        };
        let mut target = RgbaTarget::new(pixels, width, height);
        draw_placed_text(fonts.faces(), config, &shape.data, scale, view_area, &mut target)
    }

    /// Shapes the text of a handle again and typesets it straight into an
    /// RGBA8 buffer, bypassing the placed glyphs.
    ///
    /// Without pixels only the bitmap bounds are computed.
    pub fn draw_text_immediate(
        &mut self,
        handle: TextShapeHandle,
        pixels: Option<(&mut [u8], usize, usize)>,
        scale: f32,
        view_area: Option<IRect>,
    ) -> Result<DrawOutput, DrawError> {
        let Some(input) = self.sanitize(handle).map(|shape| shape.input.clone()) else {
            return Err(DrawError::invalid_handle(scale));
        };
        let (data, _) = shape_text(&mut self.fonts, &self.config, &input).map_err(|err| {
            log::error!("text shaping failed: {err}");
            DrawError::paragraphs_typesetting(scale)
        })?;
        let faces = self.fonts.faces();
        match pixels {
            Some((pixels, width, height)) => {
                let mut target = RgbaTarget::new(pixels, width, height);
                draw_text(faces, &self.config, &input, &data, scale, view_area, Some(&mut target))
            }
            None => draw_text(faces, &self.config, &input, &data, scale, view_area, None),
        }
    }

    /// The placed glyphs and decorations of a shaped text.
    pub fn shaped_text(&mut self, handle: TextShapeHandle) -> Option<&PlacedTextData> {
        self.sanitize(handle).map(|shape| &shape.data)
    }
}
