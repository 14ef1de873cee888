// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    Color, Config, Context, DrawOutput, Fill, PlacedTextData, TextDocument, TextShapeHandle,
    TextStyle,
};

use super::BoxFace;

/// Name of the enclosing test function.
#[macro_export]
macro_rules! test_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            core::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = &name[..name.len() - 3];
        let name = &name[name.rfind(':').map(|x| x + 1).unwrap_or(0)..];

        name
    }};
}

pub(crate) const BOX_FONT: &str = "Box";
pub(crate) const FONT_SIZE: f32 = 10.0;

/// An RGBA8 image as produced by a draw call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Image {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) data: Vec<u8>,
}

impl Image {
    fn new(width: i32, height: i32) -> Self {
        let width = usize::try_from(width).unwrap();
        let height = usize::try_from(height).unwrap();
        Self {
            width,
            height,
            data: vec![0; 4 * width * height],
        }
    }

    pub(crate) fn pixel(&self, x: usize, y: usize) -> u32 {
        let i = 4 * (y * self.width + x);
        u32::from_le_bytes([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    pub(crate) fn alpha(&self, x: usize, y: usize) -> u8 {
        self.data[4 * (y * self.width + x) + 3]
    }

    /// Rows with at least one painted pixel.
    pub(crate) fn painted_rows(&self) -> Vec<usize> {
        (0..self.height)
            .filter(|&y| (0..self.width).any(|x| self.alpha(x, y) != 0))
            .collect()
    }
}

/// A context with the box face loaded under [`BOX_FONT`].
pub(crate) struct TestEnv {
    name: String,
    pub(crate) cx: Context,
}

impl TestEnv {
    pub(crate) fn new(name: &str) -> Self {
        Self::with_config(name, Config::default())
    }

    pub(crate) fn with_config(name: &str, config: Config) -> Self {
        super::init_logger();
        let mut cx = Context::with_config(config);
        cx.add_face(BOX_FONT, BoxFace::new(BOX_FONT).boxed());
        Self {
            name: name.into(),
            cx,
        }
    }

    /// Opaque black box text at [`FONT_SIZE`].
    pub(crate) fn style(&self) -> TextStyle {
        TextStyle {
            font: Some(BOX_FONT.into()),
            font_size: Some(FONT_SIZE),
            fills: Some(vec![Fill::Solid(Color::BLACK)]),
            ..Default::default()
        }
    }

    pub(crate) fn document(&self, text: &str) -> TextDocument {
        TextDocument::new(text, self.style())
    }

    pub(crate) fn shape(&mut self, document: &TextDocument) -> TextShapeHandle {
        match self.cx.shape_text(document) {
            Some(handle) => handle,
            None => panic!("{}: shaping {:?} failed", self.name, document.value),
        }
    }

    pub(crate) fn placed(&mut self, handle: TextShapeHandle) -> PlacedTextData {
        match self.cx.shaped_text(handle) {
            Some(placed) => placed.clone(),
            None => panic!("{}: handle {handle:?} does not resolve", self.name),
        }
    }

    /// Draws the placed glyphs into a buffer of the size the context asks
    /// for.
    pub(crate) fn render(&mut self, handle: TextShapeHandle, scale: f32) -> (Image, DrawOutput) {
        let Some((w, h)) = self.cx.draw_buffer_dimensions(handle, scale, None) else {
            panic!("{}: no buffer dimensions", self.name);
        };
        let mut image = Image::new(w, h);
        let output = self
            .cx
            .draw_text(handle, &mut image.data, image.width, image.height, scale, None)
            .unwrap_or_else(|err| panic!("{}: draw failed: {err}", self.name));
        (image, output)
    }

    /// Typesets the text again and draws it directly.
    pub(crate) fn render_immediate(
        &mut self,
        handle: TextShapeHandle,
        scale: f32,
    ) -> (Image, DrawOutput) {
        let bounds = self
            .cx
            .draw_text_immediate(handle, None, scale, None)
            .unwrap_or_else(|err| panic!("{}: measuring failed: {err}", self.name))
            .bounds;
        let mut image = Image::new(bounds.w, bounds.h);
        let output = self
            .cx
            .draw_text_immediate(
                handle,
                Some((&mut image.data, image.width, image.height)),
                scale,
                None,
            )
            .unwrap_or_else(|err| panic!("{}: draw failed: {err}", self.name));
        (image, output)
    }
}
