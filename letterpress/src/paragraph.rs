// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting formatted text into paragraphs.

use letterpress_fonts::{FontManager, DEFAULT_EMOJI_FONT};

use crate::analysis::{
    analyze_bidi, is_emoji, is_paragraph_break, VisualRun, EM_SPACE, LINE_SEPARATOR,
};
use crate::format::{ImmediateFormat, TextDirection};
use crate::text::FormattedText;

/// A run of characters without hard breaks, with one format per character.
#[derive(Clone, Debug, Default)]
pub struct FormattedParagraph {
    pub(crate) text: Vec<char>,
    /// Characters as they appear in the source text, before case mapping and
    /// tab substitution.
    pub(crate) source: Vec<char>,
    pub(crate) formats: Vec<ImmediateFormat>,
    pub(crate) runs: Vec<VisualRun>,
    pub(crate) base_direction: TextDirection,
}

impl FormattedParagraph {
    /// The characters, after case mapping and substitutions.
    pub fn text(&self) -> &[char] {
        &self.text
    }

    /// Format of each character.
    pub fn formats(&self) -> &[ImmediateFormat] {
        &self.formats
    }

    /// Visual runs in display order.
    pub fn runs(&self) -> &[VisualRun] {
        &self.runs
    }

    /// Direction of the first strong character.
    pub fn base_direction(&self) -> TextDirection {
        self.base_direction
    }

    fn push(&mut self, ch: char, format: ImmediateFormat) {
        self.text.push(ch);
        self.source.push(ch);
        self.formats.push(format);
    }

    /// Moves the paragraph at the front of `text` into `self` and returns the
    /// number of characters consumed, including the break.
    fn extract(&mut self, text: &[char], formats: &[ImmediateFormat]) -> usize {
        let len = text
            .iter()
            .position(|&ch| is_paragraph_break(ch))
            .unwrap_or(text.len());
        if len != 0 {
            self.text.extend_from_slice(&text[..len]);
            self.source.extend_from_slice(&text[..len]);
            self.formats.extend_from_slice(&formats[..len]);
        } else {
            self.push(LINE_SEPARATOR, formats[0].clone());
        }
        len + 1
    }

    fn analyze_bidi(&mut self) {
        match analyze_bidi(&self.text) {
            Some(bidi) => {
                self.base_direction = bidi.base_direction;
                for (format, direction) in self.formats.iter_mut().zip(bidi.directions) {
                    format.direction = direction;
                }
                self.runs = bidi.runs;
            }
            None => {
                log::warn!("bidi analysis failed, paragraph is laid out left to right");
                self.base_direction = TextDirection::LeftToRight;
                self.runs = vec![VisualRun::new(
                    0,
                    self.text.len(),
                    TextDirection::LeftToRight,
                )];
            }
        }
    }

    fn apply_format_modifiers(&mut self, fonts: &mut FontManager) {
        for (ch, format) in self.text.iter_mut().zip(&mut self.formats) {
            if format.uppercase {
                *ch = map_case(*ch, char::to_uppercase);
            }
            if format.lowercase {
                *ch = map_case(*ch, char::to_lowercase);
            }
            if *ch == '\t' && format.tab_stops.is_empty() {
                *ch = EM_SPACE;
            }
            resolve_emoji(*ch, format, fonts);
        }
    }
}

/// Single character case mapping, characters with longer mappings stay as is.
fn map_case<I: Iterator<Item = char>>(ch: char, map: impl Fn(char) -> I) -> char {
    let mut mapped = map(ch);
    match (mapped.next(), mapped.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

fn resolve_emoji(ch: char, format: &mut ImmediateFormat, fonts: &mut FontManager) {
    let has_glyph = fonts
        .faces()
        .face(&format.face)
        .is_some_and(|face| face.has_glyph(ch));
    if !has_glyph && is_emoji(ch) {
        format.face = DEFAULT_EMOJI_FONT.to_string();
        fonts.set_requires_default_emoji_font();
    }
}

/// Splits the text at `\r`, `\n` and U+2029 and prepares each paragraph for
/// shaping.
///
/// An empty paragraph holds a single U+2028 placeholder.
pub fn split_text(text: &FormattedText, fonts: &mut FontManager) -> Vec<FormattedParagraph> {
    let formats = text.generate_format();
    let mut chars = text.text();
    let mut formats = formats.as_slice();
    let mut paragraphs = Vec::new();
    while !chars.is_empty() {
        let mut paragraph = FormattedParagraph::default();
        let consumed = paragraph.extract(chars, formats).min(chars.len());
        chars = &chars[consumed..];
        formats = &formats[consumed..];
        paragraphs.push(paragraph);
    }
    for paragraph in &mut paragraphs {
        paragraph.analyze_bidi();
        paragraph.apply_format_modifiers(fonts);
    }
    paragraphs
}
