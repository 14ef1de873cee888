// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich text: characters, a base format and ranged modifiers.

use std::collections::BTreeSet;

use letterpress_fonts::DEFAULT_EMOJI_FONT;

use crate::analysis::{is_emoji, END_OF_TEXT};
use crate::format::{FormatModifier, FormattingParams, ImmediateFormat, ModifierFields};

const PREVIEW_LEN: usize = 12;

/// Text with its formatting, the input of shaping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormattedText {
    text: Vec<char>,
    base: ImmediateFormat,
    modifiers: Vec<FormatModifier>,
    params: FormattingParams,
}

impl FormattedText {
    /// Creates an empty text with the given base format.
    pub fn new(base: ImmediateFormat, params: FormattingParams) -> Self {
        Self {
            text: Vec::new(),
            base,
            modifiers: Vec::new(),
            params,
        }
    }

    /// Appends characters. The end of text marker becomes a space.
    pub fn append(&mut self, text: &str) {
        self.text.extend(
            text.chars()
                .map(|ch| if ch == END_OF_TEXT { ' ' } else { ch }),
        );
    }

    /// Overrides `fields` over `range` with values from `value`.
    ///
    /// Modifiers apply in the order they are added.
    pub fn add_modifier(
        &mut self,
        range: core::ops::Range<usize>,
        fields: ModifierFields,
        value: ImmediateFormat,
    ) {
        self.modifiers.push(FormatModifier {
            range,
            fields,
            value,
        });
    }

    /// The characters.
    pub fn text(&self) -> &[char] {
        &self.text
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if there are no characters.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The format every character starts from.
    pub fn base_format(&self) -> &ImmediateFormat {
        &self.base
    }

    /// Ranged overrides, in application order.
    pub fn modifiers(&self) -> &[FormatModifier] {
        &self.modifiers
    }

    /// Document level policies.
    pub fn params(&self) -> &FormattingParams {
        &self.params
    }

    /// Resolved format of every character.
    pub fn generate_format(&self) -> Vec<ImmediateFormat> {
        let mut formats = vec![self.base.clone(); self.text.len()];
        for modifier in &self.modifiers {
            let end = modifier.range.end.min(formats.len());
            let start = modifier.range.start.min(end);
            for format in &mut formats[start..end] {
                format.apply(modifier.fields, &modifier.value);
            }
        }
        formats
    }

    /// Resolved format of the first character, the base format for empty text.
    pub fn first_format(&self) -> ImmediateFormat {
        let mut format = self.base.clone();
        for modifier in &self.modifiers {
            if modifier.range.start == 0 && modifier.range.end > 0 {
                format.apply(modifier.fields, &modifier.value);
            }
        }
        format
    }

    /// A copy for editing: no characters and the first character's format as base.
    pub fn derive_edited(&self) -> Self {
        Self {
            text: Vec::new(),
            base: self.first_format(),
            modifiers: Vec::new(),
            params: self.params,
        }
    }

    /// A copy with every length multiplied by `k`.
    pub fn derive_scaled(&self, k: f32) -> Self {
        let mut scaled = self.clone();
        scaled.base.scale(k);
        for modifier in &mut scaled.modifiers {
            modifier.value.scale(k);
        }
        scaled
    }

    /// A copy formatted uniformly with `format`.
    pub fn derive_formatted(&self, format: ImmediateFormat) -> Self {
        Self {
            text: self.text.clone(),
            base: format,
            modifiers: Vec::new(),
            params: self.params,
        }
    }

    /// Short single line excerpt for log messages.
    pub fn preview(&self) -> String {
        let mut preview: String = self
            .text
            .iter()
            .take(PREVIEW_LEN)
            .map(|&ch| if ch == '\n' { ' ' } else { ch })
            .collect();
        if self.text.len() > PREVIEW_LEN {
            preview.push_str("...");
        }
        preview
    }

    /// Keys of every face the text may need, sorted.
    ///
    /// Includes the emoji fallback face when the text contains an emoji.
    pub fn collect_used_face_names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        if !self.base.face.is_empty() {
            names.insert(self.base.face.clone());
        }
        for modifier in &self.modifiers {
            if modifier.fields.contains(ModifierFields::FACE) && !modifier.value.face.is_empty() {
                names.insert(modifier.value.face.clone());
            }
        }
        if self.text.iter().any(|&ch| is_emoji(ch)) {
            names.insert(DEFAULT_EMOJI_FONT.to_string());
        }
        names.into_iter().collect()
    }
}
