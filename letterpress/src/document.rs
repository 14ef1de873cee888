// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input document: a string with styles, a frame and alignment.

use core::ops::Range;

use letterpress_fonts::FontFeature;
use tiny_skia::Color;

use crate::format::{
    BaselinePolicy, BoundsMode, Decoration, FormattingParams, HorizontalAlign,
    HorizontalPositionPolicy, ImmediateFormat, Ligatures, ModifierFields, OverflowPolicy,
    VerticalAlign,
};
use crate::geometry::Affine;
use crate::text::FormattedText;

/// How a text is painted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Fill {
    /// A solid colour.
    Solid(Color),
    /// A paint the renderer does not draw, such as a gradient or an image.
    Unsupported,
}

/// Underline style.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub enum Underline {
    /// No underline.
    #[default]
    None,
    /// A single stroke.
    Single,
    /// Two strokes.
    Double,
}

/// Case transform.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub enum LetterCase {
    /// Characters as written.
    #[default]
    None,
    /// Upper case.
    Upper,
    /// Lower case.
    Lower,
}

/// Text style with every field optional.
///
/// In the default style missing fields take their defaults. In a range style
/// only the present fields override the default style.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct TextStyle {
    /// PostScript name of the font face.
    pub font: Option<String>,
    /// Font size in pixels.
    pub font_size: Option<f32>,
    /// Explicit line height.
    pub line_height: Option<f32>,
    /// Extra advance after each glyph.
    pub letter_spacing: Option<f32>,
    /// Paints, the first solid colour is used.
    pub fills: Option<Vec<Fill>>,
    /// Underline style.
    pub underline: Option<Underline>,
    /// Strike-through.
    pub line_through: Option<bool>,
    /// Kerning, on by default.
    pub kerning: Option<bool>,
    /// Case transform.
    pub letter_case: Option<LetterCase>,
    /// Ligatures, standard by default.
    pub ligatures: Option<Ligatures>,
    /// OpenType features.
    pub features: Option<Vec<FontFeature>>,
}

/// A style applied to code point ranges of the value.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct StyleRange {
    /// The style.
    pub style: TextStyle,
    /// Half-open code point ranges.
    pub ranges: Vec<Range<usize>>,
}

/// The box a text is laid out in.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct TextFrame {
    /// How the box adapts to the text.
    pub mode: BoundsMode,
    /// Nominal width and height.
    pub size: Option<(f32, f32)>,
}

/// A styled text with its placement.
#[derive(Clone, Debug, PartialEq)]
pub struct TextDocument {
    /// The characters.
    pub value: String,
    /// Style of the whole text.
    pub default_style: TextStyle,
    /// Styles overriding the default style over ranges.
    pub styles: Vec<StyleRange>,
    /// Affine transform `[a, b, c, d, tx, ty]`, column-major.
    pub transform: [f32; 6],
    /// The layout box, unbounded when absent.
    pub frame: Option<TextFrame>,
    /// Vertical alignment within a fixed frame.
    pub vertical_align: VerticalAlign,
    /// Horizontal alignment of every paragraph.
    pub horizontal_align: HorizontalAlign,
    /// Placement of the first baseline.
    pub baseline_policy: BaselinePolicy,
    /// Handling of overflowing content.
    pub overflow_policy: OverflowPolicy,
}

impl Default for TextDocument {
    fn default() -> Self {
        Self {
            value: String::new(),
            default_style: TextStyle::default(),
            styles: Vec::new(),
            transform: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            frame: None,
            vertical_align: VerticalAlign::default(),
            horizontal_align: HorizontalAlign::default(),
            baseline_policy: BaselinePolicy::default(),
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

/// A document converted for shaping.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedDocument {
    /// The formatted text.
    pub text: FormattedText,
    /// The text transform.
    pub transform: Affine,
    /// Frame size, present when the document has a frame.
    pub frame_size: Option<(f32, f32)>,
}

impl TextDocument {
    /// Creates a document holding `value` in the given style.
    pub fn new(value: impl Into<String>, default_style: TextStyle) -> Self {
        Self {
            value: value.into(),
            default_style,
            ..Default::default()
        }
    }

    /// Converts the document into a formatted text.
    pub fn parse(&self) -> ParsedDocument {
        let params = FormattingParams {
            vertical_align: self.vertical_align,
            bounds_mode: self.frame.map(|f| f.mode).unwrap_or_default(),
            baseline_policy: self.baseline_policy,
            overflow_policy: self.overflow_policy,
            horizontal_policy: HorizontalPositionPolicy::AlignToFrame,
        };
        let mut text = FormattedText::new(self.base_format(), params);
        for range in &self.styles {
            let (fields, value) = parse_style(&range.style);
            if fields.is_empty() {
                continue;
            }
            for r in &range.ranges {
                text.add_modifier(r.clone(), fields, value.clone());
            }
        }
        text.append(&self.value);

        ParsedDocument {
            text,
            transform: Affine::new(self.transform.map(f64::from)),
            frame_size: self.frame.map(|f| f.size.unwrap_or((0.0, 0.0))),
        }
    }

    fn base_format(&self) -> ImmediateFormat {
        let style = &self.default_style;
        let case = style.letter_case.unwrap_or_default();
        ImmediateFormat {
            face: style.font.clone().unwrap_or_default(),
            size: style.font_size.unwrap_or(0.0),
            line_height: style.line_height.unwrap_or(0.0),
            letter_spacing: style.letter_spacing.unwrap_or(0.0),
            color: parse_color(style),
            decoration: parse_decoration(style),
            align: self.horizontal_align,
            kerning: style.kerning.unwrap_or(true),
            ligatures: style.ligatures.unwrap_or(Ligatures::Standard),
            uppercase: case == LetterCase::Upper,
            lowercase: case == LetterCase::Lower,
            features: style.features.clone().unwrap_or_default(),
            ..Default::default()
        }
    }
}

fn parse_color(style: &TextStyle) -> u32 {
    style
        .fills
        .iter()
        .flatten()
        .find_map(|fill| match fill {
            Fill::Solid(color) => {
                let c = color.to_color_u8();
                Some(u32::from_le_bytes([c.red(), c.green(), c.blue(), c.alpha()]))
            }
            Fill::Unsupported => None,
        })
        .unwrap_or(0)
}

fn parse_underline(underline: Underline) -> Decoration {
    match underline {
        Underline::None => Decoration::None,
        Underline::Single => Decoration::Underline,
        Underline::Double => Decoration::DoubleUnderline,
    }
}

fn parse_decoration(style: &TextStyle) -> Decoration {
    if style.line_through == Some(true) {
        return Decoration::StrikeThrough;
    }
    parse_underline(style.underline.unwrap_or_default())
}

fn parse_style(style: &TextStyle) -> (ModifierFields, ImmediateFormat) {
    let mut fields = ModifierFields::EMPTY;
    let mut value = ImmediateFormat::default();
    if let Some(font) = &style.font {
        fields |= ModifierFields::FACE;
        value.face.clone_from(font);
    }
    if let Some(size) = style.font_size {
        fields |= ModifierFields::SIZE;
        value.size = size;
    }
    if let Some(line_height) = style.line_height {
        fields |= ModifierFields::LINE_HEIGHT;
        value.line_height = line_height;
    }
    if let Some(spacing) = style.letter_spacing {
        fields |= ModifierFields::LETTER_SPACING;
        value.letter_spacing = spacing;
    }
    if style.fills.is_some() {
        fields |= ModifierFields::COLOR;
        value.color = parse_color(style);
    }
    if let Some(underline) = style.underline {
        fields |= ModifierFields::DECORATION;
        value.decoration = parse_underline(underline);
    }
    if let Some(line_through) = style.line_through {
        fields |= ModifierFields::DECORATION;
        if line_through {
            value.decoration = Decoration::StrikeThrough;
        }
    }
    if let Some(kerning) = style.kerning {
        fields |= ModifierFields::KERNING;
        value.kerning = kerning;
    }
    if let Some(ligatures) = style.ligatures {
        fields |= ModifierFields::LIGATURES;
        value.ligatures = ligatures;
    }
    match style.letter_case {
        Some(LetterCase::Upper) => {
            fields |= ModifierFields::UPPERCASE;
            value.uppercase = true;
        }
        Some(LetterCase::Lower) => {
            fields |= ModifierFields::LOWERCASE;
            value.lowercase = true;
        }
        Some(LetterCase::None) | None => {}
    }
    if let Some(features) = &style.features {
        fields |= ModifierFields::TYPE_FEATURE;
        value.features.clone_from(features);
    }
    (fields, value)
}
