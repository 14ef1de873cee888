// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character formats and the document level layout policies.

use core::ops::{BitOr, BitOrAssign, Range};

use letterpress_fonts::FontFeature;

/// Horizontal alignment of the lines of a paragraph.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// Same as [`HorizontalAlign::Left`].
    #[default]
    Default,
    /// Align to the left edge.
    Left,
    /// Align to the right edge.
    Right,
    /// Center between the edges.
    Center,
    /// Stretch lines to fill the width.
    Justify,
    /// Left for left-to-right text, right otherwise.
    Start,
    /// Right for left-to-right text, left otherwise.
    End,
}

/// Vertical alignment of the text within a fixed frame.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// Text starts at the top of the frame.
    #[default]
    Top,
    /// Leftover height is split evenly above and below the text.
    Center,
    /// Text ends at the bottom of the frame.
    Bottom,
}

/// Direction of a character or a run, as resolved by the bidi algorithm.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub enum TextDirection {
    /// Left to right.
    #[default]
    LeftToRight,
    /// Right to left.
    RightToLeft,
}

impl TextDirection {
    /// Returns `true` for [`TextDirection::RightToLeft`].
    pub fn is_rtl(self) -> bool {
        self == Self::RightToLeft
    }
}

/// Line drawn along with the glyphs.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub enum Decoration {
    /// No decoration.
    #[default]
    None,
    /// A single line below the baseline.
    Underline,
    /// Two lines below the baseline.
    DoubleUnderline,
    /// A line through the middle of the glyphs.
    StrikeThrough,
}

/// How the size of the text box is derived.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub enum BoundsMode {
    /// Width and height follow the content.
    AutoWidth,
    /// Width is fixed, height follows the content.
    AutoHeight,
    /// Both dimensions come from the frame.
    #[default]
    Fixed,
}

/// Where the first baseline is placed.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub enum BaselinePolicy {
    /// Center the first line within its line height.
    Center,
    /// The text origin is the first baseline.
    #[default]
    Set,
    /// Baseline is offset by the first line ascender.
    OffsetAscender,
    /// Baseline is offset by the tallest glyph of the first line.
    OffsetBearing,
}

/// What happens to content that does not fit the frame.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Content outside the frame is not drawn.
    #[default]
    NoOverflow,
    /// Lines that do not fully fit are dropped.
    ClipLine,
    /// Lines may extend past the frame.
    ExtendLine,
    /// Everything is drawn.
    ExtendAll,
}

/// How lines are positioned against the frame horizontally.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalPositionPolicy {
    /// Lines are aligned within the frame width.
    #[default]
    AlignToFrame,
    /// The frame width is only a hint.
    FrameAsHint,
}

/// Ligature features enabled for a run.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub enum Ligatures {
    /// No ligatures.
    None,
    /// Standard ligatures (`liga`).
    #[default]
    Standard,
    /// Discretionary, historical and contextual ligatures.
    Alternative,
    /// Every ligature feature.
    All,
}

impl Ligatures {
    pub(crate) fn standard(self) -> bool {
        matches!(self, Self::Standard | Self::All)
    }

    pub(crate) fn alternative(self) -> bool {
        matches!(self, Self::Alternative | Self::All)
    }
}

/// Sorted, duplicate free tab stop positions.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct TabStops(Vec<f32>);

impl TabStops {
    /// Creates tab stops from arbitrary positions.
    pub fn new(mut stops: Vec<f32>) -> Self {
        stops.retain(|s| s.is_finite());
        stops.sort_by(f32::total_cmp);
        stops.dedup();
        Self(stops)
    }

    /// Returns `true` if there are no tab stops.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The positions, ascending.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// First stop strictly past `pos`.
    pub fn next_after(&self, pos: f32) -> Option<f32> {
        let idx = self.0.partition_point(|&s| s <= pos);
        self.0.get(idx).copied()
    }

    /// Indent of the lines that follow a wrap, the second stop if any.
    pub fn newline_offset(&self) -> Option<f32> {
        self.0.get(1).copied()
    }
}

/// The resolved format of a single character.
#[derive(Clone, Debug, PartialEq)]
pub struct ImmediateFormat {
    /// Key of the face in the face table.
    pub face: String,
    /// Font size in pixels.
    pub size: f32,
    /// Explicit line height, `0` to use the face line height.
    pub line_height: f32,
    /// Lower bound of the line height, `0` for none.
    pub min_line_height: f32,
    /// Upper bound of the line height, `0` for none.
    pub max_line_height: f32,
    /// Extra advance added after each glyph.
    pub letter_spacing: f32,
    /// Extra space added after the paragraph.
    pub paragraph_spacing: f32,
    /// Indent of the first line of the paragraph.
    pub paragraph_indent: f32,
    /// Text colour packed as `0xAABBGGRR`.
    pub color: u32,
    /// Decoration drawn with the glyphs.
    pub decoration: Decoration,
    /// Alignment of the paragraph.
    pub align: HorizontalAlign,
    /// Whether kerning is applied.
    pub kerning: bool,
    /// Enabled ligatures.
    pub ligatures: Ligatures,
    /// Map characters to upper case.
    pub uppercase: bool,
    /// Map characters to lower case.
    pub lowercase: bool,
    /// Additional OpenType features.
    pub features: Vec<FontFeature>,
    /// Tab stop positions.
    pub tab_stops: TabStops,
    /// Resolved direction, filled in by bidi analysis.
    pub direction: TextDirection,
}

impl Default for ImmediateFormat {
    fn default() -> Self {
        Self {
            face: String::new(),
            size: 0.0,
            line_height: 0.0,
            min_line_height: 0.0,
            max_line_height: 0.0,
            letter_spacing: 0.0,
            paragraph_spacing: 0.0,
            paragraph_indent: 0.0,
            color: 0,
            decoration: Decoration::None,
            align: HorizontalAlign::Default,
            kerning: true,
            ligatures: Ligatures::Standard,
            uppercase: false,
            lowercase: false,
            features: Vec::new(),
            tab_stops: TabStops::default(),
            direction: TextDirection::LeftToRight,
        }
    }
}

impl ImmediateFormat {
    /// Returns `true` if both formats shape the same way.
    ///
    /// Only the face, size, ligatures, direction, features and tab stops are
    /// compared. Runs of characters with matching glyph formats are shaped
    /// together.
    pub fn same_glyph_format(&self, other: &Self) -> bool {
        self.face == other.face
            && self.size == other.size
            && self.ligatures == other.ligatures
            && self.direction == other.direction
            && self.features == other.features
            && self.tab_stops == other.tab_stops
    }

    /// Copies the fields selected by `fields` from `value`.
    pub fn apply(&mut self, fields: ModifierFields, value: &Self) {
        if fields.contains(ModifierFields::FACE) {
            self.face.clone_from(&value.face);
        }
        if fields.contains(ModifierFields::SIZE) {
            self.size = value.size;
        }
        if fields.contains(ModifierFields::LINE_HEIGHT) {
            self.line_height = value.line_height;
            self.min_line_height = value.min_line_height;
            self.max_line_height = value.max_line_height;
        }
        if fields.contains(ModifierFields::LETTER_SPACING) {
            self.letter_spacing = value.letter_spacing;
        }
        if fields.contains(ModifierFields::PARAGRAPH_SPACING) {
            self.paragraph_spacing = value.paragraph_spacing;
        }
        if fields.contains(ModifierFields::PARAGRAPH_INDENT) {
            self.paragraph_indent = value.paragraph_indent;
        }
        if fields.contains(ModifierFields::COLOR) {
            self.color = value.color;
        }
        if fields.contains(ModifierFields::DECORATION) {
            self.decoration = value.decoration;
        }
        if fields.contains(ModifierFields::ALIGN) {
            self.align = value.align;
        }
        if fields.contains(ModifierFields::KERNING) {
            self.kerning = value.kerning;
        }
        if fields.contains(ModifierFields::LIGATURES) {
            self.ligatures = value.ligatures;
        }
        // Turning one case on turns the other off.
        if fields.contains(ModifierFields::UPPERCASE) {
            self.uppercase = value.uppercase;
            if value.uppercase {
                self.lowercase = false;
            }
        }
        if fields.contains(ModifierFields::LOWERCASE) {
            self.lowercase = value.lowercase;
            if value.lowercase {
                self.uppercase = false;
            }
        }
        if fields.contains(ModifierFields::TYPE_FEATURE) {
            self.features.clone_from(&value.features);
        }
        if fields.contains(ModifierFields::TAB_STOPS) {
            self.tab_stops.clone_from(&value.tab_stops);
        }
    }

    /// Multiplies every length by `k`.
    pub(crate) fn scale(&mut self, k: f32) {
        self.size *= k;
        self.line_height *= k;
        self.min_line_height *= k;
        self.max_line_height *= k;
        self.letter_spacing *= k;
        self.paragraph_spacing *= k;
        self.paragraph_indent *= k;
    }
}

/// Set of [`ImmediateFormat`] fields a [`FormatModifier`] overrides.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct ModifierFields(u32);

impl ModifierFields {
    /// No fields.
    pub const EMPTY: Self = Self(0);
    /// [`ImmediateFormat::face`].
    pub const FACE: Self = Self(1 << 0);
    /// [`ImmediateFormat::size`].
    pub const SIZE: Self = Self(1 << 1);
    /// The line height and its bounds.
    pub const LINE_HEIGHT: Self = Self(1 << 2);
    /// [`ImmediateFormat::letter_spacing`].
    pub const LETTER_SPACING: Self = Self(1 << 3);
    /// [`ImmediateFormat::paragraph_spacing`].
    pub const PARAGRAPH_SPACING: Self = Self(1 << 4);
    /// [`ImmediateFormat::color`].
    pub const COLOR: Self = Self(1 << 5);
    /// [`ImmediateFormat::decoration`].
    pub const DECORATION: Self = Self(1 << 6);
    /// [`ImmediateFormat::align`].
    pub const ALIGN: Self = Self(1 << 7);
    /// [`ImmediateFormat::kerning`].
    pub const KERNING: Self = Self(1 << 8);
    /// [`ImmediateFormat::ligatures`].
    pub const LIGATURES: Self = Self(1 << 9);
    /// [`ImmediateFormat::uppercase`].
    pub const UPPERCASE: Self = Self(1 << 10);
    /// [`ImmediateFormat::lowercase`].
    pub const LOWERCASE: Self = Self(1 << 11);
    /// [`ImmediateFormat::paragraph_indent`].
    pub const PARAGRAPH_INDENT: Self = Self(1 << 12);
    /// [`ImmediateFormat::features`].
    pub const TYPE_FEATURE: Self = Self(1 << 13);
    /// [`ImmediateFormat::tab_stops`].
    pub const TAB_STOPS: Self = Self(1 << 14);

    /// Returns `true` if every field of `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ModifierFields {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierFields {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Overrides some format fields over a range of characters.
#[derive(Clone, Debug, PartialEq)]
pub struct FormatModifier {
    /// Character range, in code points.
    pub range: Range<usize>,
    /// Fields taken from `value`.
    pub fields: ModifierFields,
    /// Source of the overridden fields.
    pub value: ImmediateFormat,
}

/// Document level layout policies.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct FormattingParams {
    /// Vertical alignment within a fixed frame.
    pub vertical_align: VerticalAlign,
    /// How the text box is sized.
    pub bounds_mode: BoundsMode,
    /// Placement of the first baseline.
    pub baseline_policy: BaselinePolicy,
    /// Handling of overflowing content.
    pub overflow_policy: OverflowPolicy,
    /// Horizontal positioning against the frame.
    pub horizontal_policy: HorizontalPositionPolicy,
}
