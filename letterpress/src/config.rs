// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout and rendering switches.

/// Switches that tune layout and rendering of every text in a
/// [`Context`](crate::Context).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Floor the first baseline instead of rounding it.
    pub floor_baseline: bool,
    /// Cap the stretch of interword spaces in justified lines.
    pub limit_justify_space_width: bool,
    /// Justify lines that were ended by an explicit line separator.
    pub justify_ambiguous: bool,
    /// Allow lines that only partially fit under a clip-line overflow policy
    /// to be cut.
    pub cut_last_line: bool,
    /// Shift the first glyph of each line left by its bitmap bearing.
    pub disregard_first_bearing: bool,
    /// Do not add letter spacing after the last glyph of a line.
    pub disregard_last_spacing: bool,
    /// Lay out right-to-left runs in visual order.
    pub enable_rtl: bool,
    /// Apply legacy TrueType kerning tables during layout.
    pub allow_true_type_kerning: bool,
    /// Apply legacy kerning tables even when the face has an OpenType
    /// `kern` feature.
    pub force_true_type_kerning: bool,
    /// Never limit the vertical extent of the glyph bounds.
    pub infinite_vertical_stretch: bool,
    /// Extend the text height by the last line's descender.
    pub last_line_descender_offset: bool,
    /// Use the actual first line height instead of the explicit one for the
    /// minimal text height.
    pub prefer_real_line_height_over_explicit: bool,
    /// Render outlines without hinting.
    pub disable_hinting: bool,
    /// Restrict the drawn area to the requested view rectangle.
    pub enable_view_area_cutout: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            floor_baseline: false,
            limit_justify_space_width: false,
            justify_ambiguous: true,
            cut_last_line: true,
            disregard_first_bearing: false,
            disregard_last_spacing: false,
            enable_rtl: true,
            allow_true_type_kerning: true,
            force_true_type_kerning: false,
            infinite_vertical_stretch: false,
            last_line_descender_offset: true,
            prefer_real_line_height_over_explicit: false,
            disable_hinting: true,
            enable_view_area_cutout: true,
        }
    }
}
