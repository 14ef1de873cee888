// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use letterpress_fonts::FontManager;

use crate::config::Config;
use crate::format::HorizontalAlign;
use crate::layout::{Justifiable, VerticalPositioning};
use crate::{
    split_text, test_name, FormattedParagraph, LetterCase, ParagraphShape, ReportedFontReason,
    TextDocument,
};

use super::utils::{BoxFace, TestEnv, BOX_FONT};

fn fonts() -> FontManager {
    let mut fonts = FontManager::new();
    fonts.insert_face(BOX_FONT, BoxFace::new(BOX_FONT).boxed());
    fonts
}

fn paragraphs(document: &TextDocument, fonts: &mut FontManager) -> Vec<FormattedParagraph> {
    split_text(&document.parse().text, fonts)
}

#[test]
fn hard_breaks_split_paragraphs() {
    let env = TestEnv::new(test_name!());
    let mut fonts = fonts();
    let split = paragraphs(&env.document("ab\n\ncd\u{2029}e\r"), &mut fonts);
    let texts: Vec<String> = split.iter().map(|p| p.text().iter().collect()).collect();
    assert_eq!(texts, ["ab", "\u{2028}", "cd", "e"], "empty paragraph keeps a separator");
    for paragraph in &split {
        assert_eq!(
            paragraph.formats().len(),
            paragraph.text().len(),
            "one format per character"
        );
    }
}

#[test]
fn case_and_tabs_are_substituted() {
    let env = TestEnv::new(test_name!());
    let mut fonts = fonts();
    let mut document = env.document("a\tB");
    document.default_style.letter_case = Some(LetterCase::Upper);
    let split = paragraphs(&document, &mut fonts);
    assert_eq!(split[0].text(), ['A', '\u{2003}', 'B'], "upper case and em space");
}

#[test]
fn lines_cover_every_glyph() {
    let env = TestEnv::new(test_name!());
    let mut fonts = fonts();
    let split = paragraphs(&env.document("aaa bbb cc"), &mut fonts);
    let mut shape = ParagraphShape::new(false);
    let result = shape.shape(&split[0], fonts.faces(), 20.0);
    assert!(result.success, "paragraph shaped");
    assert_eq!(result.fallbacks.get(BOX_FONT), Some(&false), "face used directly");

    let spans = shape.line_spans();
    let lens: Vec<usize> = spans.iter().map(|l| l.len()).collect();
    assert_eq!(lens, [4, 4, 2], "trailing spaces stay in their line");
    assert_eq!(lens.iter().sum::<usize>(), shape.glyphs().len(), "every glyph on a line");
    let widths: Vec<f32> = spans.iter().map(|l| l.line_width).collect();
    assert_eq!(widths, [15.0, 15.0, 10.0], "widths without trailing spaces");
    assert_eq!(spans[0].justifiable, Justifiable::Positive, "wrapped line");
    assert_eq!(spans[2].justifiable, Justifiable::Negative, "last line");

    let mut y = 0.0;
    let mut positioning = VerticalPositioning::TopBound;
    let config = Config::default();
    let result = shape.draw(fonts.faces(), &config, 20, &mut y, &mut positioning, 1.0, true);
    assert_eq!(result.journal.line_count(), spans.len(), "one record per line");
    assert_eq!(result.journal.glyph_counts(), lens, "one slot per glyph");
    assert_eq!(y, 32.0, "caret on the third baseline");
    assert_eq!(result.first_ascender, 8.0, "first line ascender");
    assert_eq!(result.last_line_descender, -2.0, "last line descender");
    assert_eq!(result.max_line_width, 20.0, "box width");
}

#[test]
fn unknown_faces_are_reported() {
    let env = TestEnv::new(test_name!());
    let mut fonts = fonts();
    let mut document = env.document("ab");
    document.default_style.font = Some("Nope".into());
    let split = paragraphs(&document, &mut fonts);
    let mut shape = ParagraphShape::new(false);
    let result = shape.shape(&split[0], fonts.faces(), 0.0);
    assert!(!result.success, "nothing to shape with");
    assert_eq!(
        shape.reported_faces().get("Nope"),
        Some(&ReportedFontReason::NoData),
        "missing face reported"
    );
}

#[test]
fn justified_lines_fill_the_box() {
    let env = TestEnv::new(test_name!());
    let mut fonts = fonts();
    let mut document = env.document("a b ccc");
    document.horizontal_align = HorizontalAlign::Justify;
    let split = paragraphs(&document, &mut fonts);
    let mut shape = ParagraphShape::new(false);
    assert!(shape.shape(&split[0], fonts.faces(), 20.0).success, "shaped");
    assert_eq!(shape.line_spans().len(), 2, "wrapped before the long word");

    let mut y = 0.0;
    let mut positioning = VerticalPositioning::TopBound;
    let config = Config::default();
    let result = shape.draw(fonts.faces(), &config, 20, &mut y, &mut positioning, 1.0, true);
    let first_line: Vec<f64> = result.journal.lines[0]
        .glyphs
        .iter()
        .flatten()
        .map(|g| g.origin.x)
        .collect();
    // "a b" is 15 wide, the single space takes the remaining 5.
    assert_eq!(first_line, [0.0, 15.0], "second word pushed to the edge");
    let last_line: Vec<f64> = result.journal.lines[1]
        .glyphs
        .iter()
        .flatten()
        .map(|g| g.origin.x)
        .collect();
    assert_eq!(last_line, [0.0, 5.0, 10.0], "last line is not stretched");
}
