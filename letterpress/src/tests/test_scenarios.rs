// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::format::{
    BaselinePolicy, BoundsMode, Decoration, HorizontalAlign, OverflowPolicy, VerticalAlign,
};
use crate::geometry::{Point, Rect};
use crate::{
    test_name, Config, ShapeErrorKind, StyleRange, TextFrame, TextStyle, Underline,
};

use super::utils::{BoxFace, TestEnv, BOX_FONT, FONT_SIZE};

#[test]
fn single_character() {
    let mut env = TestEnv::new(test_name!());
    let handle = env.shape(&env.document("A"));
    let placed = env.placed(handle);

    assert_eq!(placed.glyphs.len(), 1, "one face bucket");
    assert!(placed.decorations.is_empty(), "no decorations");
    let glyphs = &placed.glyphs[BOX_FONT];
    assert_eq!(glyphs.len(), 1, "one glyph");
    let glyph = &glyphs[0];
    assert_eq!(glyph.codepoint, u32::from('A'), "codepoint");
    assert_eq!(glyph.font_size, FONT_SIZE, "font size");
    assert_eq!(glyph.index, 0, "source index");
    assert_eq!(glyph.color, 0xFF00_0000, "opaque black");
    // The box face ascender is 8 at size 10.
    assert_eq!(glyph.origin, Point::new(0.0, 8.0), "origin on the first baseline");
    assert_eq!(glyph.bitmap_box(), Rect::new(0.0, 1.0, 5.0, 8.0), "box above the baseline");

    // Five wide and a line height of twelve tall.
    assert_eq!(placed.bounds, Rect::new(0.0, 0.0, 5.0, 12.0), "text frame");
    assert_eq!(placed.baseline, 8.0, "baseline");
    let corner = placed.transform * Point::ZERO;
    assert_eq!(corner, Point::new(0.0, -8.0), "the canvas origin is the baseline");
}

#[test]
fn single_character_at_double_scale() {
    let mut env = TestEnv::new(test_name!());
    let handle = env.shape(&env.document("A"));
    let (image, output) = env.render(handle, 2.0);

    assert_eq!((image.width, image.height), (10, 24), "buffer size");
    assert_eq!(output.bounds.w, 10, "bounds width");
    assert_eq!(output.bounds.h, 24, "bounds height");
    assert_eq!(image.painted_rows(), (2..16).collect::<Vec<_>>(), "glyph rows");
    assert_eq!(image.pixel(0, 2), 0xFF00_0000, "solid glyph pixel");
    assert_eq!(image.pixel(9, 15), 0xFF00_0000, "solid glyph pixel");
    assert_eq!(image.pixel(0, 16), 0, "below the baseline");
}

#[test]
fn mixed_decorations() {
    let mut env = TestEnv::new(test_name!());
    let mut document = env.document("abc");
    let decorated = |style: TextStyle, at: usize| StyleRange {
        style,
        ranges: vec![at..at + 1],
    };
    document.styles = vec![
        decorated(
            TextStyle {
                underline: Some(Underline::Single),
                ..Default::default()
            },
            0,
        ),
        decorated(
            TextStyle {
                underline: Some(Underline::Double),
                ..Default::default()
            },
            1,
        ),
        decorated(
            TextStyle {
                line_through: Some(true),
                ..Default::default()
            },
            2,
        ),
    ];
    let handle = env.shape(&document);
    let placed = env.placed(handle);

    let kinds: Vec<_> = placed.decorations.iter().map(|d| d.decoration).collect();
    assert_eq!(
        kinds,
        [
            Decoration::Underline,
            Decoration::DoubleUnderline,
            Decoration::StrikeThrough
        ],
        "decorations in source order"
    );
    let spans: Vec<_> = placed
        .decorations
        .iter()
        .map(|d| (d.start.x, d.end.x))
        .collect();
    assert_eq!(spans, [(0.0, 5.0), (5.0, 10.0), (10.0, 15.0)], "adjacent spans");
    // Underlines sit one pixel below the baseline, the strike through a
    // quarter of the line height above it.
    let rows: Vec<_> = placed.decorations.iter().map(|d| d.start.y).collect();
    assert_eq!(rows, [9.0, 9.0, 5.0], "decoration rows");
    for decoration in &placed.decorations {
        assert_eq!(decoration.thickness, 0.5, "face underline thickness");
        assert_eq!(decoration.color, 0xFF00_0000, "text colour");
    }

    // At scale four the double underline is two strokes of two pixels with
    // a one pixel gap on row 36.
    let (image, _) = env.render(handle, 4.0);
    let painted: Vec<_> = (33..40).filter(|&y| image.alpha(25, y) != 0).collect();
    assert_eq!(painted, [34, 35, 37, 38], "two parallel strokes");
    let single: Vec<_> = (33..40).filter(|&y| image.alpha(5, y) != 0).collect();
    assert_eq!(single, [35, 36], "one stroke under the first glyph");
}

#[test]
fn clip_line_drops_the_overflowing_line() {
    let mut env = TestEnv::new(test_name!());
    let mut document = env.document("aaa bbb");
    document.frame = Some(TextFrame {
        mode: BoundsMode::Fixed,
        size: Some((20.0, 15.0)),
    });
    document.overflow_policy = OverflowPolicy::ClipLine;
    let handle = env.shape(&document);

    let (image, output) = env.render_immediate(handle, 1.0);
    assert_eq!(output.bounds.h, 15, "bounds keep the frame height");
    assert_eq!((image.width, image.height), (20, 15), "buffer size");
    // The second line would cover rows 13 and 14.
    assert_eq!(image.painted_rows(), (1..8).collect::<Vec<_>>(), "only the first line");

    let mut env = TestEnv::with_config(
        test_name!(),
        Config {
            cut_last_line: false,
            ..Config::default()
        },
    );
    let handle = env.shape(&document);
    let (image, _) = env.render_immediate(handle, 1.0);
    assert!(image.painted_rows().contains(&13), "partial line is drawn");
}

#[test]
fn missing_font_round_trip() {
    let mut env = TestEnv::new(test_name!());
    let mut document = env.document("Hi");
    document.default_style.font = Some("Missing".into());

    assert_eq!(env.cx.list_missing_fonts(&document), ["Missing"], "missing face listed");
    assert!(env.cx.shape_text(&document).is_none(), "nothing to shape with");

    let handle = env.shape(&env.document("Hi"));
    let err = env.cx.reshape_text(handle, &document).unwrap_err();
    assert_eq!(err.kind(), ShapeErrorKind::Shape, "no paragraph produced glyphs");
    assert_eq!(env.placed(handle).glyph_count(), 2, "failed reshape keeps the result");

    env.cx.add_face("Missing", BoxFace::new("Missing").boxed());
    assert!(env.cx.list_missing_fonts(&document).is_empty(), "face now loaded");
    let handle = env.shape(&document);
    assert_eq!(env.placed(handle).glyphs["Missing"].len(), 2, "shaped with the new face");
}

#[test]
fn auto_width_second_pass() {
    let mut env = TestEnv::new(test_name!());
    let mut document = env.document("aaa bbb");
    document.frame = Some(TextFrame {
        mode: BoundsMode::AutoWidth,
        size: Some((5.0, 0.0)),
    });
    let handle = env.shape(&document);
    let placed = env.placed(handle);

    assert_eq!(placed.bounds.width(), 35.0, "width of the single line");
    let glyphs = placed.glyphs_in_text_order();
    assert_eq!(glyphs.len(), 6, "spaces are not placed");
    assert!(
        glyphs.iter().all(|(_, g)| g.origin.y == 8.0),
        "everything on the first line"
    );
    let xs: Vec<_> = glyphs.iter().map(|(_, g)| g.origin.x).collect();
    assert_eq!(xs, [0.0, 5.0, 10.0, 20.0, 25.0, 30.0], "natural advances");
}

#[test]
fn fixed_width_wraps() {
    let mut env = TestEnv::new(test_name!());
    let mut document = env.document("aaa bbb");
    document.frame = Some(TextFrame {
        mode: BoundsMode::AutoHeight,
        size: Some((20.0, 0.0)),
    });
    let handle = env.shape(&document);
    let placed = env.placed(handle);

    assert_eq!(placed.bounds, Rect::new(0.0, 0.0, 20.0, 22.0), "two lines");
    let origins: Vec<_> = placed
        .glyphs_in_text_order()
        .iter()
        .map(|(_, g)| (g.origin.x, g.origin.y))
        .collect();
    assert_eq!(
        origins,
        [
            (0.0, 8.0),
            (5.0, 8.0),
            (10.0, 8.0),
            (0.0, 20.0),
            (5.0, 20.0),
            (10.0, 20.0)
        ],
        "second line one line height lower"
    );
}

#[test]
fn legacy_kerning() {
    let mut env = TestEnv::new(test_name!());
    env.cx.add_face(BOX_FONT, BoxFace::new(BOX_FONT).with_kerning(-0.1).boxed());
    let handle = env.shape(&env.document("AV"));
    let placed = env.placed(handle);
    let xs: Vec<_> = placed.glyphs[BOX_FONT].iter().map(|g| g.origin.x).collect();
    assert_eq!(xs, [0.0, 4.0], "pair moved closer");

    let mut document = env.document("AV");
    document.default_style.kerning = Some(false);
    let handle = env.shape(&document);
    let placed = env.placed(handle);
    let xs: Vec<_> = placed.glyphs[BOX_FONT].iter().map(|g| g.origin.x).collect();
    assert_eq!(xs, [0.0, 5.0], "kerning disabled by the style");
}

fn text_order_origins(placed: &crate::PlacedTextData) -> Vec<(f64, f64)> {
    placed
        .glyphs_in_text_order()
        .iter()
        .map(|(_, g)| (g.origin.x, g.origin.y))
        .collect()
}

#[test]
fn right_to_left_starts_at_the_right_edge() {
    let mut env = TestEnv::new(test_name!());
    let mut document = env.document("\u{5D0}\u{5D1}");
    document.frame = Some(TextFrame {
        mode: BoundsMode::AutoHeight,
        size: Some((30.0, 0.0)),
    });
    document.horizontal_align = HorizontalAlign::Start;
    let handle = env.shape(&document);
    let placed = env.placed(handle);

    let xs: Vec<_> = text_order_origins(&placed).iter().map(|o| o.0).collect();
    assert_eq!(xs, [25.0, 20.0], "first letter rightmost");

    let (image, _) = env.render(handle, 1.0);
    assert_eq!(image.width, 30, "frame width");
    assert!((20..30).all(|x| image.alpha(x, 4) == u8::MAX), "letters drawn on the right");
    assert!((0..20).all(|x| image.alpha(x, 4) == 0), "left side untouched");
}

#[test]
fn mixed_direction_reorders_the_hebrew_run() {
    let mut env = TestEnv::new(test_name!());
    let handle = env.shape(&env.document("ab \u{5D0}\u{5D1}"));
    let placed = env.placed(handle);

    let xs: Vec<_> = text_order_origins(&placed).iter().map(|o| o.0).collect();
    assert_eq!(xs, [0.0, 5.0, 20.0, 15.0], "latin left to right, hebrew reversed");

    let (image, _) = env.render(handle, 1.0);
    let painted: Vec<_> = (0..image.width).filter(|&x| image.alpha(x, 4) != 0).collect();
    let expected: Vec<_> = (0..10).chain(15..25).collect();
    assert_eq!(painted, expected, "the space stays between the runs");
}

#[test]
fn vertical_alignment_in_a_fixed_frame() {
    let mut env = TestEnv::new(test_name!());
    let mut document = env.document("A");
    document.frame = Some(TextFrame {
        mode: BoundsMode::Fixed,
        size: Some((20.0, 40.0)),
    });
    let origin_y = |env: &mut TestEnv, align: VerticalAlign| {
        let mut document = document.clone();
        document.vertical_align = align;
        let handle = env.shape(&document);
        text_order_origins(&env.placed(handle))[0].1
    };

    assert_eq!(origin_y(&mut env, VerticalAlign::Top), 8.0, "top");
    // The text spans ten pixels down to its descender.
    assert_eq!(origin_y(&mut env, VerticalAlign::Center), 23.0, "centered");
    assert_eq!(origin_y(&mut env, VerticalAlign::Bottom), 38.0, "descender on the bottom edge");
}

#[test]
fn baseline_policies() {
    let mut env = TestEnv::new(test_name!());
    let mut shape_with = |policy: BaselinePolicy| {
        let mut document = env.document("A");
        document.baseline_policy = policy;
        let handle = env.shape(&document);
        env.placed(handle)
    };

    let placed = shape_with(BaselinePolicy::Set);
    assert_eq!(placed.baseline, 8.0, "set");
    assert_eq!(placed.transform * Point::ZERO, Point::new(0.0, -8.0), "set moves the canvas");

    let placed = shape_with(BaselinePolicy::OffsetAscender);
    assert_eq!(placed.baseline, 8.0, "ascender");
    assert_eq!(placed.transform * Point::ZERO, Point::ZERO, "ascender keeps the corner");

    let placed = shape_with(BaselinePolicy::OffsetBearing);
    assert_eq!(placed.baseline, 7.0, "glyph top on the frame edge");
    assert_eq!(text_order_origins(&placed), [(0.0, 7.0)], "bearing origin");

    // Half of the line height left after the ascender and descender.
    let placed = shape_with(BaselinePolicy::Center);
    assert_eq!(placed.baseline, 1.0, "center");
    assert_eq!(placed.transform * Point::ZERO, Point::ZERO, "center keeps the corner");
}

#[test]
fn bitmap_strikes_resize_to_the_requested_size() {
    let mut env = TestEnv::new(test_name!());
    env.cx.add_face(BOX_FONT, BoxFace::new(BOX_FONT).with_strike(20.0).boxed());
    let handle = env.shape(&env.document("AB"));
    let placed = env.placed(handle);

    assert_eq!(
        text_order_origins(&placed),
        [(0.0, 8.0), (5.0, 8.0)],
        "advances scaled from the strike"
    );
    let glyph = &placed.glyphs[BOX_FONT][0];
    let bitmap = glyph.bitmap_box();
    // The 10 by 14 strike image shrinks by 0.4.
    assert_eq!(bitmap.width(), 4.0, "bitmap width");
    assert_eq!(bitmap.height(), 6.0, "bitmap height");
}
