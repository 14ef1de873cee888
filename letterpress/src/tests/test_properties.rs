// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::format::BoundsMode;
use crate::geometry::Point;
use crate::{test_name, DrawOutput, StyleRange, TextDocument, TextFrame};

use super::utils::TestEnv;

fn wrapped(env: &TestEnv, text: &str) -> TextDocument {
    let mut document = env.document(text);
    document.frame = Some(TextFrame {
        mode: BoundsMode::AutoHeight,
        size: Some((20.0, 0.0)),
    });
    document
}

#[test]
fn shaping_is_idempotent() {
    let mut env = TestEnv::new(test_name!());
    let document = wrapped(&env, "aaa bbb\ncc");
    let first = env.shape(&document);
    let second = env.shape(&document);
    let placed = env.placed(first);
    assert_eq!(env.placed(second), placed, "same document, same result");

    env.cx.reshape_text(first, &document).unwrap();
    assert_eq!(env.placed(first), placed, "reshaping changes nothing");
}

#[test]
fn source_indices_increase() {
    let mut env = TestEnv::new(test_name!());
    let text = "ab cd\nef  g";
    let handle = env.shape(&wrapped(&env, text));
    let placed = env.placed(handle);
    let chars: Vec<char> = text.chars().collect();

    let glyphs = placed.glyphs_in_text_order();
    assert_eq!(glyphs.len(), 7, "every letter placed");
    for pair in glyphs.windows(2) {
        assert!(pair[0].1.index < pair[1].1.index, "strictly increasing");
    }
    for (_, glyph) in &glyphs {
        assert_eq!(
            glyph.codepoint,
            u32::from(chars[glyph.index]),
            "index {} points at the source character",
            glyph.index
        );
    }
}

#[test]
fn whole_text_modifier_equal_to_base_is_neutral() {
    let mut env = TestEnv::new(test_name!());
    let plain = wrapped(&env, "aaa bbb");
    let mut styled = plain.clone();
    styled.styles = vec![StyleRange {
        style: env.style(),
        ranges: vec![0..7],
    }];
    let a = env.shape(&plain);
    let b = env.shape(&styled);
    assert_eq!(env.placed(a), env.placed(b), "modifier changes nothing");
}

#[test]
fn immediate_and_placed_draws_agree() {
    let mut env = TestEnv::new(test_name!());
    for document in [env.document("A"), wrapped(&env, "aaa bbb")] {
        let handle = env.shape(&document);
        let (placed, placed_out) = env.render(handle, 1.0);
        let (immediate, immediate_out) = env.render_immediate(handle, 1.0);
        assert_eq!(placed, immediate, "same pixels for {:?}", document.value);

        let corner = |out: &DrawOutput| {
            out.transform * Point::new(f64::from(out.bounds.l), f64::from(out.bounds.t))
        };
        assert_eq!(
            corner(&placed_out),
            corner(&immediate_out),
            "same canvas position for {:?}",
            document.value
        );
    }
}

#[test]
fn placed_quads_match_bitmap_boxes() {
    let mut env = TestEnv::new(test_name!());
    let handle = env.shape(&env.document("AB"));
    let placed = env.placed(handle);
    for (_, glyph) in placed.glyphs_in_text_order() {
        let quad = glyph.quad();
        let b = glyph.bitmap_box();
        assert_eq!(quad.top_left, Point::new(b.x0, b.y0), "top left corner");
        assert_eq!(quad.bottom_right, Point::new(b.x1, b.y1), "bottom right corner");
        // Glyphs sit on the baseline.
        assert_eq!(b.y1, glyph.origin.y, "box bottom on the baseline");
    }
}
