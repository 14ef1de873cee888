// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use letterpress_fonts::DEFAULT_EMOJI_FONT;

use crate::geometry::{IRect, Rect};
use crate::{test_name, DrawErrorKind, ShapeErrorKind};

use super::utils::{BoxFace, TestEnv, BOX_FONT};

#[test]
fn empty_document_is_not_shaped() {
    let mut env = TestEnv::new(test_name!());
    assert!(env.cx.shape_text(&env.document("")).is_none(), "empty text");
}

#[test]
fn destroyed_handles_stay_invalid() {
    let mut env = TestEnv::new(test_name!());
    let document = env.document("A");
    let first = env.shape(&document);
    let other = env.shape(&document);

    assert_eq!(env.cx.destroy_text_shapes(&[first]), 1, "one shape removed");
    assert_eq!(env.cx.destroy_text_shapes(&[first]), 0, "already removed");
    assert!(env.cx.text_bounds(first).is_none(), "stale handle");
    assert!(env.cx.text_bounds(other).is_some(), "other shapes survive");

    let reused = env.shape(&document);
    assert_ne!(reused, first, "slot reuse changes the generation");
    assert!(env.cx.text_bounds(first).is_none(), "stale handle after reuse");
    assert!(env.cx.text_bounds(reused).is_some(), "new handle resolves");

    let err = env.cx.reshape_text(first, &document).unwrap_err();
    assert_eq!(err.kind(), ShapeErrorKind::InvalidHandle, "reshape of a stale handle");
    let err = env.cx.draw_text(first, &mut [], 0, 0, 1.0, None).unwrap_err();
    assert_eq!(err.kind(), DrawErrorKind::InvalidHandle, "draw of a stale handle");
    assert!(env.cx.shaped_text(first).is_none(), "no placed data");
}

#[test]
fn reloading_a_face_reshapes_its_texts() {
    let mut env = TestEnv::new(test_name!());
    let handle = env.shape(&env.document("A"));
    assert_eq!(env.cx.text_bounds(handle).map(|b| b.width()), Some(5.0), "half an em wide");

    env.cx.add_face(BOX_FONT, BoxFace::new(BOX_FONT).with_advance(0.8).boxed());
    assert_eq!(env.cx.text_bounds(handle).map(|b| b.width()), Some(8.0), "reshaped wider");
}

#[test]
fn unrelated_faces_leave_texts_alone() {
    let mut env = TestEnv::new(test_name!());
    let handle = env.shape(&env.document("A"));
    let before = env.placed(handle);
    env.cx.add_face("Other", BoxFace::new("Other").with_advance(0.8).boxed());
    env.cx.add_face("Other", BoxFace::new("Other").boxed());
    assert_eq!(env.placed(handle), before, "text does not use the face");
}

#[test]
fn reshape_replaces_the_text() {
    let mut env = TestEnv::new(test_name!());
    let handle = env.shape(&env.document("A"));
    env.cx.reshape_text(handle, &env.document("AAA")).unwrap();
    assert_eq!(env.placed(handle).glyph_count(), 3, "new text");
    assert_eq!(
        env.cx.text_bounds(handle),
        Some(Rect::new(0.0, 0.0, 15.0, 12.0)),
        "new bounds"
    );
}

#[test]
fn intersect_uses_canvas_coordinates() {
    let mut env = TestEnv::new(test_name!());
    let handle = env.shape(&env.document("A"));
    // The frame covers x in [0, 5) and y in [-8, 4) on the canvas.
    assert!(env.cx.intersect(handle, 2.0, 0.0, 0.0), "inside");
    assert!(env.cx.intersect(handle, 2.0, -8.0, 0.0), "top edge");
    assert!(!env.cx.intersect(handle, 2.0, 10.0, 0.0), "below");
    assert!(env.cx.intersect(handle, 2.0, 10.0, 7.0), "within the radius");
    assert!(!env.cx.intersect(handle, 6.0, 0.0, 0.0), "right of the frame");
}

#[test]
fn emoji_needs_the_fallback_face() {
    let env = TestEnv::new(test_name!());
    let document = env.document("a\u{1F600}");
    assert_eq!(
        env.cx.list_missing_fonts(&document),
        [DEFAULT_EMOJI_FONT],
        "emoji fallback requested"
    );
    assert!(
        env.cx.list_missing_fonts(&env.document("ab")).is_empty(),
        "plain text needs nothing"
    );
}

#[test]
fn invalid_scale_is_rejected() {
    let mut env = TestEnv::new(test_name!());
    let handle = env.shape(&env.document("A"));
    for scale in [0.0, -1.0, f32::NAN] {
        let err = env.cx.draw_text(handle, &mut [], 0, 0, scale, None).unwrap_err();
        assert_eq!(err.kind(), DrawErrorKind::InvalidScale, "scale {scale}");
    }
}

#[test]
fn view_area_limits_the_buffer() {
    let mut env = TestEnv::new(test_name!());
    let handle = env.shape(&env.document("AAAA"));
    let full = env.cx.draw_buffer_dimensions(handle, 1.0, None);
    assert_eq!(full, Some((20, 12)), "whole text");
    let view = IRect::new(5, 0, 10, 6);
    let cut = env.cx.draw_buffer_dimensions(handle, 1.0, Some(view));
    assert_eq!(cut, Some((10, 6)), "view area");

    env.cx.config_mut().enable_view_area_cutout = false;
    let uncut = env.cx.draw_buffer_dimensions(handle, 1.0, Some(view));
    assert_eq!(uncut, Some((20, 12)), "cutout disabled");
}
