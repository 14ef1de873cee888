// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod env;
mod face;

pub(crate) use env::{Image, TestEnv, BOX_FONT, FONT_SIZE};
pub(crate) use face::BoxFace;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
