// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod face;

pub(crate) use face::StubFace;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
