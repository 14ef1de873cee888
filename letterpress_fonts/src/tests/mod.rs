// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod utils;
