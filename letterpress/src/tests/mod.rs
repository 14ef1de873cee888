// Copyright 2025 the Letterpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_context;
mod test_paragraphs;
mod test_properties;
mod test_scenarios;
mod utils;
