// Copyright 2025 the Paragon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_editing;
mod test_properties;
mod utils;
