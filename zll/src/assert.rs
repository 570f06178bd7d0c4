// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Checks a precondition of a linkage operation.
///
/// Active in debug builds and whenever the `checked` feature is enabled.
/// Otherwise the condition is not even evaluated.
macro_rules! zll_assert {
    ($($arg:tt)*) => {
        if cfg!(any(debug_assertions, feature = "checked")) {
            assert!($($arg)*);
        }
    };
}
