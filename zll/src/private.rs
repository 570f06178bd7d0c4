// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

pub trait Sealed {}
