// ABOUTME: Data models re-exported from nutrilog-core
// ABOUTME: Ingredient records and stored meal entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

pub use nutrilog_core::models::*;
