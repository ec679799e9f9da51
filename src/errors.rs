// ABOUTME: Unified error types re-exported from nutrilog-core
// ABOUTME: Single import point for AppError, ErrorCode, and AppResult within the crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

pub use nutrilog_core::errors::*;
