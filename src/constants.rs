// ABOUTME: Application constants re-exported from nutrilog-core
// ABOUTME: Energy densities and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

pub use nutrilog_core::constants::*;
