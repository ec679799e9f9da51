// ABOUTME: HTTP middleware for the Nutrilog server
// ABOUTME: CORS configuration for browser clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

/// Cross-origin request configuration
pub mod cors;

pub use cors::setup_cors;
