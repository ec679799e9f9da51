// ABOUTME: Shared test helpers for integration tests
// ABOUTME: Exports the axum request helper and scripted provider and lookup doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod axum_test;
pub mod scripted;
