// ABOUTME: Deterministic nutrition calculations shared by persistence and routes
// ABOUTME: Hosts the calorie engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

/// Calorie estimation from macronutrients
pub mod calorie_engine;

pub use calorie_engine::calories_from_macros;
