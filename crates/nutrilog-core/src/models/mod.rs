// ABOUTME: Data models shared between the pipeline, persistence, and HTTP layers
// ABOUTME: Re-exports ingredient and meal entry types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

mod meal;

pub use meal::{IngredientRecord, Macronutrients, MealEntry, NewMealEntry};
