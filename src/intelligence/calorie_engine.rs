// ABOUTME: Deterministic calorie calculation from macronutrient grams
// ABOUTME: Applies the Atwater general factors used when an entry arrives without calories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

//! Calorie Engine
//!
//! Energy is estimated with the Atwater general factors: 4 kcal per gram of
//! protein or carbohydrate and 9 kcal per gram of fat.
//!
//! # Scientific References
//!
//! - Merrill, A.L., & Watt, B.K. (1973). Energy value of foods: basis and
//!   derivation. *USDA Agriculture Handbook* No. 74.

use crate::constants::energy::{
    CARBS_KCAL_PER_GRAM, FAT_KCAL_PER_GRAM, PROTEIN_KCAL_PER_GRAM,
};
use crate::models::Macronutrients;

/// Whole kilocalories for the given macros, truncated
///
/// Negative or non-finite gram values count as zero.
#[must_use]
pub fn calories_from_macros(macros: Macronutrients) -> u32 {
    let grams = |value: f64| if value.is_finite() { value.max(0.0) } else { 0.0 };
    let kcal = grams(macros.protein).mul_add(
        PROTEIN_KCAL_PER_GRAM,
        grams(macros.carbs).mul_add(CARBS_KCAL_PER_GRAM, grams(macros.fat) * FAT_KCAL_PER_GRAM),
    );
    kcal.trunc().min(f64::from(u32::MAX)) as u32
}
