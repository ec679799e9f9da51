// ABOUTME: Aggregation of ingredient records into a single meal draft
// ABOUTME: Totals are derived from the ingredients and rounded to one decimal place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use serde::Serialize;

use super::errors::NoDataError;
use crate::models::IngredientRecord;

/// An unsaved meal awaiting the user's confirmation
///
/// Only [`synthesize`] builds drafts, so the totals always equal the sums
/// over `ingredients`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealDraft {
    name: String,
    ingredients: Vec<IngredientRecord>,
    total_calories: u64,
    total_protein: f64,
    total_carbs: f64,
    total_fat: f64,
    total_sugar: f64,
}

impl MealDraft {
    /// Ingredient names joined with `", "`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ingredients in the order they were requested
    #[must_use]
    pub fn ingredients(&self) -> &[IngredientRecord] {
        &self.ingredients
    }

    /// Exact sum of ingredient calories
    #[must_use]
    pub const fn total_calories(&self) -> u64 {
        self.total_calories
    }

    /// Protein grams, one decimal
    #[must_use]
    pub const fn total_protein(&self) -> f64 {
        self.total_protein
    }

    /// Carbohydrate grams, one decimal
    #[must_use]
    pub const fn total_carbs(&self) -> f64 {
        self.total_carbs
    }

    /// Fat grams, one decimal
    #[must_use]
    pub const fn total_fat(&self) -> f64 {
        self.total_fat
    }

    /// Sugar grams, one decimal
    #[must_use]
    pub const fn total_sugar(&self) -> f64 {
        self.total_sugar
    }
}

/// Round to one decimal place, halves away from zero
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn rounded_sum(records: &[IngredientRecord], field: impl Fn(&IngredientRecord) -> f64) -> f64 {
    round_one_decimal(records.iter().map(field).sum())
}

/// Aggregate records into a draft
///
/// # Errors
///
/// Returns [`NoDataError`] for an empty slice; a zero-filled draft is never produced.
pub fn synthesize(records: Vec<IngredientRecord>) -> Result<MealDraft, NoDataError> {
    if records.is_empty() {
        return Err(NoDataError);
    }

    let name = records
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Ok(MealDraft {
        name,
        total_calories: records.iter().map(|r| u64::from(r.calories)).sum(),
        total_protein: rounded_sum(&records, |r| r.protein),
        total_carbs: rounded_sum(&records, |r| r.carbs),
        total_fat: rounded_sum(&records, |r| r.fat),
        total_sugar: rounded_sum(&records, |r| r.sugar),
        ingredients: records,
    })
}
