// ABOUTME: Meal-logging models for ingredients and persisted meal entries
// ABOUTME: IngredientRecord, Macronutrients, MealEntry, and NewMealEntry definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use serde::{Deserialize, Serialize};

/// Nutrition facts for one food item of a meal
///
/// Produced once per searched item and never modified afterwards. Macro grams
/// keep the precision the model reported; rounding happens only when a meal
/// draft is aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRecord {
    /// Food name as described by the user
    pub name: String,
    /// Detected quantity or assumed serving size
    pub amount: String,
    /// Energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
    /// Sugar in grams
    pub sugar: f64,
}

/// Macronutrient grams used by the calorie engine
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Macronutrients {
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
}

/// A confirmed meal entry as stored in the `entries` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    /// Row id
    pub id: i64,
    /// Meal name
    pub name: String,
    /// Energy in kcal
    pub calories: i64,
    /// Free-form details (may be empty)
    pub details: String,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
    /// Sugar in grams
    pub sugar: f64,
}

/// Input for storing a meal entry
///
/// `calories` may be omitted, in which case it is derived from the macros.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMealEntry {
    /// Meal name
    pub name: String,
    /// Energy in kcal
    #[serde(default)]
    pub calories: Option<u32>,
    /// Free-form details
    #[serde(default)]
    pub details: Option<String>,
    /// Protein in grams
    #[serde(default)]
    pub protein: Option<f64>,
    /// Carbohydrates in grams
    #[serde(default)]
    pub carbs: Option<f64>,
    /// Fat in grams
    #[serde(default)]
    pub fat: Option<f64>,
    /// Sugar in grams
    #[serde(default)]
    pub sugar: Option<f64>,
}

impl NewMealEntry {
    /// Macronutrients of this entry with absent values treated as zero
    #[must_use]
    pub fn macronutrients(&self) -> Macronutrients {
        Macronutrients {
            protein: self.protein.unwrap_or(0.0),
            carbs: self.carbs.unwrap_or(0.0),
            fat: self.fat.unwrap_or(0.0),
        }
    }

    /// True when at least one macronutrient was supplied
    #[must_use]
    pub const fn has_macros(&self) -> bool {
        self.protein.is_some() || self.carbs.is_some() || self.fat.is_some()
    }
}
