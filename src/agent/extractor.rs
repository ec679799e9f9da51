// ABOUTME: Per-item nutrition extraction from search snippets via the language model
// ABOUTME: Tolerates numbers sent as strings and validates that values are non-negative
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use serde::de::{self, Deserializer};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::errors::ExtractionError;
use super::gateway::Gateway;
use super::sanitizer::sanitize;
use crate::external::{lookup_snippets, NutritionLookup};
use crate::llm::prompts::extraction_messages;
use crate::models::IngredientRecord;

/// Amount recorded when the model does not state one
pub const DEFAULT_AMOUNT: &str = "1 standard serving";

#[derive(Debug, Deserialize)]
struct ExtractedRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    amount: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    calories: f64,
    #[serde(deserialize_with = "lenient_number")]
    protein: f64,
    #[serde(deserialize_with = "lenient_number")]
    carbs: f64,
    #[serde(deserialize_with = "lenient_number")]
    fat: f64,
    #[serde(deserialize_with = "lenient_number")]
    sugar: f64,
}

/// Accept `12.6`, `"12.6"` and `"12.6 g"`
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => leading_number(&text)
            .ok_or_else(|| de::Error::custom(format!("expected a number, found {text:?}"))),
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit() || matches!(c, '.' | ',' | '_') || (i == 0 && c == '-'))
        })
        .map_or(trimmed.len(), |(i, _)| i);
    let (token, rest) = trimmed.split_at(end);

    // "1 200 kcal" must not decode as 1
    if rest.trim_start().starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let (integer, fraction) = token.split_once('.').unwrap_or((token, ""));
    let mut groups = integer.split([',', '_']);
    let head = groups.next()?;
    let grouped = integer.len() != head.len();
    if grouped
        && (head.trim_start_matches('-').is_empty()
            || groups.any(|g| g.len() != 3 || !g.bytes().all(|b| b.is_ascii_digit())))
    {
        return None;
    }
    if fraction.contains([',', '_']) {
        return None;
    }

    token.replace([',', '_'], "").parse().ok()
}

fn checked(field: &'static str, value: f64) -> Result<f64, ExtractionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ExtractionError::InvalidValue { field, value })
    }
}

/// Decode sanitized extraction output for `item`
///
/// `calories` is truncated to an integer; macro grams are kept unrounded.
///
/// # Errors
///
/// Returns [`ExtractionError::Parse`] for undecodable output and
/// [`ExtractionError::InvalidValue`] for negative or non-finite numbers.
pub fn decode_record(item: &str, sanitized: &str) -> Result<IngredientRecord, ExtractionError> {
    let raw: ExtractedRecord = serde_json::from_str(sanitized).map_err(ExtractionError::Parse)?;

    let calories = checked("calories", raw.calories)?;
    Ok(IngredientRecord {
        name: raw
            .name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| item.trim().to_owned()),
        amount: raw
            .amount
            .map(|a| a.trim().to_owned())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_AMOUNT.to_owned()),
        calories: calories.trunc().min(f64::from(u32::MAX)) as u32,
        protein: checked("protein", raw.protein)?,
        carbs: checked("carbs", raw.carbs)?,
        fat: checked("fat", raw.fat)?,
        sugar: checked("sugar", raw.sugar)?,
    })
}

/// Produce the nutrition record for one food item
///
/// Looks up snippets with the nutrition-biased query, then asks the model to
/// fill in the record for the amount the item describes.
///
/// # Errors
///
/// Any failure is an [`ExtractionError`]; callers skip the item.
#[instrument(skip(gateway, lookup), fields(lookup = lookup.name()))]
pub async fn extract(
    gateway: &Gateway<'_>,
    lookup: &dyn NutritionLookup,
    item: &str,
    limit: usize,
) -> Result<IngredientRecord, ExtractionError> {
    let snippets = lookup_snippets(lookup, item, limit)
        .await
        .map_err(ExtractionError::Lookup)?;
    if snippets.is_empty() {
        return Err(ExtractionError::NoSnippets);
    }
    debug!(snippets = snippets.len(), "Snippets found");

    let raw = gateway.send(extraction_messages(item, &snippets)).await?;
    decode_record(item, &sanitize(&raw))
}
