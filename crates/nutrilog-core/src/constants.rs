// ABOUTME: Application-wide constants for Nutrilog
// ABOUTME: Energy densities of macronutrients and service identifiers

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

/// Service identifiers used in structured logs
pub mod service_names {
    /// Server binary / service name
    pub const NUTRILOG_SERVER: &str = "nutrilog-server";
}

/// Atwater energy factors (kcal per gram)
pub mod energy {
    /// Protein
    pub const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
    /// Carbohydrate
    pub const CARBS_KCAL_PER_GRAM: f64 = 4.0;
    /// Fat
    pub const FAT_KCAL_PER_GRAM: f64 = 9.0;
}
