// ABOUTME: Core types and constants for the Nutrilog meal-logging assistant
// ABOUTME: Foundation crate with error handling, meal models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

#![deny(unsafe_code)]

//! # Nutrilog Core
//!
//! Foundation crate providing shared types and constants for Nutrilog. It is
//! kept free of network and database code so that it changes rarely.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Ingredient records and stored meal entries
//! - **constants**: Energy densities and service identifiers

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Meal and ingredient data models
pub mod models;

/// Application constants organised by domain
pub mod constants;
