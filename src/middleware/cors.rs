// ABOUTME: CORS middleware configuration for the HTTP API
// ABOUTME: Lets the browser frontend call the API from another origin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Parse an origin list into a CORS origin policy
///
/// An empty list or `*` allows any origin. Entries that are not valid header
/// values are skipped; if none remain, any origin is allowed.
#[must_use]
pub fn allowed_origins(origins: &str) -> AllowOrigin {
    if origins.trim().is_empty() || origins.trim() == "*" {
        return AllowOrigin::any();
    }

    let parsed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if parsed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parsed)
    }
}

/// Configure CORS from `CORS_ALLOWED_ORIGINS`
///
/// ```bash
/// # Any origin (development)
/// export CORS_ALLOWED_ORIGINS="*"
///
/// # Specific origins
/// export CORS_ALLOWED_ORIGINS="http://localhost:5173,https://nutrilog.example.com"
/// ```
#[must_use]
pub fn setup_cors(config: &crate::config::ServerConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(&config.cors_allowed_origins))
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}
