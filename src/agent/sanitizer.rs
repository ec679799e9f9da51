// ABOUTME: Best-effort extraction of a JSON object from noisy model output
// ABOUTME: Strips code fences and slices from the first opening to the last closing brace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

/// Strip code fences and return the span from the first `{` to the last `}`
///
/// No brace balancing is attempted. When either delimiter is missing the
/// fence-stripped, trimmed text is returned and decoding fails downstream.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start <= end => cleaned[start..=end].to_owned(),
        _ => cleaned.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_json_fence() {
        assert_eq!(sanitize("```json\n{\"a\":1}\n```"), r#"{"a":1}"#);
    }

    #[test]
    fn test_strips_bare_fence() {
        assert_eq!(sanitize("```\n{\"a\":1}\n```"), r#"{"a":1}"#);
    }

    #[test]
    fn test_drops_surrounding_prose() {
        assert_eq!(sanitize(r#"noise{"a":1}trailing"#), r#"{"a":1}"#);
        assert_eq!(
            sanitize("Sure! Here you go:\n{\"action\": \"CHITCHAT\"}\nHope that helps."),
            r#"{"action": "CHITCHAT"}"#
        );
    }

    #[test]
    fn test_without_braces_returns_input() {
        assert_eq!(sanitize("no braces here"), "no braces here");
        assert_eq!(sanitize("only { opening"), "only { opening");
        assert_eq!(sanitize("} reversed {"), "} reversed {");
    }

    #[test]
    fn test_nested_object_kept_whole() {
        assert_eq!(
            sanitize(r#"x {"a":{"b":2}} y"#),
            r#"{"a":{"b":2}}"#
        );
    }

    #[test]
    fn test_stray_closing_brace_after_object_is_included() {
        // Known limitation: the slice runs to the last '}' anywhere in the text,
        // so a brace in trailing prose makes the result undecodable.
        let sanitized = sanitize(r#"{"reply":"ok"} and a stray } here"#);
        assert_eq!(sanitized, r#"{"reply":"ok"} and a stray }"#);
        assert!(serde_json::from_str::<serde_json::Value>(&sanitized).is_err());
    }

    #[test]
    fn test_braces_inside_string_values_survive_when_last() {
        assert_eq!(
            sanitize(r#"{"reply":"use {braces}"}"#),
            r#"{"reply":"use {braces}"}"#
        );
    }
}
