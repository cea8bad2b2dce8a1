//! Property-based tests for CSV cell escaping.

use proptest::prelude::*;

use crate::leads::csv::escape_field;

/// Reverses RFC 4180 quoting of a single cell.
fn unquote(cell: &str) -> String {
    match cell.strip_prefix('"').and_then(|c| c.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => cell.to_string(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// An escaped cell never starts with a formula trigger once unquoted.
    #[test]
    fn prop_no_formula_after_escape(raw in "[=+@a-z0-9 ,\"-]{0,24}") {
        let cell = unquote(&escape_field(&raw));
        prop_assert!(!cell.starts_with(['=', '+', '-', '@']));
    }

    /// Unquoting recovers the input, modulo the formula guard.
    #[test]
    fn prop_unquote_recovers_input(raw in "[=+@a-z0-9 ,\"\n-]{0,24}") {
        let cell = unquote(&escape_field(&raw));
        let expected = cell.strip_prefix('\'').filter(|_| raw.starts_with(['=', '+', '-', '@']));
        prop_assert_eq!(expected.unwrap_or(cell.as_str()), raw.as_str());
    }

    /// Separators and quotes only ever appear inside a quoted cell.
    #[test]
    fn prop_special_characters_force_quoting(raw in "[a-z,\"\n]{1,24}") {
        let escaped = escape_field(&raw);
        if raw.contains([',', '"', '\n']) {
            prop_assert!(escaped.starts_with('"') && escaped.ends_with('"'));
        } else {
            prop_assert_eq!(escaped.as_ref(), raw.as_str());
        }
    }
}
