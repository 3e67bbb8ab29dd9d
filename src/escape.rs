//! JSON string escaping for hand-built payloads
//!
//! Tool payloads are assembled by direct string concatenation rather than
//! through a serializer, so every raw field must be made safe to embed
//! inside a double-quoted JSON string literal first.

/// Escape a raw string for embedding in a JSON string literal
///
/// Substitutions are applied in a fixed order so that escaping is never
/// double-applied within a single pass: backslash first, then double-quote,
/// newline, carriage return, and horizontal tab. No other characters are
/// altered.
///
/// Not idempotent: re-escaping doubles backslashes. Callers invoke this
/// exactly once per raw field.
pub fn escape_json(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Escape an optional raw string
///
/// Absent input yields an empty string, never the literal text `null`.
pub fn escape_json_opt(value: Option<&str>) -> String {
    value.map(escape_json).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{escape_json, escape_json_opt};

    /// Embed escaped output in a JSON string literal and decode it back.
    fn round_trip(raw: &str) -> String {
        let literal = format!("\"{}\"", escape_json(raw));
        serde_json::from_str::<String>(&literal).expect("escaped output must be valid JSON")
    }

    #[test]
    fn passes_plain_text_through_unchanged() {
        assert_eq!(escape_json("weekly status report"), "weekly status report");
    }

    #[test]
    fn escapes_backslash_before_other_substitutions() {
        assert_eq!(escape_json("C:\\mail\\inbox"), "C:\\\\mail\\\\inbox");
        assert_eq!(escape_json("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_json("line1\nline2\r\tdone"), "line1\\nline2\\r\\tdone");
    }

    #[test]
    fn round_trips_strings_with_special_characters() {
        for raw in [
            "quote \" backslash \\ mix",
            "tabs\tand\nnewlines\r",
            "\\n is not a newline",
            "",
        ] {
            assert_eq!(round_trip(raw), raw);
        }
    }

    #[test]
    fn absent_input_yields_empty_string() {
        assert_eq!(escape_json_opt(None), "");
        assert_eq!(escape_json_opt(Some("x")), "x");
    }

    #[test]
    fn double_application_doubles_backslashes() {
        let once = escape_json("a\\b");
        let twice = escape_json(&once);
        assert_eq!(once, "a\\\\b");
        assert_eq!(twice, "a\\\\\\\\b");
    }
}
