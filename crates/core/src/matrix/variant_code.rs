//! Variant code extraction from free-text model descriptions.
//!
//! Downstream variant identity depends on the literal output of this function,
//! so the pattern and the placeholder format must stay stable.

use std::sync::OnceLock;

use regex::Regex;

static VARIANT_CODE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn variant_code_pattern() -> &'static Regex {
    VARIANT_CODE_PATTERN
        .get_or_init(|| Regex::new(r"[A-Z]+[0-9]+[A-Z]?").expect("variant code pattern compiles"))
}

/// Returns the first `LETTERS DIGITS [LETTER]` run in `description`, or
/// `VARIANT_{slot + 1}` when there is none. `slot` is the zero-based
/// availability column.
pub fn extract_variant_code(description: &str, slot: usize) -> String {
    variant_code_pattern()
        .find(description)
        .map(|found| found.as_str().to_string())
        .unwrap_or_else(|| placeholder_code(slot))
}

pub fn placeholder_code(slot: usize) -> String {
    format!("VARIANT_{}", slot + 1)
}

#[cfg(test)]
mod tests {
    use super::{extract_variant_code, placeholder_code};

    #[test]
    fn extraction_table() {
        let cases: &[(&str, usize, &str)] = &[
            ("EG16P Three-wheel", 0, "EG16P"),
            ("EG16P", 3, "EG16P"),
            ("Three-wheel EG16P", 0, "EG16P"),
            ("EFG 216k", 0, "VARIANT_1"),
            ("RX20-16 electric", 1, "RX20"),
            ("ETV214 reach truck", 0, "ETV214"),
            ("EG16PX twin", 0, "EG16P"),
            ("EG16 Four-wheel", 0, "EG16"),
            ("Model A1B2", 0, "A1B"),
            ("Typ 1200 AB12C", 0, "AB12C"),
            ("eg16p lowercase", 1, "VARIANT_2"),
            ("", 4, "VARIANT_5"),
            ("   ", 2, "VARIANT_3"),
            ("Three-wheel", 0, "VARIANT_1"),
            ("ÄG16P umlaut prefix", 0, "G16P"),
            ("16P digits first", 0, "VARIANT_1"),
        ];

        for (description, slot, expected) in cases {
            assert_eq!(
                extract_variant_code(description, *slot),
                *expected,
                "description `{description}` in slot {slot}"
            );
        }
    }

    #[test]
    fn placeholder_is_one_based() {
        assert_eq!(placeholder_code(0), "VARIANT_1");
        assert_eq!(placeholder_code(4), "VARIANT_5");
    }
}
