//! Collation keys for case and accent insensitive name matching.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Derive the key used to compare account names.
///
/// The name is decomposed (NFKD), combining marks are dropped, letters are
/// lower-cased and runs of whitespace collapse to a single space. `"Café"`
/// and `" cafe "` share the key `"cafe"`.
pub fn collation_key(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    for ch in name.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.extend(ch.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_accents_fold() {
        assert_eq!(collation_key("Café"), "cafe");
        assert_eq!(collation_key("CAFE"), "cafe");
        assert_eq!(collation_key("Crème Brûlée"), "creme brulee");
        assert_eq!(collation_key("Ｃａｆｅ"), "cafe");
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(collation_key("  Credit \t  Card "), "credit card");
        assert_eq!(collation_key("   "), "");
    }

    #[test]
    fn test_punctuation_is_kept() {
        assert_ne!(collation_key("Visa - Gold"), collation_key("Visa Gold"));
    }
}
