use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DIGITS: Regex = Regex::new(r"\d+").unwrap();
    // Information separators count as whitespace as well
    static ref WHITESPACE: Regex = Regex::new(r"[\s\x1c-\x1f]+").unwrap();
}

/// Canonical form of a description, matching the cleaning the artifacts were
/// trained on.
///
/// Applied in this order:
/// 1. lowercase
/// 2. strip decimal digits
/// 3. strip ASCII punctuation
/// 4. collapse whitespace runs to a single space
/// 5. trim
///
/// ```rust
/// use case_classifier::normalize;
///
/// assert_eq!(normalize("Invoice #123, URGENT!!"), "invoice urgent");
/// ```
pub fn normalize(text: impl AsRef<str>) -> String {
    let text = text.as_ref().to_lowercase();
    let text = DIGITS.replace_all(&text, "");
    let text: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    WHITESPACE.replace_all(&text, " ").trim_matches(' ').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_example() {
        assert_eq!(normalize("Invoice #123, URGENT!!"), "invoice urgent");
    }

    #[test]
    fn test_whitespace_is_collapsed_and_trimmed() {
        assert_eq!(normalize("  Wire\t\ttransfer \n to   vendor  "), "wire transfer to vendor");
    }

    #[test]
    fn test_punctuation_between_words_joins_them() {
        assert_eq!(normalize("e-mail re:contract"), "email recontract");
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
        assert_eq!(normalize("1234 !!!"), "");
    }

    #[test]
    fn test_information_separators_are_whitespace() {
        assert_eq!(normalize("a\x1f\x1fb"), "a b");
        assert_eq!(normalize("\x1c lease \x1d\x1e dispute\x1f"), "lease dispute");
    }

    #[test]
    fn test_unicode_is_kept() {
        assert_eq!(normalize("Écrit à Zürich"), "écrit à zürich");
    }

    #[test]
    fn test_non_ascii_digits_are_removed() {
        assert_eq!(normalize("case ٣٤ filed"), "case filed");
    }
}
