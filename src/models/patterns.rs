//! Character-class patterns shared by the entity forms

use once_cell::sync::Lazy;
use regex::Regex;

/// Letters (any script) and whitespace: author surnames, genre names
pub static LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z\p{L}\s]+$").expect("valid regex"));

/// Letters, digits and whitespace: comment nicks and content
pub static LETTERS_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z\p{L}\s\d]+$").expect("valid regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_accept_unicode_and_spaces() {
        assert!(LETTERS.is_match("Science Fiction"));
        assert!(LETTERS.is_match("Żeromski"));
        assert!(LETTERS.is_match("García Márquez"));
    }

    #[test]
    fn letters_reject_digits_and_punctuation() {
        assert!(!LETTERS.is_match("Sci-Fi"));
        assert!(!LETTERS.is_match("Genre 2"));
        assert!(!LETTERS.is_match(""));
    }

    #[test]
    fn letters_digits_accept_digits() {
        assert!(LETTERS_DIGITS.is_match("Great book 10 out of 10"));
        assert!(!LETTERS_DIGITS.is_match("Great book!"));
        assert!(!LETTERS_DIGITS.is_match("<script>"));
    }
}
