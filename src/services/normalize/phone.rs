use std::sync::LazyLock;

use regex::Regex;

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[69]\d{8}$").unwrap());

/// Spanish phone number: nine digits starting with 6 or 9.
pub fn is_valid_phone(text: &str) -> bool {
    PHONE.is_match(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_phones() {
        assert!(is_valid_phone("699123456"));
        assert!(is_valid_phone("912345678"));
        assert!(is_valid_phone(" 612345678 "));
    }

    #[test]
    fn test_invalid_phones() {
        assert!(!is_valid_phone("712345678"));
        assert!(!is_valid_phone("69912345"));
        assert!(!is_valid_phone("6991234567"));
        assert!(!is_valid_phone("699 123 456"));
        assert!(!is_valid_phone("+34699123456"));
        assert!(!is_valid_phone("69912345a"));
        assert!(!is_valid_phone(""));
    }
}
