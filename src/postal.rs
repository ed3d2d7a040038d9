//! Postal code handling.
//!
//! US ZIP+4 codes ("62701-1234") are stored as a five-digit postal code plus
//! a four-digit suffix row. Every other code is stored whole.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ZIP4_COUNTRY_CODE;

static ZIP4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{5})-(\d{4})$").expect("ZIP+4 pattern is a valid regex")
});

/// A postal code split into the stored code and optional suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostalParts<'a> {
    pub code: &'a str,
    pub suffix: Option<&'a str>,
}

/// Splits `code` into ZIP and plus-four parts when `country_code` is US and the
/// code is in ZIP+4 form; otherwise returns the code unchanged.
pub fn split_zip4<'a>(country_code: &str, code: &'a str) -> PostalParts<'a> {
    if country_code.eq_ignore_ascii_case(ZIP4_COUNTRY_CODE) {
        if let Some(caps) = ZIP4.captures(code) {
            if let (Some(zip), Some(plus4)) = (caps.get(1), caps.get(2)) {
                return PostalParts {
                    code: zip.as_str(),
                    suffix: Some(plus4.as_str()),
                };
            }
        }
    }
    PostalParts { code, suffix: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_zip4_is_split() {
        let parts = split_zip4("US", "62701-1234");
        assert_eq!(parts.code, "62701");
        assert_eq!(parts.suffix, Some("1234"));
    }

    #[test]
    fn test_lowercase_country_code() {
        assert_eq!(split_zip4("us", "62701-1234").suffix, Some("1234"));
    }

    #[test]
    fn test_plain_zip_is_kept() {
        let parts = split_zip4("US", "62701");
        assert_eq!(parts, PostalParts { code: "62701", suffix: None });
    }

    #[test]
    fn test_other_countries_not_split() {
        let parts = split_zip4("GB", "12345-6789");
        assert_eq!(parts.code, "12345-6789");
        assert_eq!(parts.suffix, None);
    }

    #[test]
    fn test_malformed_zip4_kept_whole() {
        assert_eq!(split_zip4("US", "6270-12345").suffix, None);
        assert_eq!(split_zip4("US", "62701-1234 ").suffix, None);
        assert_eq!(split_zip4("US", "x62701-1234").suffix, None);
    }
}
