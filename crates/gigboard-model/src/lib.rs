// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod availability;
mod ids;
mod region;
mod zipcode;

pub use availability::{DaysWeek, Weekday, DAYS_PER_WEEK};
pub use ids::{PostId, TagId, UserId};
pub use region::Region;
pub use zipcode::ZipCode;

use std::fmt;
use std::fmt::{Display, Formatter};

pub const USER_NAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 50;
pub const POST_TITLE_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 1250;
pub const BIO_MAX_LEN: usize = 500;
pub const TAG_NAME_MAX_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::InvalidFormat(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}

/// Validates a short free-text field against its declared maximum.
pub fn check_text(name: &'static str, value: &str, max: usize) -> Result<(), ParseError> {
    if value.trim().is_empty() {
        return Err(ParseError::Empty(name));
    }
    if value.len() > max {
        return Err(ParseError::TooLong(name, max));
    }
    Ok(())
}

/// Normalizes a user-supplied website link to an https URL, the way the
/// marketplace has always displayed them: `https://` passes through, a
/// leading `www` gains the scheme, anything else gains both.
#[must_use]
pub fn normalize_website_link(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("https://") {
        trimmed.to_string()
    } else if lower.starts_with("www") {
        format!("https://{trimmed}")
    } else {
        format!("https://www.{trimmed}")
    }
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn check_text_rejects_empty_and_oversize() {
        assert!(check_text("bio", "  ", BIO_MAX_LEN).is_err());
        assert!(check_text("bio", &"x".repeat(BIO_MAX_LEN + 1), BIO_MAX_LEN).is_err());
        assert!(check_text("bio", "painter and muralist", BIO_MAX_LEN).is_ok());
    }

    #[test]
    fn website_links_are_normalized_to_https() {
        assert_eq!(
            normalize_website_link("https://example.com"),
            "https://example.com"
        );
        assert_eq!(
            normalize_website_link("www.example.com"),
            "https://www.example.com"
        );
        assert_eq!(
            normalize_website_link("example.com"),
            "https://www.example.com"
        );
    }
}
