// SPDX-License-Identifier: Apache-2.0

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ZIPCODE_LEN: usize = 5;

/// A five-digit zipcode. Every post references one that exists in the
/// zipcodes reference table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZipCode(String);

impl ZipCode {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("zipcode"));
        }
        if input.len() != ZIPCODE_LEN || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidFormat("zipcode must be five digits"));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ZipCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod zipcode_tests {
    use super::*;

    #[test]
    fn accepts_five_digit_codes() {
        assert_eq!(ZipCode::parse("94110").expect("valid").as_str(), "94110");
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(ZipCode::parse("").is_err());
        assert!(ZipCode::parse("9411").is_err());
        assert!(ZipCode::parse("941100").is_err());
        assert!(ZipCode::parse("94a10").is_err());
    }
}
