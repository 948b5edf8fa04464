// SPDX-License-Identifier: Apache-2.0

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DAYS_PER_WEEK: usize = 7;

/// Day-of-week index into a user's availability string, Monday-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Self; DAYS_PER_WEEK] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Monday),
            1 => Some(Self::Tuesday),
            2 => Some(Self::Wednesday),
            3 => Some(Self::Thursday),
            4 => Some(Self::Friday),
            5 => Some(Self::Saturday),
            6 => Some(Self::Sunday),
            _ => None,
        }
    }
}

/// Weekly availability: seven 't'/'f' flags, Monday-first.
///
/// Stored verbatim in the users table so the search layer can test a single
/// flag with `substr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaysWeek(String);

impl DaysWeek {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.len() != DAYS_PER_WEEK || !input.bytes().all(|b| b == b't' || b == b'f') {
            return Err(ParseError::InvalidFormat(
                "availability must be seven 't'/'f' flags",
            ));
        }
        Ok(Self(input.to_string()))
    }

    /// All-unavailable default for new accounts.
    #[must_use]
    pub fn none() -> Self {
        Self("f".repeat(DAYS_PER_WEEK))
    }

    #[must_use]
    pub fn is_available(&self, day: Weekday) -> bool {
        self.0.as_bytes()[day.index()] == b't'
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DaysWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod availability_tests {
    use super::*;

    #[test]
    fn parse_accepts_flag_strings() {
        let days = DaysWeek::parse("tfttfft").expect("valid");
        assert!(days.is_available(Weekday::Monday));
        assert!(!days.is_available(Weekday::Tuesday));
        assert!(days.is_available(Weekday::Sunday));
    }

    #[test]
    fn parse_rejects_wrong_length_or_alphabet() {
        assert!(DaysWeek::parse("tfttff").is_err());
        assert!(DaysWeek::parse("tfttffxx").is_err());
        assert!(DaysWeek::parse("tftTfft").is_err());
    }

    #[test]
    fn default_is_fully_unavailable() {
        let days = DaysWeek::none();
        for day in Weekday::ALL {
            assert!(!days.is_available(day));
        }
    }

    #[test]
    fn weekday_index_round_trips() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_index(day.index()), Some(day));
        }
        assert_eq!(Weekday::from_index(7), None);
    }
}
