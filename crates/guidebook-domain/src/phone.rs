//! Mobile phone numbers used as account identifiers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9][0-9]{9}$").expect("valid phone pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("phone number must be 11 digits starting with 13-19")]
pub struct InvalidPhone;

/// A validated mainland mobile number (`1[3-9]` followed by nine digits).
///
/// Construct through [`PhoneNumber::parse`]; the inner string is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate `raw` after trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, InvalidPhone> {
        let s = raw.trim();
        if !MOBILE.is_match(s) {
            return Err(InvalidPhone);
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = InvalidPhone;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}
