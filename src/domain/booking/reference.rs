//! Human-readable booking reference, `BK-YYYYMMDD-XXXXXX`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{is_code_segment, random_code, ValidationError};

const PREFIX: &str = "BK";
const SUFFIX_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingReference(String);

impl BookingReference {
    /// Generates a fresh reference stamped with the given creation date.
    pub fn generate(on: NaiveDate) -> Self {
        Self(format!(
            "{}-{}-{}",
            PREFIX,
            on.format("%Y%m%d"),
            random_code(SUFFIX_LEN)
        ))
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::empty_field("reference"));
        }
        let mut parts = s.split('-');
        let (Some(prefix), Some(date), Some(suffix), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ValidationError::invalid_format(
                "reference",
                "expected BK-YYYYMMDD-XXXXXX",
            ));
        };
        if prefix != PREFIX
            || NaiveDate::parse_from_str(date, "%Y%m%d").is_err()
            || !is_code_segment(suffix, SUFFIX_LEN)
        {
            return Err(ValidationError::invalid_format(
                "reference",
                "expected BK-YYYYMMDD-XXXXXX",
            ));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BookingReference {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BookingReference> for String {
    fn from(r: BookingReference) -> Self {
        r.0
    }
}
