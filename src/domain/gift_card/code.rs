//! Gift card code, `FB-XXXX-XXXX-XXXX`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{is_code_segment, random_code, ValidationError};

const PREFIX: &str = "FB";
const GROUPS: usize = 3;
const GROUP_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GiftCardCode(String);

impl GiftCardCode {
    pub fn generate() -> Self {
        let groups: Vec<String> = (0..GROUPS).map(|_| random_code(GROUP_LEN)).collect();
        Self(format!("{}-{}", PREFIX, groups.join("-")))
    }

    /// Parses a code typed by a customer. Case-insensitive.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let normalized = s.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("gift_card_code"));
        }
        let parts: Vec<&str> = normalized.split('-').collect();
        let well_formed = parts.len() == GROUPS + 1
            && parts[0] == PREFIX
            && parts[1..].iter().all(|g| is_code_segment(g, GROUP_LEN));
        if !well_formed {
            return Err(ValidationError::invalid_format(
                "gift_card_code",
                "expected FB-XXXX-XXXX-XXXX",
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GiftCardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for GiftCardCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GiftCardCode> for String {
    fn from(c: GiftCardCode) -> Self {
        c.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_parses() {
        let code = GiftCardCode::generate();
        assert_eq!(code.as_str().len(), 17);
        assert_eq!(GiftCardCode::parse(code.as_str()).unwrap(), code);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(GiftCardCode::parse("fb-ab12-cd34-ef56").unwrap().as_str(), "FB-AB12-CD34-EF56");
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        for bad in ["", "FB-AB12-CD34", "GC-AB12-CD34-EF56", "FB-AB1-CD34-EF56", "FB-AB12-CD34-EF5!"] {
            assert!(GiftCardCode::parse(bad).is_err(), "{}", bad);
        }
    }
}
