use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// A person attending under a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<u8>,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("participant.name"));
        }
        Ok(Self {
            name,
            email: None,
            phone: None,
            age: None,
        })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_age(mut self, age: u8) -> Self {
        self.age = Some(age);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        assert!(Participant::new("   ").is_err());
    }

    #[test]
    fn builder_sets_optional_contact_fields() {
        let p = Participant::new(" Asha ").unwrap().with_email("asha@example.com").with_age(31);
        assert_eq!(p.name, "Asha");
        assert_eq!(p.email.as_deref(), Some("asha@example.com"));
        assert_eq!(p.age, Some(31));
        assert!(p.phone.is_none());
    }
}
