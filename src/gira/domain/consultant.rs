//! Consultant details captured at the front desk.

use super::GiraDomainError;
use serde::Serialize;

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 200;
const MAX_PHONE_LENGTH: usize = 50;

/// The person waiting for a consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Consultant {
    name: String,
    phone: Option<String>,
}

impl Consultant {
    /// Creates validated consultant details.
    ///
    /// Both fields are trimmed; a blank phone is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`GiraDomainError`] when the name is shorter than two
    /// characters or either field exceeds its storage limit.
    pub fn new(name: impl Into<String>, phone: Option<String>) -> Result<Self, GiraDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        let length = trimmed.chars().count();
        if length < MIN_NAME_LENGTH {
            return Err(GiraDomainError::ConsultantNameTooShort(raw_name));
        }
        if length > MAX_NAME_LENGTH {
            return Err(GiraDomainError::ConsultantNameTooLong {
                maximum: MAX_NAME_LENGTH,
            });
        }

        let normalized_phone = phone
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        if normalized_phone
            .as_ref()
            .is_some_and(|value| value.chars().count() > MAX_PHONE_LENGTH)
        {
            return Err(GiraDomainError::ConsultantPhoneTooLong {
                maximum: MAX_PHONE_LENGTH,
            });
        }

        Ok(Self {
            name: trimmed.to_owned(),
            phone: normalized_phone,
        })
    }

    /// Returns the consultant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact phone, if given.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}
