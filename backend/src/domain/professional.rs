//! Professional profile aggregate.
//!
//! A profile extends exactly one [`Account`] of kind professional. Rating,
//! review count, and the verified flag are administrative: no self-service
//! operation changes them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::text_field::{
    MAX_LICENSE_LEN, MAX_TEXT_LEN, TextFieldError, ensure_filled, ensure_fits,
};
use super::{Account, AccountId, AccountKind, EmailAddress, Error};

/// Languages stored for a profile when none are supplied.
pub const DEFAULT_LANGUAGES: &str = "Português";

/// Largest accepted years of experience.
pub const MAX_EXPERIENCE_YEARS: u32 = 100;

/// Validation errors raised for professional profile values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfessionalValidationError {
    /// Identifier is not a UUID.
    #[error("professional id must be a valid UUID")]
    InvalidId,
    /// Prices must be finite and strictly positive.
    #[error("consultation price must be greater than zero")]
    NonPositivePrice,
    /// Years of experience beyond [`MAX_EXPERIENCE_YEARS`].
    #[error("experience years must be at most 100")]
    ExperienceOutOfRange,
    /// A text field is blank or wider than its column.
    #[error(transparent)]
    Text(#[from] TextFieldError),
}

impl ProfessionalValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::NonPositivePrice => "consultationPrice",
            Self::ExperienceOutOfRange => "experienceYears",
            Self::Text(err) => err.field(),
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_uuid",
            Self::NonPositivePrice | Self::ExperienceOutOfRange => "out_of_range",
            Self::Text(err) => err.code(),
        }
    }
}

/// Stable professional profile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfessionalId(Uuid);

impl ProfessionalId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProfessionalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProfessionalId {
    type Err = ProfessionalValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ProfessionalValidationError::InvalidId)
    }
}

pub(crate) fn ensure_positive_price(price: f64) -> Result<(), ProfessionalValidationError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(ProfessionalValidationError::NonPositivePrice)
    }
}

pub(crate) const fn ensure_experience(years: u32) -> Result<(), ProfessionalValidationError> {
    if years > MAX_EXPERIENCE_YEARS {
        Err(ProfessionalValidationError::ExperienceOutOfRange)
    } else {
        Ok(())
    }
}

impl From<ProfessionalValidationError> for Error {
    fn from(err: ProfessionalValidationError) -> Self {
        Self::invalid_request(err.to_string()).with_details(json!({
            "field": err.field(),
            "code": err.code(),
        }))
    }
}

fn ensure_approach(approach: Option<&str>) -> Result<(), TextFieldError> {
    approach.map_or(Ok(()), |text| ensure_fits(text, "approach", MAX_TEXT_LEN))
}

/// Professional extension of an account.
///
/// ## Invariants
/// - `consultation_price > 0`.
/// - `license_number`, `specialty`, and `languages` are non-blank and fit
///   their columns.
/// - `account_id` refers to an account of kind professional and is unique.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfessionalProfile {
    pub id: ProfessionalId,
    pub account_id: AccountId,
    pub license_number: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub experience_years: u32,
    pub consultation_price: f64,
    pub approach: Option<String>,
    pub languages: String,
    pub is_verified: bool,
    pub rating: f64,
    pub review_count: u32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfessionalProfile {
    /// Check the invariants that do not depend on other records.
    ///
    /// # Errors
    ///
    /// Returns [`ProfessionalValidationError`] for blank or oversized text,
    /// an out-of-range experience, or a non-positive price.
    pub fn validate(&self) -> Result<(), ProfessionalValidationError> {
        ensure_filled(&self.license_number, "licenseNumber", MAX_LICENSE_LEN)?;
        ensure_filled(&self.specialty, "specialty", MAX_TEXT_LEN)?;
        ensure_filled(&self.languages, "languages", MAX_TEXT_LEN)?;
        ensure_approach(self.approach.as_deref())?;
        ensure_experience(self.experience_years)?;
        ensure_positive_price(self.consultation_price)
    }

    /// Whether the profile passes the public directory baseline.
    #[must_use]
    pub fn is_listed(&self) -> bool {
        self.is_available && self.is_verified
    }

    /// Apply the fields present in `update` and stamp `updated_at`.
    pub fn apply_update(&mut self, update: &ProfessionalUpdate, now: DateTime<Utc>) {
        if let Some(specialty) = &update.specialty {
            self.specialty.clone_from(specialty);
        }
        if let Some(bio) = &update.bio {
            self.bio.clone_from(bio);
        }
        if let Some(years) = update.experience_years {
            self.experience_years = years;
        }
        if let Some(price) = update.consultation_price {
            self.consultation_price = price;
        }
        if let Some(approach) = &update.approach {
            self.approach.clone_from(approach);
        }
        if let Some(languages) = &update.languages {
            self.languages.clone_from(languages);
        }
        if let Some(available) = update.is_available {
            self.is_available = available;
        }
        self.updated_at = now;
    }
}

/// Partial update of the self-editable professional fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfessionalUpdate {
    pub specialty: Option<String>,
    pub bio: Option<Option<String>>,
    pub experience_years: Option<u32>,
    pub consultation_price: Option<f64>,
    pub approach: Option<Option<String>>,
    pub languages: Option<String>,
    pub is_available: Option<bool>,
}

impl ProfessionalUpdate {
    /// Reject values that would break profile invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ProfessionalValidationError`] when a present field would
    /// be blank, wider than its column, or out of range.
    pub fn validate(&self) -> Result<(), ProfessionalValidationError> {
        if let Some(specialty) = &self.specialty {
            ensure_filled(specialty, "specialty", MAX_TEXT_LEN)?;
        }
        if let Some(languages) = &self.languages {
            ensure_filled(languages, "languages", MAX_TEXT_LEN)?;
        }
        if let Some(approach) = &self.approach {
            ensure_approach(approach.as_deref())?;
        }
        if let Some(years) = self.experience_years {
            ensure_experience(years)?;
        }
        self.consultation_price.map_or(Ok(()), ensure_positive_price)
    }

    /// True when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specialty.is_none()
            && self.bio.is_none()
            && self.experience_years.is_none()
            && self.consultation_price.is_none()
            && self.approach.is_none()
            && self.languages.is_none()
            && self.is_available.is_none()
    }
}

/// Minimal account fields embedded next to a professional profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub full_name: String,
    pub email: EmailAddress,
    pub phone: Option<String>,
    pub kind: AccountKind,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            full_name: account.full_name.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            kind: account.kind,
        }
    }
}

/// A profile joined with its owner's summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfessionalListing {
    pub profile: ProfessionalProfile,
    pub account: AccountSummary,
}
