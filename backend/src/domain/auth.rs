//! Authentication inputs and outputs.
//!
//! Inbound adapters hand raw strings to these constructors so the rules for
//! required fields, formats, and password handling live in one place.
//! Plaintext passwords are held in [`Zeroizing`] buffers and never leave
//! this module except through explicit accessors used for hashing.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use zeroize::Zeroizing;

use super::professional::{ensure_experience, ensure_positive_price};
use super::text_field::{MAX_LICENSE_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, ensure_fits};
use super::{
    AccountId, AccountKind, AccountProfile, DEFAULT_LANGUAGES, EmailAddress, NationalId,
    PhoneNumber, ProfessionalId, ProfessionalProfile,
};

/// Fields of the registration payload, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationField {
    Email,
    Password,
    FullName,
    NationalId,
    AccountKind,
    Phone,
    DateOfBirth,
    Gender,
    LicenseNumber,
    Specialty,
    ConsultationPrice,
    ExperienceYears,
    Approach,
    Languages,
}

impl RegistrationField {
    /// Name of the field in request payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::FullName => "fullName",
            Self::NationalId => "nationalId",
            Self::AccountKind => "accountKind",
            Self::Phone => "phone",
            Self::DateOfBirth => "dateOfBirth",
            Self::Gender => "gender",
            Self::LicenseNumber => "licenseNumber",
            Self::Specialty => "specialty",
            Self::ConsultationPrice => "consultationPrice",
            Self::ExperienceYears => "experienceYears",
            Self::Approach => "approach",
            Self::Languages => "languages",
        }
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First rule a registration payload broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// A required field was absent or blank.
    #[error("{0} is required")]
    MissingField(RegistrationField),
    /// A present field had the wrong shape.
    #[error("{field} is invalid: {reason}")]
    InvalidField {
        field: RegistrationField,
        reason: &'static str,
    },
    /// A present field was wider than its column.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: RegistrationField, max: usize },
}

impl RegistrationValidationError {
    /// The offending field.
    #[must_use]
    pub const fn field(&self) -> RegistrationField {
        match self {
            Self::MissingField(field)
            | Self::InvalidField { field, .. }
            | Self::TooLong { field, .. } => *field,
        }
    }

    fn invalid(field: RegistrationField, reason: &'static str) -> Self {
        Self::InvalidField { field, reason }
    }
}

/// Raw registration payload as received from a client.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub full_name: Option<String>,
    pub national_id: Option<String>,
    pub account_kind: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    /// Read only when `account_kind` is professional.
    pub professional: ProfessionalForm,
}

/// Raw profile fields sent with a professional registration.
#[derive(Debug, Clone, Default)]
pub struct ProfessionalForm {
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub consultation_price: Option<f64>,
    pub experience_years: Option<u32>,
    pub bio: Option<String>,
    pub approach: Option<String>,
    pub languages: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

fn required(
    value: Option<String>,
    field: RegistrationField,
) -> Result<String, RegistrationValidationError> {
    present(value).ok_or(RegistrationValidationError::MissingField(field))
}

fn fitting(
    value: String,
    field: RegistrationField,
    max: usize,
) -> Result<String, RegistrationValidationError> {
    ensure_fits(&value, field.as_str(), max)
        .map(|()| value)
        .map_err(|_| RegistrationValidationError::TooLong { field, max })
}

/// Validated profile fields of a professional registration.
///
/// ## Invariants
/// - License, specialty, and languages are non-blank and fit their columns.
/// - `consultation_price > 0` and `experience_years` is within bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfessionalDetails {
    pub license_number: String,
    pub specialty: String,
    pub consultation_price: f64,
    pub experience_years: u32,
    pub bio: Option<String>,
    pub approach: Option<String>,
    pub languages: String,
}

impl ProfessionalDetails {
    /// Validate the profile half of a registration.
    ///
    /// License, specialty, and price are required; experience defaults to
    /// zero and languages to [`DEFAULT_LANGUAGES`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationValidationError`] naming the offending field.
    pub fn try_from_form(form: ProfessionalForm) -> Result<Self, RegistrationValidationError> {
        use RegistrationField as Field;

        let ProfessionalForm {
            license_number,
            specialty,
            consultation_price,
            experience_years,
            bio,
            approach,
            languages,
        } = form;

        let license_number = fitting(
            required(license_number, Field::LicenseNumber)?,
            Field::LicenseNumber,
            MAX_LICENSE_LEN,
        )?;
        let specialty = fitting(
            required(specialty, Field::Specialty)?,
            Field::Specialty,
            MAX_TEXT_LEN,
        )?;
        let consultation_price =
            consultation_price.ok_or(RegistrationValidationError::MissingField(
                Field::ConsultationPrice,
            ))?;
        ensure_positive_price(consultation_price).map_err(|_| {
            RegistrationValidationError::invalid(Field::ConsultationPrice, "must be greater than zero")
        })?;
        let experience_years = experience_years.unwrap_or_default();
        ensure_experience(experience_years).map_err(|_| {
            RegistrationValidationError::invalid(Field::ExperienceYears, "must be at most 100")
        })?;
        let approach = present(approach)
            .map(|text| fitting(text, Field::Approach, MAX_TEXT_LEN))
            .transpose()?;
        let languages = fitting(
            present(languages).unwrap_or_else(|| DEFAULT_LANGUAGES.to_owned()),
            Field::Languages,
            MAX_TEXT_LEN,
        )?;

        Ok(Self {
            license_number,
            specialty,
            consultation_price,
            experience_years,
            bio: present(bio),
            approach,
            languages,
        })
    }

    /// Fresh profile for `account_id`: unverified, unrated, and available.
    #[must_use]
    pub fn into_profile(self, account_id: AccountId, now: DateTime<Utc>) -> ProfessionalProfile {
        ProfessionalProfile {
            id: ProfessionalId::random(),
            account_id,
            license_number: self.license_number,
            specialty: self.specialty,
            bio: self.bio,
            experience_years: self.experience_years,
            consultation_price: self.consultation_price,
            approach: self.approach,
            languages: self.languages,
            is_verified: false,
            rating: 0.0,
            review_count: 0,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated registration request.
///
/// ## Invariants
/// - Required fields are present and non-blank.
/// - `email`, `national_id`, and `phone` (when present) match their formats.
/// - `professional` is present exactly when `kind` is professional.
///
/// # Examples
/// ```
/// use mentecare::domain::{AccountKind, Registration, RegistrationForm};
/// use zeroize::Zeroizing;
///
/// let form = RegistrationForm {
///     email: Some("ana@example.com".into()),
///     password: Some(Zeroizing::new("s3cret".into())),
///     full_name: Some("Ana".into()),
///     national_id: Some("123.456.789-01".into()),
///     account_kind: Some("patient".into()),
///     ..RegistrationForm::default()
/// };
/// let registration = Registration::try_from_form(form).unwrap();
/// assert_eq!(registration.kind, AccountKind::Patient);
/// ```
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: EmailAddress,
    password: Zeroizing<String>,
    pub full_name: String,
    pub national_id: NationalId,
    pub kind: AccountKind,
    pub phone: Option<PhoneNumber>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub professional: Option<ProfessionalDetails>,
}

impl Registration {
    /// Validate a raw form, reporting the first failing field.
    ///
    /// Required fields are checked in the order email, password, full name,
    /// national id, account kind; formats are checked afterwards, then the
    /// profile fields of a professional registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationValidationError`] naming the offending field.
    pub fn try_from_form(form: RegistrationForm) -> Result<Self, RegistrationValidationError> {
        use RegistrationField as Field;

        let RegistrationForm {
            email,
            password,
            full_name,
            national_id,
            account_kind,
            phone,
            date_of_birth,
            gender,
            professional,
        } = form;

        let email = required(email, Field::Email)?;
        let password = password
            .filter(|value| !value.is_empty())
            .ok_or(RegistrationValidationError::MissingField(Field::Password))?;
        let full_name = fitting(
            required(full_name, Field::FullName)?,
            Field::FullName,
            MAX_TEXT_LEN,
        )?;
        let national_id = required(national_id, Field::NationalId)?;
        let account_kind = required(account_kind, Field::AccountKind)?;

        let email = EmailAddress::new(&email).map_err(|_| {
            RegistrationValidationError::invalid(Field::Email, "expected name@domain.tld")
        })?;
        let national_id = NationalId::new(&national_id).map_err(|_| {
            RegistrationValidationError::invalid(Field::NationalId, "expected ###.###.###-##")
        })?;
        let phone = present(phone)
            .map(|raw| {
                PhoneNumber::new(&raw).map_err(|_| {
                    RegistrationValidationError::invalid(
                        Field::Phone,
                        "expected (##) #####-#### or (##) ####-####",
                    )
                })
            })
            .transpose()?;
        let kind = account_kind.parse().map_err(|_| {
            RegistrationValidationError::invalid(
                Field::AccountKind,
                "expected patient or professional",
            )
        })?;
        let date_of_birth = present(date_of_birth)
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                    RegistrationValidationError::invalid(Field::DateOfBirth, "expected YYYY-MM-DD")
                })
            })
            .transpose()?;
        let gender = present(gender)
            .map(|text| fitting(text, Field::Gender, MAX_SHORT_TEXT_LEN))
            .transpose()?;
        let professional = match kind {
            AccountKind::Patient => None,
            AccountKind::Professional => Some(ProfessionalDetails::try_from_form(professional)?),
        };

        Ok(Self {
            email,
            password,
            full_name,
            national_id,
            kind,
            phone,
            date_of_birth,
            gender,
            professional,
        })
    }

    /// Plaintext password to be hashed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Domain error returned when login payload values are missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email is required")]
    MissingEmail,
    /// Password was missing or empty.
    #[error("password is required")]
    MissingPassword,
}

/// Login credentials.
///
/// The email is not format-checked: an unknown address and a wrong password
/// must fail identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    ///
    /// # Errors
    ///
    /// Returns [`LoginValidationError`] when either value is missing.
    pub fn try_from_parts(
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, LoginValidationError> {
        let email = email
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(LoginValidationError::MissingEmail)?;
        let password = password
            .filter(|value| !value.is_empty())
            .ok_or(LoginValidationError::MissingPassword)?;
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Domain error returned when a password change payload is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordChangeValidationError {
    #[error("currentPassword is required")]
    MissingCurrentPassword,
    #[error("newPassword is required")]
    MissingNewPassword,
}

/// Request to rotate a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    replacement: Zeroizing<String>,
}

impl PasswordChange {
    /// Construct a password change from raw inputs.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordChangeValidationError`] when either value is missing
    /// or empty.
    pub fn try_from_parts(
        current: Option<&str>,
        replacement: Option<&str>,
    ) -> Result<Self, PasswordChangeValidationError> {
        let current = current
            .filter(|value| !value.is_empty())
            .ok_or(PasswordChangeValidationError::MissingCurrentPassword)?;
        let replacement = replacement
            .filter(|value| !value.is_empty())
            .ok_or(PasswordChangeValidationError::MissingNewPassword)?;
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            replacement: Zeroizing::new(replacement.to_owned()),
        })
    }

    /// The password the caller claims is current.
    #[must_use]
    pub fn current(&self) -> &str {
        self.current.as_str()
    }

    /// The password to store.
    #[must_use]
    pub fn replacement(&self) -> &str {
        self.replacement.as_str()
    }
}

/// Opaque one-way hash of a password, as produced by a credential hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap an encoded hash string.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string for storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(..)")
    }
}

/// Account record paired with its stored password hash.
///
/// Only the authentication flows see this; every other read goes through
/// [`super::Account`], which has no hash field.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub account: super::Account,
    pub password_hash: CredentialHash,
}

/// Signed bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an encoded token.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded token to hand to the client.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub profile: AccountProfile,
    pub token: AccessToken,
}
