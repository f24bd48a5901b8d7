//! Account aggregate and the validated values it is built from.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProfessionalProfile;
use super::text_field::{
    MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, TextFieldError, ensure_filled, ensure_fits,
};

/// Validation errors raised by account value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Identifier is not a UUID.
    #[error("account id must be a valid UUID")]
    InvalidId,
    /// Email does not look like `local@domain.tld`.
    #[error("email must look like name@domain.tld")]
    InvalidEmail,
    /// National id does not match `###.###.###-##`.
    #[error("national id must match ###.###.###-##")]
    InvalidNationalId,
    /// Phone does not match `(##) #####-####` or `(##) ####-####`.
    #[error("phone must match (##) #####-#### or (##) ####-####")]
    InvalidPhone,
    /// Account kind is neither `patient` nor `professional`.
    #[error("account kind must be patient or professional")]
    InvalidKind,
}

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("pattern {pattern} failed to compile: {error}"))
    })
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static NATIONAL_ID_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

/// Stable account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
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

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }
}

macro_rules! validated_text {
    ($(#[$meta:meta])* $name:ident, $cell:ident, $pattern:literal, $error:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the value, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns the matching [`AccountValidationError`] when the
            /// trimmed input does not match the expected shape.
            pub fn new(value: impl AsRef<str>) -> Result<Self, AccountValidationError> {
                let trimmed = value.as_ref().trim();
                if compiled(&$cell, $pattern).is_match(trimmed) {
                    Ok(Self(trimmed.to_owned()))
                } else {
                    Err(AccountValidationError::$error)
                }
            }

            /// Borrow the stored text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = AccountValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

validated_text!(
    /// Email address in `local@domain.tld` form.
    EmailAddress,
    EMAIL_RE,
    r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$",
    InvalidEmail
);

validated_text!(
    /// Brazilian CPF formatted as `###.###.###-##`.
    NationalId,
    NATIONAL_ID_RE,
    r"^\d{3}\.\d{3}\.\d{3}-\d{2}$",
    InvalidNationalId
);

validated_text!(
    /// Brazilian phone number formatted as `(##) #####-####` or `(##) ####-####`.
    PhoneNumber,
    PHONE_RE,
    r"^\(\d{2}\)\s\d{4,5}-\d{4}$",
    InvalidPhone
);

/// Whether an account belongs to a patient or to a professional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Looks for care.
    Patient,
    /// Offers care and owns a [`ProfessionalProfile`].
    Professional,
}

impl AccountKind {
    /// Stored and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Professional => "professional",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "patient" => Ok(Self::Patient),
            "professional" => Ok(Self::Professional),
            _ => Err(AccountValidationError::InvalidKind),
        }
    }
}

/// Registered user.
///
/// ## Invariants
/// - `email` and `national_id` are unique across all accounts.
/// - `kind` never changes after registration.
/// - `phone` is validated on registration only; profile updates store it as
///   given.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub full_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub national_id: NationalId,
    pub kind: AccountKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// True when the account owns (or may own) a professional profile.
    #[must_use]
    pub fn is_professional(&self) -> bool {
        matches!(self.kind, AccountKind::Professional)
    }

    /// Apply the fields present in `update` and stamp `updated_at`.
    pub fn apply_update(&mut self, update: &AccountUpdate, now: DateTime<Utc>) {
        if let Some(full_name) = &update.full_name {
            self.full_name.clone_from(full_name);
        }
        if let Some(phone) = &update.phone {
            self.phone.clone_from(phone);
        }
        if let Some(date_of_birth) = update.date_of_birth {
            self.date_of_birth = date_of_birth;
        }
        if let Some(gender) = &update.gender {
            self.gender.clone_from(gender);
        }
        self.updated_at = now;
    }
}

/// Partial update of the self-editable account fields.
///
/// `None` leaves a field untouched. For nullable columns `Some(None)` clears
/// the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub full_name: Option<String>,
    pub phone: Option<Option<String>>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub gender: Option<Option<String>>,
}

impl AccountUpdate {
    /// Reject values that do not fit their columns.
    ///
    /// Phone shape is only enforced at registration; here just its width is.
    ///
    /// # Errors
    ///
    /// Returns [`TextFieldError`] for a blank name or oversized text.
    pub fn validate(&self) -> Result<(), TextFieldError> {
        if let Some(full_name) = &self.full_name {
            ensure_filled(full_name, "fullName", MAX_TEXT_LEN)?;
        }
        if let Some(Some(phone)) = &self.phone {
            ensure_fits(phone, "phone", MAX_SHORT_TEXT_LEN)?;
        }
        if let Some(Some(gender)) = &self.gender {
            ensure_fits(gender, "gender", MAX_SHORT_TEXT_LEN)?;
        }
        Ok(())
    }

    /// True when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.date_of_birth.is_none()
            && self.gender.is_none()
    }
}

/// Account together with its professional extension, when one exists.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProfile {
    pub account: Account,
    pub professional: Option<ProfessionalProfile>,
}

impl AccountProfile {
    /// Profile without the professional extension.
    #[must_use]
    pub fn bare(account: Account) -> Self {
        Self {
            account,
            professional: None,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for account value types.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("amanda.silva@email.com", true)]
    #[case("  dr.ana+care@clinic.com.br ", true)]
    #[case("no-at-sign.com", false)]
    #[case("user@domain", false)]
    #[case("user@domain.c", false)]
    fn email_shape(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(EmailAddress::new(raw).is_ok(), valid);
    }

    #[rstest]
    #[case("123.456.789-01", true)]
    #[case("12345678901", false)]
    #[case("123.456.789-0", false)]
    fn national_id_shape(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(NationalId::new(raw).is_ok(), valid);
    }

    #[rstest]
    #[case("(11) 99999-1111", true)]
    #[case("(11) 9999-1111", true)]
    #[case("11 99999-1111", false)]
    #[case("(11)99999-1111", false)]
    fn phone_shape(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(PhoneNumber::new(raw).is_ok(), valid);
    }

    #[rstest]
    fn email_is_trimmed() {
        let email = EmailAddress::new("  carlos.santos@email.com ").expect("valid email");
        assert_eq!(email.as_str(), "carlos.santos@email.com");
    }

    #[rstest]
    #[case("patient", Ok(AccountKind::Patient))]
    #[case("professional", Ok(AccountKind::Professional))]
    #[case("admin", Err(AccountValidationError::InvalidKind))]
    fn account_kind_parses(
        #[case] raw: &str,
        #[case] expected: Result<AccountKind, AccountValidationError>,
    ) {
        assert_eq!(raw.parse::<AccountKind>(), expected);
    }

    #[rstest]
    fn account_id_rejects_garbage() {
        assert_eq!(
            "not-a-uuid".parse::<AccountId>(),
            Err(AccountValidationError::InvalidId)
        );
    }

    fn sample_account() -> Account {
        let created = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
        Account {
            id: AccountId::random(),
            email: EmailAddress::new("maria.oliveira@email.com").expect("valid email"),
            full_name: "Maria Oliveira".to_owned(),
            phone: Some("(11) 99999-3333".to_owned()),
            date_of_birth: None,
            gender: Some("Feminino".to_owned()),
            national_id: NationalId::new("345.678.901-23").expect("valid national id"),
            kind: AccountKind::Patient,
            created_at: created,
            updated_at: created,
        }
    }

    #[rstest]
    fn apply_update_touches_only_present_fields() {
        let mut account = sample_account();
        let before = account.clone();
        let later = before.updated_at + chrono::TimeDelta::seconds(30);
        let update = AccountUpdate {
            phone: Some(None),
            ..AccountUpdate::default()
        };

        account.apply_update(&update, later);

        assert_eq!(account.phone, None);
        assert_eq!(account.full_name, before.full_name);
        assert_eq!(account.gender, before.gender);
        assert_eq!(account.updated_at, later);
        assert_eq!(account.created_at, before.created_at);
    }

    #[rstest]
    fn empty_update_is_detected() {
        assert!(AccountUpdate::default().is_empty());
        let update = AccountUpdate {
            gender: Some(Some("Masculino".to_owned())),
            ..AccountUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[rstest]
    #[case::blank_name(AccountUpdate { full_name: Some("  ".to_owned()), ..AccountUpdate::default() }, "fullName")]
    #[case::wide_phone(AccountUpdate { phone: Some(Some("9".repeat(33))), ..AccountUpdate::default() }, "phone")]
    #[case::wide_gender(AccountUpdate { gender: Some(Some("x".repeat(33))), ..AccountUpdate::default() }, "gender")]
    fn update_rejects_text_the_store_cannot_hold(#[case] update: AccountUpdate, #[case] field: &str) {
        let err = update.validate().expect_err("invalid update");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn update_keeps_phone_shape_lenient() {
        let update = AccountUpdate {
            phone: Some(Some("11 99999-1111".to_owned())),
            gender: Some(None),
            ..AccountUpdate::default()
        };
        assert_eq!(update.validate(), Ok(()));
    }
}
