//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types re-check the
//! invariants the domain constructors enforce, so a corrupted row surfaces as
//! a query error instead of an invalid aggregate.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Account, AccountId, AccountSummary, EmailAddress, NationalId, ProfessionalId,
    ProfessionalListing, ProfessionalProfile,
};

use super::schema::{accounts, professionals};

/// Row struct for reading accounts without their password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub national_id: String,
    pub account_kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading an account together with its password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    #[diesel(embed)]
    pub account: AccountRow,
    pub password_hash: String,
}

/// Insertable struct for creating account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<&'a str>,
    pub national_id: &'a str,
    pub account_kind: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the self-editable account columns.
///
/// `None` writes `NULL`; the domain decides which values to keep.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AccountProfileChangeset<'a> {
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading professional profiles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = professionals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfessionalRow {
    pub id: Uuid,
    pub account_id: Uuid,
    pub license_number: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub experience_years: i32,
    pub consultation_price: f64,
    pub approach: Option<String>,
    pub languages: String,
    pub is_verified: bool,
    pub rating: f64,
    pub review_count: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating professional profiles.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = professionals)]
pub(crate) struct NewProfessionalRow<'a> {
    pub id: Uuid,
    pub account_id: Uuid,
    pub license_number: &'a str,
    pub specialty: &'a str,
    pub bio: Option<&'a str>,
    pub experience_years: i32,
    pub consultation_price: f64,
    pub approach: Option<&'a str>,
    pub languages: &'a str,
    pub is_verified: bool,
    pub rating: f64,
    pub review_count: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the self-editable professional columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = professionals)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfessionalChangeset<'a> {
    pub specialty: &'a str,
    pub bio: Option<&'a str>,
    pub experience_years: i32,
    pub consultation_price: f64,
    pub approach: Option<&'a str>,
    pub languages: &'a str,
    pub is_available: bool,
    pub updated_at: DateTime<Utc>,
}

/// A stored value that no longer satisfies a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {column} is invalid: {reason}")]
pub(crate) struct CorruptRow {
    column: &'static str,
    reason: String,
}

impl CorruptRow {
    fn new(column: &'static str, reason: impl ToString) -> Self {
        Self {
            column,
            reason: reason.to_string(),
        }
    }
}

pub(crate) fn to_db_count(value: u32, column: &'static str) -> Result<i32, CorruptRow> {
    i32::try_from(value).map_err(|err| CorruptRow::new(column, err))
}

fn from_db_count(value: i32, column: &'static str) -> Result<u32, CorruptRow> {
    u32::try_from(value).map_err(|err| CorruptRow::new(column, err))
}

impl TryFrom<AccountRow> for Account {
    type Error = CorruptRow;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AccountId::from_uuid(row.id),
            email: EmailAddress::new(&row.email).map_err(|err| CorruptRow::new("email", err))?,
            full_name: row.full_name,
            phone: row.phone,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            national_id: NationalId::new(&row.national_id)
                .map_err(|err| CorruptRow::new("national_id", err))?,
            kind: row
                .account_kind
                .parse()
                .map_err(|err| CorruptRow::new("account_kind", err))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<ProfessionalRow> for ProfessionalProfile {
    type Error = CorruptRow;

    fn try_from(row: ProfessionalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProfessionalId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            license_number: row.license_number,
            specialty: row.specialty,
            bio: row.bio,
            experience_years: from_db_count(row.experience_years, "experience_years")?,
            consultation_price: row.consultation_price,
            approach: row.approach,
            languages: row.languages,
            is_verified: row.is_verified,
            rating: row.rating,
            review_count: from_db_count(row.review_count, "review_count")?,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Assemble a listing from a joined `(professional, account)` row pair.
pub(crate) fn to_listing(
    (professional, account): (ProfessionalRow, AccountRow),
) -> Result<ProfessionalListing, CorruptRow> {
    let account = Account::try_from(account)?;
    Ok(ProfessionalListing {
        profile: professional.try_into()?,
        account: AccountSummary::from(&account),
    })
}

impl<'a> NewAccountRow<'a> {
    pub(crate) fn new(account: &'a Account, password_hash: &'a str) -> Self {
        Self {
            id: *account.id.as_uuid(),
            email: account.email.as_str(),
            password_hash,
            full_name: account.full_name.as_str(),
            phone: account.phone.as_deref(),
            date_of_birth: account.date_of_birth,
            gender: account.gender.as_deref(),
            national_id: account.national_id.as_str(),
            account_kind: account.kind.as_str(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl<'a> From<&'a Account> for AccountProfileChangeset<'a> {
    fn from(account: &'a Account) -> Self {
        Self {
            full_name: account.full_name.as_str(),
            phone: account.phone.as_deref(),
            date_of_birth: account.date_of_birth,
            gender: account.gender.as_deref(),
            updated_at: account.updated_at,
        }
    }
}

impl<'a> TryFrom<&'a ProfessionalProfile> for NewProfessionalRow<'a> {
    type Error = CorruptRow;

    fn try_from(profile: &'a ProfessionalProfile) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *profile.id.as_uuid(),
            account_id: *profile.account_id.as_uuid(),
            license_number: profile.license_number.as_str(),
            specialty: profile.specialty.as_str(),
            bio: profile.bio.as_deref(),
            experience_years: to_db_count(profile.experience_years, "experience_years")?,
            consultation_price: profile.consultation_price,
            approach: profile.approach.as_deref(),
            languages: profile.languages.as_str(),
            is_verified: profile.is_verified,
            rating: profile.rating,
            review_count: to_db_count(profile.review_count, "review_count")?,
            is_available: profile.is_available,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        })
    }
}

impl<'a> TryFrom<&'a ProfessionalProfile> for ProfessionalChangeset<'a> {
    type Error = CorruptRow;

    fn try_from(profile: &'a ProfessionalProfile) -> Result<Self, Self::Error> {
        Ok(Self {
            specialty: profile.specialty.as_str(),
            bio: profile.bio.as_deref(),
            experience_years: to_db_count(profile.experience_years, "experience_years")?,
            consultation_price: profile.consultation_price,
            approach: profile.approach.as_deref(),
            languages: profile.languages.as_str(),
            is_available: profile.is_available,
            updated_at: profile.updated_at,
        })
    }
}
