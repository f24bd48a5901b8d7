//! Shared Diesel error mapping for the account and professional adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{AccountRepositoryError, ProfessionalRepositoryError};

use super::models::CorruptRow;
use super::pool::PoolError;

const EMAIL_CONSTRAINT: &str = "accounts_email_key";
const NATIONAL_ID_CONSTRAINT: &str = "accounts_national_id_key";

/// Classification of a Diesel failure shared by every repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    Connection(&'static str),
    Query(&'static str),
    DuplicateEmail,
    DuplicateNationalId,
}

fn unique_violation(constraint: Option<&str>, message: &str) -> DieselFailure {
    let names_column = |key: &str, column: &str| {
        constraint.is_some_and(|name| name == key) || message.contains(column)
    };
    if names_column(NATIONAL_ID_CONSTRAINT, "national_id") {
        DieselFailure::DuplicateNationalId
    } else if names_column(EMAIL_CONSTRAINT, "email") {
        DieselFailure::DuplicateEmail
    } else {
        DieselFailure::Query("duplicate record")
    }
}

/// Log and classify a Diesel error.
pub(crate) fn classify(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            unique_violation(info.constraint_name(), info.message())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Map pool errors to account repository errors.
pub(crate) fn account_pool_error(error: PoolError) -> AccountRepositoryError {
    AccountRepositoryError::connection(error.into_message())
}

/// Map Diesel errors to account repository errors.
pub(crate) fn account_diesel_error(error: DieselError) -> AccountRepositoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => AccountRepositoryError::connection(message),
        DieselFailure::Query(message) => AccountRepositoryError::query(message),
        DieselFailure::DuplicateEmail => AccountRepositoryError::duplicate_email(),
        DieselFailure::DuplicateNationalId => AccountRepositoryError::duplicate_national_id(),
    }
}

/// Map pool errors to professional repository errors.
pub(crate) fn professional_pool_error(error: PoolError) -> ProfessionalRepositoryError {
    ProfessionalRepositoryError::connection(error.into_message())
}

/// Map Diesel errors to professional repository errors.
///
/// Professional writes never touch the account unique constraints, so a
/// duplicate here is an ordinary query failure.
pub(crate) fn professional_diesel_error(error: DieselError) -> ProfessionalRepositoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => ProfessionalRepositoryError::connection(message),
        DieselFailure::Query(message) => ProfessionalRepositoryError::query(message),
        DieselFailure::DuplicateEmail | DieselFailure::DuplicateNationalId => {
            ProfessionalRepositoryError::query("duplicate record")
        }
    }
}

pub(crate) fn account_corrupt_row(error: CorruptRow) -> AccountRepositoryError {
    AccountRepositoryError::query(error.to_string())
}

pub(crate) fn professional_corrupt_row(error: CorruptRow) -> ProfessionalRepositoryError {
    ProfessionalRepositoryError::query(error.to_string())
}
