//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Account, AccountId, CredentialHash, EmailAddress, NationalId, ProfessionalProfile,
    StoredCredentials,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The email is already registered.
        DuplicateEmail => "email already registered",
        /// The national id is already registered.
        DuplicateNationalId => "national id already registered",
    }
}

/// Port for reading and writing accounts and their credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fetch an account and its password hash by exact email.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError>;

    /// Fetch an account and its password hash by identifier.
    async fn find_credentials_by_id(
        &self,
        id: &AccountId,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError>;

    /// Whether any account already uses `email`.
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, AccountRepositoryError>;

    /// Whether any account already uses `national_id`.
    async fn national_id_exists(
        &self,
        national_id: &NationalId,
    ) -> Result<bool, AccountRepositoryError>;

    /// Insert a new account.
    ///
    /// Adapters report unique-constraint violations as
    /// [`AccountRepositoryError::DuplicateEmail`] or
    /// [`AccountRepositoryError::DuplicateNationalId`].
    async fn insert(
        &self,
        account: &Account,
        password_hash: &CredentialHash,
    ) -> Result<(), AccountRepositoryError>;

    /// Insert an account and its professional profile atomically.
    async fn insert_with_profile(
        &self,
        account: &Account,
        password_hash: &CredentialHash,
        profile: &ProfessionalProfile,
    ) -> Result<(), AccountRepositoryError>;

    /// Persist the self-editable fields and `updated_at` of `account`.
    async fn update_profile(&self, account: &Account) -> Result<(), AccountRepositoryError>;

    /// Replace the stored password hash.
    async fn update_password_hash(
        &self,
        id: &AccountId,
        password_hash: &CredentialHash,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AccountRepositoryError>;
}
