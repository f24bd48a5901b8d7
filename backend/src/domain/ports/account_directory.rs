//! Driving port for self-service account management.

use async_trait::async_trait;

use crate::domain::{AccountId, AccountProfile, AccountUpdate, Error, PasswordChange};

/// Domain use-case port for reading and editing one's own account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// The acting account, with its professional extension when present.
    async fn profile(&self, acting: &AccountId) -> Result<AccountProfile, Error>;

    /// Apply a partial update to the acting account.
    async fn update_profile(
        &self,
        acting: &AccountId,
        update: AccountUpdate,
    ) -> Result<AccountProfile, Error>;

    /// Rotate the acting account's password.
    ///
    /// A wrong current password is an `invalid_request` and leaves the stored
    /// hash untouched.
    async fn change_password(&self, acting: &AccountId, change: &PasswordChange)
    -> Result<(), Error>;

    /// Fetch an account by id. Only the account itself may do so.
    async fn account_by_id(
        &self,
        acting: &AccountId,
        target: &AccountId,
    ) -> Result<AccountProfile, Error>;
}
