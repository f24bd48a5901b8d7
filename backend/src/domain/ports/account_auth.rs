//! Driving port for registration, login, and bearer-token resolution.
//!
//! Inbound adapters authenticate callers through this port without knowing
//! how credentials are stored or how tokens are signed, so HTTP handler tests
//! can substitute a double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{
    Account, AccountId, AuthenticatedAccount, Error, LoginCredentials, Registration,
};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountAuth: Send + Sync {
    /// Create an account and issue its first token.
    ///
    /// The returned profile never carries a professional extension.
    async fn register(&self, registration: Registration) -> Result<AuthenticatedAccount, Error>;

    /// Check credentials and issue a fresh token.
    ///
    /// Unknown emails and wrong passwords fail with the same `unauthorized`
    /// error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedAccount, Error>;

    /// Resolve a bearer token to the acting account identifier.
    async fn resolve_token(&self, token: &str) -> Result<AccountId, Error>;

    /// Load the account behind a resolved token.
    ///
    /// Fails with `not_found` when the account was deleted after the token
    /// was issued.
    async fn verify(&self, account_id: &AccountId) -> Result<Account, Error>;
}
