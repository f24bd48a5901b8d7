//! Driven port for bearer token issuing and validation.

use crate::domain::{AccessToken, AccountId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token issuers.
    pub enum TokenIssuerError {
        /// The token is malformed, badly signed, or names no account.
        Invalid { message: String } => "invalid token: {message}",
        /// The token carried an expiry that has passed.
        Expired => "token expired",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Port for issuing and resolving bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Issue a token whose subject is `account_id`.
    fn issue(&self, account_id: &AccountId) -> Result<AccessToken, TokenIssuerError>;

    /// Resolve a token back to the account it was issued for.
    fn validate(&self, token: &str) -> Result<AccountId, TokenIssuerError>;
}
