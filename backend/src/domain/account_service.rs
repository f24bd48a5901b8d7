//! Account domain service.
//!
//! Implements registration, login, token resolution, and self-service
//! account management on top of the account and professional repositories,
//! the credential hasher, and the token issuer. Passwords, hashes, and tokens
//! never reach a log line.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountAuth, AccountDirectory, AccountRepository, AccountRepositoryError, CredentialHasher,
    CredentialHasherError, ProfessionalRepository, ProfessionalRepositoryError, TokenIssuer,
    TokenIssuerError,
};
use crate::domain::{
    AccessToken, Account, AccountId, AccountProfile, AccountUpdate, AuthenticatedAccount, Error,
    LoginCredentials, PasswordChange, Registration,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing [`AccountAuth`] and [`AccountDirectory`].
#[derive(Clone)]
pub struct AccountService<A, P> {
    accounts: Arc<A>,
    professionals: Arc<P>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl<A, P> AccountService<A, P> {
    /// Create a new service from its collaborators.
    pub fn new(
        accounts: Arc<A>,
        professionals: Arc<P>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            professionals,
            hasher,
            tokens,
            clock,
        }
    }
}

pub(crate) fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::internal(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateEmail => duplicate_email(),
        AccountRepositoryError::DuplicateNationalId => duplicate_national_id(),
    }
}

pub(crate) fn map_professional_error(error: ProfessionalRepositoryError) -> Error {
    match error {
        ProfessionalRepositoryError::Connection { message } => {
            Error::internal(format!("professional repository unavailable: {message}"))
        }
        ProfessionalRepositoryError::Query { message } => {
            Error::internal(format!("professional repository error: {message}"))
        }
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenIssuerError) -> Error {
    match error {
        TokenIssuerError::Expired => Error::unauthorized("token expired"),
        TokenIssuerError::Invalid { .. } => Error::unauthorized("invalid token"),
        TokenIssuerError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
    }
}

fn duplicate_email() -> Error {
    Error::conflict("email already registered")
        .with_details(json!({ "field": "email", "code": "duplicate" }))
}

fn duplicate_national_id() -> Error {
    Error::conflict("national id already registered")
        .with_details(json!({ "field": "nationalId", "code": "duplicate" }))
}

fn account_not_found() -> Error {
    Error::not_found("account not found")
}

impl<A, P> AccountService<A, P>
where
    A: AccountRepository,
    P: ProfessionalRepository,
{
    fn issue(&self, account_id: &AccountId) -> Result<AccessToken, Error> {
        self.tokens.issue(account_id).map_err(map_token_error)
    }

    async fn load(&self, id: &AccountId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(account_not_found)
    }

    async fn with_professional(&self, account: Account) -> Result<AccountProfile, Error> {
        if !account.is_professional() {
            return Ok(AccountProfile::bare(account));
        }
        let professional = self
            .professionals
            .find_by_account_id(&account.id)
            .await
            .map_err(map_professional_error)?
            .map(|listing| listing.profile);
        Ok(AccountProfile {
            account,
            professional,
        })
    }

    async fn ensure_unique(&self, registration: &Registration) -> Result<(), Error> {
        if self
            .accounts
            .email_exists(&registration.email)
            .await
            .map_err(map_account_error)?
        {
            return Err(duplicate_email());
        }
        if self
            .accounts
            .national_id_exists(&registration.national_id)
            .await
            .map_err(map_account_error)?
        {
            return Err(duplicate_national_id());
        }
        Ok(())
    }
}

#[async_trait]
impl<A, P> AccountAuth for AccountService<A, P>
where
    A: AccountRepository,
    P: ProfessionalRepository,
{
    async fn register(&self, registration: Registration) -> Result<AuthenticatedAccount, Error> {
        self.ensure_unique(&registration).await?;

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hasher_error)?;
        let now = self.clock.utc();
        let account = Account {
            id: AccountId::random(),
            email: registration.email,
            full_name: registration.full_name,
            phone: registration.phone.map(String::from),
            date_of_birth: registration.date_of_birth,
            gender: registration.gender,
            national_id: registration.national_id,
            kind: registration.kind,
            created_at: now,
            updated_at: now,
        };
        let profile = registration
            .professional
            .map(|details| details.into_profile(account.id, now));

        match &profile {
            Some(profile) => {
                self.accounts
                    .insert_with_profile(&account, &password_hash, profile)
                    .await
            }
            None => self.accounts.insert(&account, &password_hash).await,
        }
        .map_err(map_account_error)?;
        let token = self.issue(&account.id)?;
        info!(account_id = %account.id, kind = %account.kind, "account registered");

        Ok(AuthenticatedAccount {
            profile: AccountProfile::bare(account),
            token,
        })
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedAccount, Error> {
        let Some(stored) = self
            .accounts
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_account_error)?
        else {
            warn!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            warn!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.issue(&stored.account.id)?;
        info!(account_id = %stored.account.id, "login succeeded");
        let profile = self.with_professional(stored.account).await?;
        Ok(AuthenticatedAccount { profile, token })
    }

    async fn resolve_token(&self, token: &str) -> Result<AccountId, Error> {
        self.tokens.validate(token).map_err(map_token_error)
    }

    async fn verify(&self, account_id: &AccountId) -> Result<Account, Error> {
        self.load(account_id).await
    }
}

#[async_trait]
impl<A, P> AccountDirectory for AccountService<A, P>
where
    A: AccountRepository,
    P: ProfessionalRepository,
{
    async fn profile(&self, acting: &AccountId) -> Result<AccountProfile, Error> {
        let account = self.load(acting).await?;
        self.with_professional(account).await
    }

    async fn update_profile(
        &self,
        acting: &AccountId,
        update: AccountUpdate,
    ) -> Result<AccountProfile, Error> {
        update.validate()?;
        let mut account = self.load(acting).await?;
        if !update.is_empty() {
            account.apply_update(&update, self.clock.utc());
            self.accounts
                .update_profile(&account)
                .await
                .map_err(map_account_error)?;
            info!(account_id = %account.id, "account profile updated");
        }
        self.with_professional(account).await
    }

    async fn change_password(
        &self,
        acting: &AccountId,
        change: &PasswordChange,
    ) -> Result<(), Error> {
        let stored = self
            .accounts
            .find_credentials_by_id(acting)
            .await
            .map_err(map_account_error)?
            .ok_or_else(account_not_found)?;

        let matches = self
            .hasher
            .verify(change.current(), &stored.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            warn!(account_id = %acting, "password change rejected");
            return Err(Error::invalid_request("current password is incorrect")
                .with_details(json!({ "field": "currentPassword", "code": "mismatch" })));
        }

        let replacement = self
            .hasher
            .hash(change.replacement())
            .map_err(map_hasher_error)?;
        self.accounts
            .update_password_hash(acting, &replacement, self.clock.utc())
            .await
            .map_err(map_account_error)?;
        info!(account_id = %acting, "password changed");
        Ok(())
    }

    async fn account_by_id(
        &self,
        acting: &AccountId,
        target: &AccountId,
    ) -> Result<AccountProfile, Error> {
        if acting != target {
            warn!(account_id = %acting, target = %target, "cross-account read denied");
            return Err(Error::forbidden("access denied"));
        }
        self.profile(target).await
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
