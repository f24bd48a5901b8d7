//! Test utilities for the backend crate.
//!
//! In-memory adapters for the driven ports plus helpers that wire them into
//! the real domain services. Shared by unit tests in `src/` and the
//! integration tests in `tests/` through the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use pagination::Page;
use uuid::Uuid;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, CredentialHasher, CredentialHasherError,
    ProfessionalRepository, ProfessionalRepositoryError, TokenIssuer, TokenIssuerError,
};
use crate::domain::search::{listed_specialties, rank};
use crate::domain::{
    AccessToken, Account, AccountId, AccountService, AccountSummary, CredentialHash,
    EmailAddress, NationalId, ProfessionalId, ProfessionalListing, ProfessionalProfile,
    ProfessionalSearch, ProfessionalService, StoredCredentials,
};
use crate::inbound::http::state::HttpState;

#[derive(Default)]
struct Tables {
    accounts: Vec<(Account, CredentialHash)>,
    professionals: Vec<ProfessionalProfile>,
}

impl Tables {
    fn listing(&self, profile: &ProfessionalProfile) -> Option<ProfessionalListing> {
        self.accounts
            .iter()
            .find(|(account, _)| account.id == profile.account_id)
            .map(|(account, _)| ProfessionalListing {
                profile: profile.clone(),
                account: AccountSummary::from(account),
            })
    }

    fn check_unique(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        if self.accounts.iter().any(|(a, _)| a.email == account.email) {
            return Err(AccountRepositoryError::duplicate_email());
        }
        if self
            .accounts
            .iter()
            .any(|(a, _)| a.national_id == account.national_id)
        {
            return Err(AccountRepositoryError::duplicate_national_id());
        }
        Ok(())
    }
}

/// Shared in-memory tables backing both repository adapters.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryDatabase {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Account repository view over these tables.
    pub fn accounts(&self) -> InMemoryAccountRepository {
        InMemoryAccountRepository { db: self.clone() }
    }

    /// Professional repository view over these tables.
    pub fn professionals(&self) -> InMemoryProfessionalRepository {
        InMemoryProfessionalRepository { db: self.clone() }
    }

    /// Stored password hash for `id`.
    pub fn password_hash(&self, id: &AccountId) -> Option<CredentialHash> {
        self.lock()
            .accounts
            .iter()
            .find(|(account, _)| account.id == *id)
            .map(|(_, hash)| hash.clone())
    }

    /// Stored account row for `id`.
    pub fn account(&self, id: &AccountId) -> Option<Account> {
        self.lock()
            .accounts
            .iter()
            .find(|(account, _)| account.id == *id)
            .map(|(account, _)| account.clone())
    }

    /// Stored profile row for `id`.
    pub fn professional(&self, id: &ProfessionalId) -> Option<ProfessionalProfile> {
        self.lock()
            .professionals
            .iter()
            .find(|profile| profile.id == *id)
            .cloned()
    }

    /// Number of stored accounts.
    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }
}

/// [`AccountRepository`] backed by [`InMemoryDatabase`].
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self.db.account(id))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        Ok(self
            .db
            .lock()
            .accounts
            .iter()
            .find(|(account, _)| account.email.as_str() == email)
            .map(|(account, hash)| StoredCredentials {
                account: account.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn find_credentials_by_id(
        &self,
        id: &AccountId,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        Ok(self
            .db
            .lock()
            .accounts
            .iter()
            .find(|(account, _)| account.id == *id)
            .map(|(account, hash)| StoredCredentials {
                account: account.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, AccountRepositoryError> {
        Ok(self
            .db
            .lock()
            .accounts
            .iter()
            .any(|(account, _)| account.email == *email))
    }

    async fn national_id_exists(
        &self,
        national_id: &NationalId,
    ) -> Result<bool, AccountRepositoryError> {
        Ok(self
            .db
            .lock()
            .accounts
            .iter()
            .any(|(account, _)| account.national_id == *national_id))
    }

    async fn insert(
        &self,
        account: &Account,
        password_hash: &CredentialHash,
    ) -> Result<(), AccountRepositoryError> {
        let mut tables = self.db.lock();
        tables.check_unique(account)?;
        tables
            .accounts
            .push((account.clone(), password_hash.clone()));
        Ok(())
    }

    async fn insert_with_profile(
        &self,
        account: &Account,
        password_hash: &CredentialHash,
        profile: &ProfessionalProfile,
    ) -> Result<(), AccountRepositoryError> {
        let mut tables = self.db.lock();
        tables.check_unique(account)?;
        tables
            .accounts
            .push((account.clone(), password_hash.clone()));
        tables.professionals.push(profile.clone());
        Ok(())
    }

    async fn update_profile(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut tables = self.db.lock();
        let Some((stored, _)) = tables.accounts.iter_mut().find(|(a, _)| a.id == account.id)
        else {
            return Err(AccountRepositoryError::query("account row missing"));
        };
        *stored = account.clone();
        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: &AccountId,
        password_hash: &CredentialHash,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AccountRepositoryError> {
        let mut tables = self.db.lock();
        let Some((stored, hash)) = tables.accounts.iter_mut().find(|(a, _)| a.id == *id) else {
            return Err(AccountRepositoryError::query("account row missing"));
        };
        stored.updated_at = updated_at;
        *hash = password_hash.clone();
        Ok(())
    }
}

/// [`ProfessionalRepository`] backed by [`InMemoryDatabase`].
#[derive(Clone, Default)]
pub struct InMemoryProfessionalRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl ProfessionalRepository for InMemoryProfessionalRepository {
    async fn find_by_id(
        &self,
        id: &ProfessionalId,
    ) -> Result<Option<ProfessionalListing>, ProfessionalRepositoryError> {
        let tables = self.db.lock();
        Ok(tables
            .professionals
            .iter()
            .find(|profile| profile.id == *id)
            .and_then(|profile| tables.listing(profile)))
    }

    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<ProfessionalListing>, ProfessionalRepositoryError> {
        let tables = self.db.lock();
        Ok(tables
            .professionals
            .iter()
            .find(|profile| profile.account_id == *account_id)
            .and_then(|profile| tables.listing(profile)))
    }

    async fn update(
        &self,
        profile: &ProfessionalProfile,
    ) -> Result<(), ProfessionalRepositoryError> {
        let mut tables = self.db.lock();
        let Some(stored) = tables.professionals.iter_mut().find(|p| p.id == profile.id) else {
            return Err(ProfessionalRepositoryError::query("profile row missing"));
        };
        *stored = profile.clone();
        Ok(())
    }

    async fn search(
        &self,
        search: &ProfessionalSearch,
    ) -> Result<Page<ProfessionalListing>, ProfessionalRepositoryError> {
        let tables = self.db.lock();
        let mut matched: Vec<&ProfessionalProfile> = tables
            .professionals
            .iter()
            .filter(|profile| search.filters.matches(profile))
            .collect();
        matched.sort_by(|a, b| rank(a, b).then_with(|| a.id.as_uuid().cmp(b.id.as_uuid())));

        let total = u64::try_from(matched.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(search.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(search.page.limit()).unwrap_or(usize::MAX);
        let items = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|profile| tables.listing(profile))
            .collect();
        Ok(Page::new(items, search.page, total))
    }

    async fn list_specialties(&self) -> Result<Vec<String>, ProfessionalRepositoryError> {
        Ok(listed_specialties(&self.db.lock().professionals))
    }
}

/// Reversible hasher so tests avoid Argon2's cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHasher;

const PLAIN_PREFIX: &str = "plain$";

impl CredentialHasher for PlainTextHasher {
    fn hash(&self, plaintext: &str) -> Result<CredentialHash, CredentialHasherError> {
        Ok(CredentialHash::new(format!("{PLAIN_PREFIX}{plaintext}")))
    }

    fn verify(
        &self,
        plaintext: &str,
        hash: &CredentialHash,
    ) -> Result<bool, CredentialHasherError> {
        let Some(stored) = hash.as_str().strip_prefix(PLAIN_PREFIX) else {
            return Err(CredentialHasherError::malformed_hash("missing prefix"));
        };
        Ok(stored == plaintext)
    }
}

/// Token issuer whose tokens are `token-<account uuid>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransparentTokenIssuer;

const TOKEN_PREFIX: &str = "token-";

impl TokenIssuer for TransparentTokenIssuer {
    fn issue(&self, account_id: &AccountId) -> Result<AccessToken, TokenIssuerError> {
        Ok(AccessToken::new(format!("{TOKEN_PREFIX}{account_id}")))
    }

    fn validate(&self, token: &str) -> Result<AccountId, TokenIssuerError> {
        token
            .strip_prefix(TOKEN_PREFIX)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .map(AccountId::from_uuid)
            .ok_or_else(|| TokenIssuerError::invalid("unrecognised token"))
    }
}

/// Real domain services over `db` with the fast test doubles.
pub fn http_state(db: &InMemoryDatabase) -> HttpState {
    let accounts = Arc::new(db.accounts());
    let professionals = Arc::new(db.professionals());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let account_service = Arc::new(AccountService::new(
        Arc::clone(&accounts),
        Arc::clone(&professionals),
        Arc::new(PlainTextHasher),
        Arc::new(TransparentTokenIssuer),
        Arc::clone(&clock),
    ));
    let professional_service = Arc::new(ProfessionalService::new(professionals, accounts, clock));

    HttpState::new(account_service.clone(), account_service, professional_service)
}

/// Bearer header value accepted by [`TransparentTokenIssuer`].
pub fn bearer_for(account_id: &AccountId) -> String {
    format!("Bearer {TOKEN_PREFIX}{account_id}")
}
