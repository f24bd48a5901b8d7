//! Demo dataset seeding.
//!
//! Converts the bundled demo fixture into domain accounts and professional
//! profiles, then writes them through the account repository. Accounts whose
//! email already exists are skipped, so running the seeder twice is a no-op.
//! Each professional is written together with its account in one
//! transaction.

use std::sync::Arc;

use mockable::Clock;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, CredentialHasher, CredentialHasherError,
};
use crate::domain::{
    Account, AccountId, AccountKind, AccountValidationError, EmailAddress, NationalId, PhoneNumber,
    ProfessionalId, ProfessionalProfile, ProfessionalValidationError,
};

const BUNDLED_DATASET: &str = include_str!("../../fixtures/demo-data.json");

/// Account fields shared by demo patients and professionals.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoAccount {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub national_id: String,
    pub gender: Option<String>,
}

/// Demo professional: an account plus its verified, available profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoProfessional {
    pub account: DemoAccount,
    pub license_number: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub experience_years: u32,
    pub consultation_price: f64,
    pub approach: Option<String>,
    pub languages: String,
    pub rating: f64,
    pub review_count: u32,
}

/// Complete demo dataset. Every account shares `password`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoDataset {
    pub password: String,
    pub patients: Vec<DemoAccount>,
    pub professionals: Vec<DemoProfessional>,
}

impl DemoDataset {
    /// Parse the dataset compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`DemoDataError::Fixture`] when the bundled JSON is malformed.
    pub fn bundled() -> Result<Self, DemoDataError> {
        serde_json::from_str(BUNDLED_DATASET).map_err(|err| DemoDataError::Fixture {
            message: err.to_string(),
        })
    }
}

/// Errors raised while preparing or applying demo data.
#[derive(Debug, Error)]
pub enum DemoDataError {
    /// The fixture could not be parsed.
    #[error("demo dataset is malformed: {message}")]
    Fixture { message: String },
    /// A fixture account failed domain validation.
    #[error("demo account {email} is invalid: {source}")]
    InvalidAccount {
        email: String,
        #[source]
        source: AccountValidationError,
    },
    /// A fixture profile failed domain validation.
    #[error("demo profile for {email} is invalid: {source}")]
    InvalidProfile {
        email: String,
        #[source]
        source: ProfessionalValidationError,
    },
    /// Password hashing failed.
    #[error("demo password hashing failed: {0}")]
    Hashing(#[from] CredentialHasherError),
    /// Persistence adapter failed while seeding.
    #[error("demo data persistence error: {0}")]
    Persistence(#[from] AccountRepositoryError),
}

/// Counts reported after a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DemoSeedOutcome {
    /// Accounts written by this run.
    pub inserted: usize,
    /// Accounts skipped because their email already existed.
    pub skipped: usize,
}

/// Service that writes the demo dataset.
#[derive(Clone)]
pub struct DemoDataSeeder<R> {
    accounts: Arc<R>,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
}

impl<R> DemoDataSeeder<R> {
    /// Create a seeder with its collaborators.
    pub fn new(accounts: Arc<R>, hasher: Arc<dyn CredentialHasher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            hasher,
            clock,
        }
    }
}

impl<R> DemoDataSeeder<R>
where
    R: AccountRepository,
{
    /// Insert every dataset account that does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DemoDataError`] when the fixture fails validation, hashing
    /// fails, or the repository rejects a write.
    pub async fn seed(&self, dataset: &DemoDataset) -> Result<DemoSeedOutcome, DemoDataError> {
        let password_hash = self.hasher.hash(&dataset.password)?;
        let mut outcome = DemoSeedOutcome::default();

        for patient in &dataset.patients {
            let account = self.account(patient, AccountKind::Patient)?;
            if self.exists(&account).await? {
                outcome.skipped += 1;
                continue;
            }
            self.accounts.insert(&account, &password_hash).await?;
            outcome.inserted += 1;
        }

        for professional in &dataset.professionals {
            let account = self.account(&professional.account, AccountKind::Professional)?;
            if self.exists(&account).await? {
                outcome.skipped += 1;
                continue;
            }
            let profile = self.profile(&account, professional)?;
            self.accounts
                .insert_with_profile(&account, &password_hash, &profile)
                .await?;
            outcome.inserted += 1;
        }

        info!(
            inserted = outcome.inserted,
            skipped = outcome.skipped,
            "demo data seeded"
        );
        Ok(outcome)
    }

    async fn exists(&self, account: &Account) -> Result<bool, DemoDataError> {
        let exists = self.accounts.email_exists(&account.email).await?;
        if exists {
            debug!(email = %account.email, "demo account already present");
        }
        Ok(exists)
    }

    fn account(&self, seed: &DemoAccount, kind: AccountKind) -> Result<Account, DemoDataError> {
        let invalid = |source| DemoDataError::InvalidAccount {
            email: seed.email.clone(),
            source,
        };
        let email = EmailAddress::new(&seed.email).map_err(invalid)?;
        let national_id = NationalId::new(&seed.national_id).map_err(invalid)?;
        let phone = seed
            .phone
            .as_deref()
            .map(PhoneNumber::new)
            .transpose()
            .map_err(invalid)?;
        let now = self.clock.utc();
        Ok(Account {
            id: AccountId::random(),
            email,
            full_name: seed.full_name.clone(),
            phone: phone.map(String::from),
            date_of_birth: None,
            gender: seed.gender.clone(),
            national_id,
            kind,
            created_at: now,
            updated_at: now,
        })
    }

    fn profile(
        &self,
        account: &Account,
        seed: &DemoProfessional,
    ) -> Result<ProfessionalProfile, DemoDataError> {
        let profile = ProfessionalProfile {
            id: ProfessionalId::random(),
            account_id: account.id,
            license_number: seed.license_number.clone(),
            specialty: seed.specialty.clone(),
            bio: seed.bio.clone(),
            experience_years: seed.experience_years,
            consultation_price: seed.consultation_price,
            approach: seed.approach.clone(),
            languages: seed.languages.clone(),
            is_verified: true,
            rating: seed.rating,
            review_count: seed.review_count,
            is_available: true,
            created_at: account.created_at,
            updated_at: account.updated_at,
        };
        profile
            .validate()
            .map_err(|source| DemoDataError::InvalidProfile {
                email: seed.account.email.clone(),
                source,
            })?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for demo data seeding.
    use super::*;
    use crate::domain::CredentialHash;
    use crate::domain::ports::{MockAccountRepository, MockCredentialHasher};
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dataset() -> DemoDataset {
        DemoDataset::bundled().expect("bundled dataset parses")
    }

    fn hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .withf(|plaintext| plaintext == "123456")
            .times(1)
            .return_once(|_| Ok(CredentialHash::new("hashed:123456")));
        hasher
    }

    fn seeder(accounts: MockAccountRepository) -> DemoDataSeeder<MockAccountRepository> {
        DemoDataSeeder::new(
            Arc::new(accounts),
            Arc::new(hasher()),
            Arc::new(DefaultClock),
        )
    }

    #[rstest]
    fn bundled_dataset_has_three_patients_and_four_professionals(dataset: DemoDataset) {
        assert_eq!(dataset.patients.len(), 3);
        assert_eq!(dataset.professionals.len(), 4);
        assert!(
            dataset
                .professionals
                .iter()
                .all(|p| p.consultation_price > 0.0)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn empty_store_receives_every_account(dataset: DemoDataset) {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_email_exists().times(7).returning(|_| Ok(false));
        accounts
            .expect_insert()
            .withf(|account, _| account.kind == AccountKind::Patient)
            .times(3)
            .returning(|_, _| Ok(()));
        accounts
            .expect_insert_with_profile()
            .withf(|account, _, profile| {
                account.kind == AccountKind::Professional
                    && profile.account_id == account.id
                    && profile.is_listed()
            })
            .times(4)
            .returning(|_, _, _| Ok(()));

        let outcome = seeder(accounts).seed(&dataset).await.expect("seeding succeeds");
        assert_eq!(
            outcome,
            DemoSeedOutcome {
                inserted: 7,
                skipped: 0
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn existing_accounts_are_skipped(dataset: DemoDataset) {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_email_exists().times(7).returning(|_| Ok(true));
        accounts.expect_insert().never();
        accounts.expect_insert_with_profile().never();

        let outcome = seeder(accounts).seed(&dataset).await.expect("seeding succeeds");
        assert_eq!(outcome.skipped, 7);
        assert_eq!(outcome.inserted, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_fixture_accounts_are_reported(mut dataset: DemoDataset) {
        dataset.patients.truncate(1);
        dataset.professionals.clear();
        if let Some(patient) = dataset.patients.first_mut() {
            patient.national_id = "12345678901".to_owned();
        }
        let accounts = MockAccountRepository::new();

        let err = seeder(accounts)
            .seed(&dataset)
            .await
            .expect_err("invalid national id");
        assert!(matches!(err, DemoDataError::InvalidAccount { .. }));
    }
}
