//! Seeding orchestration shared by the server and the `seed-demo-data` CLI.

use std::sync::Arc;

use mockable::DefaultClock;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{AccountRepository, CredentialHasher};
use crate::domain::{DemoDataError, DemoDataSeeder, DemoDataset, DemoSeedOutcome};
use crate::outbound::persistence::{DbPool, DieselAccountRepository};
use crate::outbound::security::Argon2CredentialHasher;
use crate::settings::AppSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Dataset parsing, validation, hashing, or persistence failed.
    #[error("demo data seeding error: {0}")]
    Seeding(#[from] DemoDataError),
}

/// Write the bundled dataset through `accounts`.
///
/// # Errors
///
/// Returns [`StartupSeedingError::Seeding`] when the dataset is invalid or a
/// write fails. Accounts already present are skipped, not reported.
pub async fn seed_demo_data<R>(
    accounts: Arc<R>,
    hasher: Arc<dyn CredentialHasher>,
) -> Result<DemoSeedOutcome, StartupSeedingError>
where
    R: AccountRepository,
{
    let dataset = DemoDataset::bundled()?;
    let seeder = DemoDataSeeder::new(accounts, hasher, Arc::new(DefaultClock));
    Ok(seeder.seed(&dataset).await?)
}

/// Apply the demo dataset on startup when `seed_demo_data` is enabled.
///
/// # Errors
///
/// See [`seed_demo_data`].
pub async fn seed_demo_data_on_startup(
    settings: &AppSettings,
    db_pool: &DbPool,
) -> Result<Option<DemoSeedOutcome>, StartupSeedingError> {
    if !settings.seed_demo_data {
        info!(reason = "disabled", "demo data seeding skipped");
        return Ok(None);
    }

    let accounts = Arc::new(DieselAccountRepository::new(db_pool.clone()));
    let outcome = seed_demo_data(accounts, Arc::new(Argon2CredentialHasher::default())).await?;
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryDatabase, PlainTextHasher};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn seeding_twice_only_inserts_once() {
        let db = InMemoryDatabase::default();
        let accounts = Arc::new(db.accounts());
        let hasher: Arc<dyn CredentialHasher> = Arc::new(PlainTextHasher);

        let first = seed_demo_data(Arc::clone(&accounts), Arc::clone(&hasher))
            .await
            .expect("first run");
        let second = seed_demo_data(Arc::clone(&accounts), hasher)
            .await
            .expect("second run");

        assert_eq!(first.inserted, 7);
        assert_eq!(first.skipped, 0);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, 7);
        assert_eq!(db.account_count(), 7);
    }
}
