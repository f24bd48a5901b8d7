//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Password hashes are only selected by the credential lookups; every other
//! read uses [`AccountRow`], which has no hash column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{
    Account, AccountId, CredentialHash, EmailAddress, NationalId, ProfessionalProfile,
    StoredCredentials,
};

use super::diesel_error_mapping::{account_corrupt_row, account_diesel_error, account_pool_error};
use super::models::{
    AccountProfileChangeset, AccountRow, CredentialsRow, NewAccountRow, NewProfessionalRow,
};
use super::pool::DbPool;
use super::schema::{accounts, professionals};

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_credentials(row: CredentialsRow) -> Result<StoredCredentials, AccountRepositoryError> {
    Ok(StoredCredentials {
        account: Account::try_from(row.account).map_err(account_corrupt_row)?,
        password_hash: CredentialHash::new(row.password_hash),
    })
}

fn expect_one_row(affected: usize) -> Result<(), AccountRepositoryError> {
    if affected == 0 {
        Err(AccountRepositoryError::query("account not found"))
    } else {
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;

        let row: Option<AccountRow> = accounts::table
            .find(id.as_uuid())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(account_diesel_error)?;

        row.map(Account::try_from)
            .transpose()
            .map_err(account_corrupt_row)
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;

        let row: Option<CredentialsRow> = accounts::table
            .filter(accounts::email.eq(email))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(account_diesel_error)?;

        row.map(to_credentials).transpose()
    }

    async fn find_credentials_by_id(
        &self,
        id: &AccountId,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;

        let row: Option<CredentialsRow> = accounts::table
            .find(id.as_uuid())
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(account_diesel_error)?;

        row.map(to_credentials).transpose()
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;

        diesel::select(diesel::dsl::exists(
            accounts::table.filter(accounts::email.eq(email.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(account_diesel_error)
    }

    async fn national_id_exists(
        &self,
        national_id: &NationalId,
    ) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;

        diesel::select(diesel::dsl::exists(
            accounts::table.filter(accounts::national_id.eq(national_id.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(account_diesel_error)
    }

    async fn insert(
        &self,
        account: &Account,
        password_hash: &CredentialHash,
    ) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;

        diesel::insert_into(accounts::table)
            .values(NewAccountRow::new(account, password_hash.as_str()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(account_diesel_error)
    }

    async fn insert_with_profile(
        &self,
        account: &Account,
        password_hash: &CredentialHash,
        profile: &ProfessionalProfile,
    ) -> Result<(), AccountRepositoryError> {
        let account_row = NewAccountRow::new(account, password_hash.as_str());
        let profile_row = NewProfessionalRow::try_from(profile).map_err(account_corrupt_row)?;
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(accounts::table)
                    .values(&account_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(professionals::table)
                    .values(&profile_row)
                    .execute(conn)
                    .await?;
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(account_diesel_error)
    }

    async fn update_profile(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;

        let affected = diesel::update(accounts::table.find(account.id.as_uuid()))
            .set(AccountProfileChangeset::from(account))
            .execute(&mut conn)
            .await
            .map_err(account_diesel_error)?;
        expect_one_row(affected)
    }

    async fn update_password_hash(
        &self,
        id: &AccountId,
        password_hash: &CredentialHash,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;

        let affected = diesel::update(accounts::table.find(id.as_uuid()))
            .set((
                accounts::password_hash.eq(password_hash.as_str()),
                accounts::updated_at.eq(updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(account_diesel_error)?;
        expect_one_row(affected)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row-count handling.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_rows_are_query_errors() {
        assert!(matches!(
            expect_one_row(0),
            Err(AccountRepositoryError::Query { .. })
        ));
        assert_eq!(expect_one_row(1), Ok(()));
    }
}
