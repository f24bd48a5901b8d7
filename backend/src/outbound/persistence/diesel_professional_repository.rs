//! PostgreSQL-backed `ProfessionalRepository` implementation using Diesel ORM.
//!
//! Directory search builds one boxed join over `professionals` and
//! `accounts`, runs it once for the total and once for the requested page,
//! and orders by rating then review count (both descending) with the profile
//! id as a stable tiebreak.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Page;

use crate::domain::ports::{ProfessionalRepository, ProfessionalRepositoryError};
use crate::domain::{
    AccountId, ProfessionalId, ProfessionalListing, ProfessionalProfile, ProfessionalSearch,
    SearchFilters,
};

use super::diesel_error_mapping::{
    professional_corrupt_row, professional_diesel_error, professional_pool_error,
};
use super::models::{AccountRow, ProfessionalChangeset, ProfessionalRow, to_listing};
use super::pool::DbPool;
use super::schema::{accounts, professionals};

diesel::define_sql_function!(fn btrim(text: diesel::sql_types::Text) -> diesel::sql_types::Text);

type ListingSource = diesel::dsl::InnerJoin<professionals::table, accounts::table>;
type ListingQuery = diesel::dsl::IntoBoxed<'static, ListingSource, Pg>;

/// Diesel-backed implementation of the `ProfessionalRepository` port.
#[derive(Clone)]
pub struct DieselProfessionalRepository {
    pool: DbPool,
}

impl DieselProfessionalRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Wrap `needle` in `%` after escaping the LIKE metacharacters.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn listed(filters: &SearchFilters) -> ListingQuery {
    let mut query = professionals::table
        .inner_join(accounts::table)
        .into_boxed()
        .filter(professionals::is_available.eq(true))
        .filter(professionals::is_verified.eq(true));

    if let Some(specialty) = &filters.specialty {
        query = query.filter(professionals::specialty.like(contains_pattern(specialty)));
    }
    if let Some(min) = filters.min_price {
        query = query.filter(professionals::consultation_price.ge(min));
    }
    if let Some(max) = filters.max_price {
        query = query.filter(professionals::consultation_price.le(max));
    }
    if let Some(min) = filters.min_rating {
        query = query.filter(professionals::rating.ge(min));
    }
    if let Some(min) = filters.min_experience_years {
        let min = i32::try_from(min).unwrap_or(i32::MAX);
        query = query.filter(professionals::experience_years.ge(min));
    }
    if let Some(approach) = &filters.approach {
        query = query.filter(professionals::approach.like(contains_pattern(approach)));
    }
    if let Some(language) = &filters.language {
        query = query.filter(professionals::languages.like(contains_pattern(language)));
    }
    query
}

fn to_listings(
    rows: Vec<(ProfessionalRow, AccountRow)>,
) -> Result<Vec<ProfessionalListing>, ProfessionalRepositoryError> {
    rows.into_iter()
        .map(|row| to_listing(row).map_err(professional_corrupt_row))
        .collect()
}

#[async_trait]
impl ProfessionalRepository for DieselProfessionalRepository {
    async fn find_by_id(
        &self,
        id: &ProfessionalId,
    ) -> Result<Option<ProfessionalListing>, ProfessionalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(professional_pool_error)?;

        let row: Option<(ProfessionalRow, AccountRow)> = professionals::table
            .inner_join(accounts::table)
            .filter(professionals::id.eq(id.as_uuid()))
            .select((ProfessionalRow::as_select(), AccountRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(professional_diesel_error)?;

        row.map(to_listing)
            .transpose()
            .map_err(professional_corrupt_row)
    }

    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<ProfessionalListing>, ProfessionalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(professional_pool_error)?;

        let row: Option<(ProfessionalRow, AccountRow)> = professionals::table
            .inner_join(accounts::table)
            .filter(professionals::account_id.eq(account_id.as_uuid()))
            .select((ProfessionalRow::as_select(), AccountRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(professional_diesel_error)?;

        row.map(to_listing)
            .transpose()
            .map_err(professional_corrupt_row)
    }

    async fn update(
        &self,
        profile: &ProfessionalProfile,
    ) -> Result<(), ProfessionalRepositoryError> {
        let changeset = ProfessionalChangeset::try_from(profile).map_err(professional_corrupt_row)?;
        let mut conn = self.pool.get().await.map_err(professional_pool_error)?;

        let affected = diesel::update(professionals::table.find(profile.id.as_uuid()))
            .set(changeset)
            .execute(&mut conn)
            .await
            .map_err(professional_diesel_error)?;

        if affected == 0 {
            return Err(ProfessionalRepositoryError::query("professional not found"));
        }
        Ok(())
    }

    async fn search(
        &self,
        search: &ProfessionalSearch,
    ) -> Result<Page<ProfessionalListing>, ProfessionalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(professional_pool_error)?;
        let request = search.page;

        let total: i64 = listed(&search.filters)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(professional_diesel_error)?;

        let offset = i64::try_from(request.offset())
            .map_err(|_| ProfessionalRepositoryError::query("page offset out of range"))?;
        let rows: Vec<(ProfessionalRow, AccountRow)> = listed(&search.filters)
            .order((
                professionals::rating.desc(),
                professionals::review_count.desc(),
                professionals::id.asc(),
            ))
            .limit(i64::from(request.limit()))
            .offset(offset)
            .select((ProfessionalRow::as_select(), AccountRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(professional_diesel_error)?;

        let total = u64::try_from(total).unwrap_or_default();
        Ok(Page::new(to_listings(rows)?, request, total))
    }

    async fn list_specialties(&self) -> Result<Vec<String>, ProfessionalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(professional_pool_error)?;

        let mut specialties: Vec<String> = professionals::table
            .filter(professionals::is_available.eq(true))
            .filter(professionals::is_verified.eq(true))
            .filter(btrim(professionals::specialty).ne(""))
            .select(professionals::specialty)
            .distinct()
            .load(&mut conn)
            .await
            .map_err(professional_diesel_error)?;

        // Byte order, independent of the database collation.
        specialties.sort();
        Ok(specialties)
    }
}
