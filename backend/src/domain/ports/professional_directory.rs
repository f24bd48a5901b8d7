//! Driving port for the professional directory and its search.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{
    AccountId, Error, ProfessionalId, ProfessionalListing, ProfessionalSearch, ProfessionalUpdate,
};

/// Domain use-case port for browsing and editing professional profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfessionalDirectory: Send + Sync {
    /// Public lookup by profile id. Unlisted profiles are still returned.
    async fn by_id(&self, id: &ProfessionalId) -> Result<ProfessionalListing, Error>;

    /// Owner-only lookup by account id.
    async fn by_account_id(
        &self,
        acting: &AccountId,
        account_id: &AccountId,
    ) -> Result<ProfessionalListing, Error>;

    /// Owner-only partial update of the self-editable profile fields.
    async fn update(
        &self,
        acting: &AccountId,
        account_id: &AccountId,
        update: ProfessionalUpdate,
    ) -> Result<ProfessionalListing, Error>;

    /// Distinct specialties of listed profiles, sorted.
    async fn specialties(&self) -> Result<Vec<String>, Error>;

    /// Filtered, ranked, paginated directory search.
    async fn search(&self, search: ProfessionalSearch) -> Result<Page<ProfessionalListing>, Error>;
}
