//! Port abstraction for professional profile persistence.
//!
//! Adapters must implement the search semantics documented in
//! [`crate::domain::search`]: the listing baseline always applies, supplied
//! filters narrow the result, and pages are ordered by rating then review
//! count, both descending.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{
    AccountId, ProfessionalId, ProfessionalListing, ProfessionalProfile, ProfessionalSearch,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by professional repository adapters.
    pub enum ProfessionalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "professional repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "professional repository query failed: {message}",
    }
}

/// Port for reading and updating professional profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfessionalRepository: Send + Sync {
    /// Fetch a profile and its owner summary by profile identifier.
    ///
    /// No listing baseline is applied.
    async fn find_by_id(
        &self,
        id: &ProfessionalId,
    ) -> Result<Option<ProfessionalListing>, ProfessionalRepositoryError>;

    /// Fetch the profile owned by `account_id`, if any.
    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<ProfessionalListing>, ProfessionalRepositoryError>;

    /// Persist the self-editable fields and `updated_at` of `profile`.
    async fn update(&self, profile: &ProfessionalProfile)
    -> Result<(), ProfessionalRepositoryError>;

    /// Return one page of listed profiles matching `search`.
    async fn search(
        &self,
        search: &ProfessionalSearch,
    ) -> Result<Page<ProfessionalListing>, ProfessionalRepositoryError>;

    /// Distinct non-empty specialties of listed profiles, sorted.
    async fn list_specialties(&self) -> Result<Vec<String>, ProfessionalRepositoryError>;
}
