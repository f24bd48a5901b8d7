//! Professional directory service.
//!
//! Public reads (lookup by id, specialties, search) need no identity; reads
//! and writes keyed by account id are restricted to the owning account.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use tracing::{info, warn};

use super::account_service::{map_account_error, map_professional_error};
use crate::domain::ports::{AccountRepository, ProfessionalDirectory, ProfessionalRepository};
use crate::domain::{
    AccountId, Error, ProfessionalId, ProfessionalListing, ProfessionalSearch, ProfessionalUpdate,
};

/// Professional service implementing [`ProfessionalDirectory`].
#[derive(Clone)]
pub struct ProfessionalService<P, A> {
    professionals: Arc<P>,
    accounts: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<P, A> ProfessionalService<P, A> {
    /// Create a new service from its collaborators.
    pub fn new(professionals: Arc<P>, accounts: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            professionals,
            accounts,
            clock,
        }
    }
}

fn professional_not_found() -> Error {
    Error::not_found("professional not found")
}

fn ensure_self(acting: &AccountId, target: &AccountId) -> Result<(), Error> {
    if acting == target {
        Ok(())
    } else {
        warn!(account_id = %acting, target = %target, "cross-account professional access denied");
        Err(Error::forbidden("access denied"))
    }
}

impl<P, A> ProfessionalService<P, A>
where
    P: ProfessionalRepository,
    A: AccountRepository,
{
    async fn owned_listing(&self, account_id: &AccountId) -> Result<ProfessionalListing, Error> {
        self.professionals
            .find_by_account_id(account_id)
            .await
            .map_err(map_professional_error)?
            .ok_or_else(professional_not_found)
    }

    async fn ensure_professional(&self, account_id: &AccountId) -> Result<(), Error> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await
            .map_err(map_account_error)?;
        match account {
            Some(account) if account.is_professional() => Ok(()),
            _ => Err(Error::forbidden("only professionals may update this profile")),
        }
    }
}

#[async_trait]
impl<P, A> ProfessionalDirectory for ProfessionalService<P, A>
where
    P: ProfessionalRepository,
    A: AccountRepository,
{
    async fn by_id(&self, id: &ProfessionalId) -> Result<ProfessionalListing, Error> {
        self.professionals
            .find_by_id(id)
            .await
            .map_err(map_professional_error)?
            .ok_or_else(professional_not_found)
    }

    async fn by_account_id(
        &self,
        acting: &AccountId,
        account_id: &AccountId,
    ) -> Result<ProfessionalListing, Error> {
        ensure_self(acting, account_id)?;
        self.owned_listing(account_id).await
    }

    async fn update(
        &self,
        acting: &AccountId,
        account_id: &AccountId,
        update: ProfessionalUpdate,
    ) -> Result<ProfessionalListing, Error> {
        ensure_self(acting, account_id)?;
        self.ensure_professional(account_id).await?;
        let mut listing = self.owned_listing(account_id).await?;

        update.validate().map_err(Error::from)?;
        if update.is_empty() {
            return Ok(listing);
        }

        listing.profile.apply_update(&update, self.clock.utc());
        self.professionals
            .update(&listing.profile)
            .await
            .map_err(map_professional_error)?;
        info!(professional_id = %listing.profile.id, "professional profile updated");
        Ok(listing)
    }

    async fn specialties(&self) -> Result<Vec<String>, Error> {
        self.professionals
            .list_specialties()
            .await
            .map_err(map_professional_error)
    }

    async fn search(&self, search: ProfessionalSearch) -> Result<Page<ProfessionalListing>, Error> {
        let search = ProfessionalSearch {
            filters: search.filters.normalised(),
            ..search
        };
        self.professionals
            .search(&search)
            .await
            .map_err(map_professional_error)
    }
}
