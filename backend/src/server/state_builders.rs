//! Builders wiring persistence and security adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use mentecare::domain::{AccountService, ProfessionalService};
use mentecare::inbound::http::health::HealthState;
use mentecare::inbound::http::state::HttpState;
use mentecare::outbound::persistence::{DieselAccountRepository, DieselProfessionalRepository};
use mentecare::outbound::security::{Argon2CredentialHasher, JwtTokenIssuer};

use super::ServerConfig;

/// Build the driving ports over the Diesel repositories.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let accounts = Arc::new(DieselAccountRepository::new(config.db_pool.clone()));
    let professionals = Arc::new(DieselProfessionalRepository::new(config.db_pool.clone()));
    let tokens = JwtTokenIssuer::new(&config.signing_secret, config.token_ttl, Arc::clone(&clock));

    let account_service = Arc::new(AccountService::new(
        Arc::clone(&accounts),
        Arc::clone(&professionals),
        Arc::new(Argon2CredentialHasher::default()),
        Arc::new(tokens),
        Arc::clone(&clock),
    ));
    let professional_service = Arc::new(ProfessionalService::new(professionals, accounts, clock));

    web::Data::new(HttpState::new(
        account_service.clone(),
        account_service,
        professional_service,
    ))
}

/// Health state whose readiness also requires a reachable database.
pub(super) fn build_health_state(config: &ServerConfig) -> web::Data<HealthState> {
    web::Data::new(HealthState::new().with_probe(Arc::new(config.db_pool.clone())))
}
