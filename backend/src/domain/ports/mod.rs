//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`AccountAuth`], [`AccountDirectory`],
//! [`ProfessionalDirectory`]) are called by inbound adapters. Driven ports
//! (repositories, the credential hasher, the token issuer, the readiness
//! probe) are implemented by
//! outbound adapters and injected into the domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod account_auth;
mod account_directory;
mod account_repository;
mod credential_hasher;
mod professional_directory;
mod professional_repository;
mod readiness_probe;
mod token_issuer;

pub use account_auth::AccountAuth;
#[cfg(test)]
pub use account_auth::MockAccountAuth;
pub use account_directory::AccountDirectory;
#[cfg(test)]
pub use account_directory::MockAccountDirectory;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use professional_directory::MockProfessionalDirectory;
pub use professional_directory::ProfessionalDirectory;
#[cfg(test)]
pub use professional_repository::MockProfessionalRepository;
pub use professional_repository::{ProfessionalRepository, ProfessionalRepositoryError};
#[cfg(test)]
pub use readiness_probe::MockReadinessProbe;
pub use readiness_probe::ReadinessProbe;
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenIssuer, TokenIssuerError};
