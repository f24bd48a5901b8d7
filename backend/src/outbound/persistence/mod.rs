//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the account and professional repository ports
//! backed by PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Adapters translate rows into domain types and Diesel failures into port
//!   errors; business rules live in the domain services.
//!
//! # Example
//!
//! ```ignore
//! use mentecare::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/mentecare")).await?;
//! let accounts = DieselAccountRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_error_mapping;
mod diesel_professional_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_professional_repository::DieselProfessionalRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
