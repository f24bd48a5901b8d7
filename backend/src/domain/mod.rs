//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, the ports adapters plug into, and the services that
//! implement the driving ports. Keep types transport agnostic and document
//! invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Account / ProfessionalProfile: the two aggregates.
//! - AccountService / ProfessionalService: driving port implementations.

pub mod account;
mod account_service;
pub mod auth;
pub mod demo_data;
pub mod error;
pub mod ports;
pub mod professional;
mod professional_service;
pub mod search;
pub mod text_field;
pub mod trace_id;

pub use self::account::{
    Account, AccountId, AccountKind, AccountProfile, AccountUpdate, AccountValidationError,
    EmailAddress, NationalId, PhoneNumber,
};
pub use self::account_service::AccountService;
pub use self::auth::{
    AccessToken, AuthenticatedAccount, CredentialHash, LoginCredentials, LoginValidationError,
    PasswordChange, PasswordChangeValidationError, ProfessionalDetails, ProfessionalForm,
    Registration, RegistrationField, RegistrationForm, RegistrationValidationError,
    StoredCredentials,
};
pub use self::demo_data::{DemoDataError, DemoDataSeeder, DemoDataset, DemoSeedOutcome};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::professional::{
    AccountSummary, DEFAULT_LANGUAGES, MAX_EXPERIENCE_YEARS, ProfessionalId, ProfessionalListing,
    ProfessionalProfile, ProfessionalUpdate, ProfessionalValidationError,
};
pub use self::professional_service::ProfessionalService;
pub use self::search::{ProfessionalSearch, SearchFilters};
pub use self::text_field::TextFieldError;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use mentecare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
