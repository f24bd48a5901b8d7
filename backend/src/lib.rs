//! MenteCare backend library.
//!
//! Hexagonal layout: `domain` holds the aggregates, ports, and services;
//! `inbound::http` adapts them to the REST API; `outbound` implements the
//! driven ports with Diesel, Argon2, and JSON Web Tokens.

pub mod demo_data;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
