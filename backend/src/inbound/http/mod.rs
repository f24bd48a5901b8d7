//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure`] mounts every route under `/api` plus the orchestration
//! probes, and installs extractor configs so malformed bodies, query strings,
//! and path segments answer with the failure envelope.

pub mod accounts_dto;
pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod identity;
pub mod professionals;
pub mod professionals_dto;
pub mod schemas;
pub mod state;
pub mod users;
pub mod validation;

use actix_web::web;

pub use crate::domain::ApiResult;
pub use error::route_not_found;
pub use identity::BearerIdentity;

/// Register the API routes, probes, and extractor error handlers.
///
/// Callers provide `web::Data<HttpState>` and `web::Data<HealthState>` and
/// install [`route_not_found`] as the default service.
///
/// # Examples
/// ```ignore
/// let app = App::new()
///     .app_data(http_state)
///     .app_data(health_state)
///     .wrap(Trace)
///     .configure(mentecare::inbound::http::configure)
///     .default_service(web::to(mentecare::inbound::http::route_not_found));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(health::ready)
        .service(health::live)
        .service(
            web::scope("/api")
                .service(health::api_health)
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login)
                        .service(auth::verify),
                )
                .service(
                    web::scope("/users")
                        .service(users::get_profile)
                        .service(users::update_profile)
                        .service(users::change_password)
                        .service(users::get_user),
                )
                .service(
                    web::scope("/professionals")
                        .service(professionals::search)
                        .service(professionals::specialties)
                        .service(professionals::get_own_professional)
                        .service(professionals::update_own_professional)
                        .service(professionals::get_professional),
                ),
        );
}
