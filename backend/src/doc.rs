//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api`, the health probes, the
//! payload schemas, and the bearer-token security scheme. Swagger UI serves
//! it at `/docs` in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::accounts_dto::{
    AccountResponse, AuthPayload, ChangePasswordRequest, LoginRequest, RegisterRequest,
    UpdateProfileRequest, UserPayload,
};
use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::professionals_dto::{
    AccountSummaryResponse, ProfessionalPayload, ProfessionalResponse, SearchPayload,
    SpecialtiesPayload, UpdateProfessionalRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorEnvelopeSchema};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/auth/register or POST /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "MenteCare backend API",
        description = "Accounts, authentication, and the professional directory."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::verify,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::change_password,
        crate::inbound::http::users::get_user,
        crate::inbound::http::professionals::search,
        crate::inbound::http::professionals::specialties,
        crate::inbound::http::professionals::get_professional,
        crate::inbound::http::professionals::get_own_professional,
        crate::inbound::http::professionals::update_own_professional,
        crate::inbound::http::health::api_health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AccountResponse,
        AuthPayload,
        UserPayload,
        RegisterRequest,
        LoginRequest,
        UpdateProfileRequest,
        ChangePasswordRequest,
        AccountSummaryResponse,
        ProfessionalResponse,
        ProfessionalPayload,
        SearchPayload,
        SpecialtiesPayload,
        UpdateProfessionalRequest,
        HealthStatus,
        ErrorEnvelopeSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "auth", description = "Registration, login, and token verification"),
        (name = "users", description = "Self-service account management"),
        (name = "professionals", description = "Professional directory and search"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
