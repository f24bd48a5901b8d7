//! Authentication API handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"…","password":"…","fullName":"…","nationalId":"…","accountKind":"patient"}
//! POST /api/auth/login {"email":"…","password":"…"}
//! GET /api/auth/verify   (Authorization: Bearer <token>)
//! ```

use actix_web::{HttpResponse, get, post, web};

use super::accounts_dto::{AccountResponse, AuthPayload, LoginRequest, RegisterRequest, UserPayload};
use super::envelope;
use super::identity::BearerIdentity;
use super::schemas::ErrorEnvelopeSchema;
use super::state::HttpState;
use super::validation::{map_login_error, map_registration_error};
use crate::domain::{ApiResult, LoginCredentials, Registration};

/// Create an account and return it with its first token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthPayload),
        (status = 400, description = "Invalid field or email/national id already in use", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from_form(payload.into_inner().into())
        .map_err(map_registration_error)?;
    let authenticated = state.auth.register(registration).await?;
    Ok(envelope::created(
        "User registered successfully",
        AuthPayload::from(&authenticated),
    ))
}

/// Check credentials and issue a fresh token.
///
/// Unknown emails and wrong passwords produce the same `401` body.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthPayload),
        (status = 400, description = "Email or password missing", body = ErrorEnvelopeSchema),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_error)?;
    let authenticated = state.auth.login(&credentials).await?;
    Ok(envelope::ok(
        "Login successful",
        AuthPayload::from(&authenticated),
    ))
}

/// Validate the bearer token and return its account.
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Token valid", body = UserPayload),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema),
        (status = 404, description = "Account no longer exists", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "verify"
)]
#[get("/verify")]
pub async fn verify(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
) -> ApiResult<HttpResponse> {
    let account = state.auth.verify(identity.account_id()).await?;
    Ok(envelope::ok(
        "Token valid",
        UserPayload {
            user: AccountResponse::from(&account),
        },
    ))
}
