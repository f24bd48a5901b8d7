//! Self-service account handlers.
//!
//! ```text
//! GET /api/users/profile
//! PUT /api/users/profile {"fullName":"…","phone":null}
//! PUT /api/users/change-password {"currentPassword":"…","newPassword":"…"}
//! GET /api/users/{id}
//! ```
//!
//! Every route requires a bearer token.

use actix_web::{HttpResponse, get, put, web};

use super::accounts_dto::{
    AccountResponse, ChangePasswordRequest, UpdateProfileRequest, UserPayload,
};
use super::envelope;
use super::identity::BearerIdentity;
use super::schemas::ErrorEnvelopeSchema;
use super::state::HttpState;
use super::validation::{FieldName, map_password_change_error, parse_uuid};
use crate::domain::{AccountId, AccountProfile, ApiResult, PasswordChange};

fn user_payload(profile: &AccountProfile) -> UserPayload {
    UserPayload {
        user: AccountResponse::from(profile),
    }
}

/// The acting account, with its professional profile when it has one.
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Profile", body = UserPayload),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema),
        (status = 404, description = "Account not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
) -> ApiResult<HttpResponse> {
    let profile = state.accounts.profile(identity.account_id()).await?;
    Ok(envelope::ok(
        "Profile retrieved successfully",
        user_payload(&profile),
    ))
}

/// Partially update the acting account.
#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserPayload),
        (status = 400, description = "Malformed body", body = ErrorEnvelopeSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema),
        (status = 404, description = "Account not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let profile = state
        .accounts
        .update_profile(identity.account_id(), payload.into_inner().into())
        .await?;
    Ok(envelope::ok(
        "Profile updated successfully",
        user_payload(&profile),
    ))
}

/// Rotate the acting account's password.
#[utoipa::path(
    put,
    path = "/api/users/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Missing field or wrong current password", body = ErrorEnvelopeSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "changePassword"
)]
#[put("/change-password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let change =
        PasswordChange::try_from(payload.into_inner()).map_err(map_password_change_error)?;
    state
        .accounts
        .change_password(identity.account_id(), &change)
        .await?;
    Ok(envelope::ok_message("Password changed successfully"))
}

/// Fetch an account by id; only the account itself may.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account", body = UserPayload),
        (status = 400, description = "Identifier is not a UUID", body = ErrorEnvelopeSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema),
        (status = 403, description = "Not the acting account", body = ErrorEnvelopeSchema),
        (status = 404, description = "Account not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "getUserById"
)]
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = AccountId::from_uuid(parse_uuid(&path, FieldName::new("id"))?);
    let profile = state
        .accounts
        .account_by_id(identity.account_id(), &target)
        .await?;
    Ok(envelope::ok("User found", user_payload(&profile)))
}
