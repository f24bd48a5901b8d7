//! Request and response payloads for authentication and account endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::professionals_dto::ProfessionalResponse;
use super::validation::double_option;
use crate::domain::{
    Account, AccountProfile, AccountUpdate, AuthenticatedAccount, LoginCredentials,
    LoginValidationError, PasswordChange, PasswordChangeValidationError, ProfessionalForm,
    RegistrationForm,
};

/// Account representation. Never carries the password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    #[schema(example = "123.456.789-01")]
    pub national_id: String,
    #[schema(example = "patient")]
    pub account_kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional: Option<ProfessionalResponse>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.as_str().to_owned(),
            full_name: account.full_name.clone(),
            phone: account.phone.clone(),
            date_of_birth: account.date_of_birth,
            gender: account.gender.clone(),
            national_id: account.national_id.as_str().to_owned(),
            account_kind: account.kind.as_str().to_owned(),
            created_at: account.created_at,
            updated_at: account.updated_at,
            professional: None,
        }
    }
}

impl From<&AccountProfile> for AccountResponse {
    fn from(profile: &AccountProfile) -> Self {
        Self {
            professional: profile.professional.as_ref().map(ProfessionalResponse::from),
            ..Self::from(&profile.account)
        }
    }
}

/// `data` of register and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPayload {
    pub user: AccountResponse,
    /// Bearer token for the `Authorization` header.
    pub token: String,
}

impl From<&AuthenticatedAccount> for AuthPayload {
    fn from(authenticated: &AuthenticatedAccount) -> Self {
        Self {
            user: AccountResponse::from(&authenticated.profile),
            token: authenticated.token.as_str().to_owned(),
        }
    }
}

/// `data` of the endpoints returning a single account.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPayload {
    pub user: AccountResponse,
}

/// Registration body for `POST /api/auth/register`.
///
/// Fields are optional at the wire level so missing ones surface as
/// field-level validation errors rather than JSON rejections.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "amanda.silva@email.com")]
    pub email: Option<String>,
    #[schema(value_type = Option<String>, format = Password)]
    pub password: Option<Zeroizing<String>>,
    pub full_name: Option<String>,
    #[schema(example = "123.456.789-01")]
    pub national_id: Option<String>,
    #[schema(example = "patient")]
    pub account_kind: Option<String>,
    #[schema(example = "(11) 99999-1111")]
    pub phone: Option<String>,
    #[schema(example = "1990-05-15")]
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    /// Required when `accountKind` is `professional`; ignored otherwise.
    #[schema(example = "CRP 06/123456")]
    pub license_number: Option<String>,
    #[schema(example = "Psicologia Clínica")]
    pub specialty: Option<String>,
    #[schema(example = 150.0)]
    pub consultation_price: Option<f64>,
    pub experience_years: Option<u32>,
    pub bio: Option<String>,
    pub approach: Option<String>,
    #[schema(example = "Português, Inglês")]
    pub languages: Option<String>,
}

impl From<RegisterRequest> for RegistrationForm {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            full_name: request.full_name,
            national_id: request.national_id,
            account_kind: request.account_kind,
            phone: request.phone,
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            professional: ProfessionalForm {
                license_number: request.license_number,
                specialty: request.specialty,
                consultation_price: request.consultation_price,
                experience_years: request.experience_years,
                bio: request.bio,
                approach: request.approach,
                languages: request.languages,
            },
        }
    }
}

/// Login body for `POST /api/auth/login`.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    #[schema(value_type = Option<String>, format = Password)]
    pub password: Option<Zeroizing<String>>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.email.as_deref(),
            value.password.as_ref().map(|password| password.as_str()),
        )
    }
}

/// Partial update body for `PUT /api/users/profile`.
///
/// Absent keys are left untouched; `phone`, `dateOfBirth`, and `gender`
/// accept `null` to clear the stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub gender: Option<Option<String>>,
}

impl From<UpdateProfileRequest> for AccountUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            full_name: request.full_name,
            phone: request.phone,
            date_of_birth: request.date_of_birth,
            gender: request.gender,
        }
    }
}

/// Body for `PUT /api/users/change-password`.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[schema(value_type = Option<String>, format = Password)]
    pub current_password: Option<Zeroizing<String>>,
    #[schema(value_type = Option<String>, format = Password)]
    pub new_password: Option<Zeroizing<String>>,
}

impl TryFrom<ChangePasswordRequest> for PasswordChange {
    type Error = PasswordChangeValidationError;

    fn try_from(value: ChangePasswordRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.current_password.as_ref().map(|password| password.as_str()),
            value.new_password.as_ref().map(|password| password.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, AccountKind, EmailAddress, NationalId};
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn account() -> Account {
        let at = Utc
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Account {
            id: AccountId::random(),
            email: EmailAddress::new("amanda.silva@email.com").expect("valid email"),
            full_name: "Amanda Silva".to_owned(),
            phone: None,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 15),
            gender: Some("Feminino".to_owned()),
            national_id: NationalId::new("123.456.789-01").expect("valid national id"),
            kind: AccountKind::Patient,
            created_at: at,
            updated_at: at,
        }
    }

    #[rstest]
    fn account_representation_uses_camel_case_and_omits_secrets() {
        let value = serde_json::to_value(AccountResponse::from(&account())).expect("serialise");
        let object = value.as_object().expect("object");
        for key in [
            "id",
            "email",
            "fullName",
            "phone",
            "dateOfBirth",
            "gender",
            "nationalId",
            "accountKind",
            "createdAt",
            "updatedAt",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert!(!object.contains_key("professional"));
        assert!(!object.keys().any(|key| key.to_lowercase().contains("password")));
        assert_eq!(value.get("dateOfBirth"), Some(&json!("1990-05-15")));
        assert_eq!(
            value.get("accountKind").and_then(Value::as_str),
            Some("patient")
        );
    }

    #[rstest]
    fn profile_update_distinguishes_null_from_absent() {
        let request: UpdateProfileRequest =
            serde_json::from_value(json!({"fullName": "Amanda S.", "phone": null}))
                .expect("valid body");
        let update = AccountUpdate::from(request);
        assert_eq!(update.full_name.as_deref(), Some("Amanda S."));
        assert_eq!(update.phone, Some(None));
        assert_eq!(update.gender, None);
        assert_eq!(update.date_of_birth, None);
    }
}
