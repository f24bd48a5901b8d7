//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` whose details name the offending
//! wire field and a stable machine-readable code.

use std::fmt::Display;
use std::str::FromStr;

use pagination::{PageRequest, PageRequestError};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Error, LoginValidationError, PasswordChangeValidationError, RegistrationValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidFormat,
    InvalidUuid,
    OutOfRange,
    TooLong,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidFormat => "invalid_format",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::TooLong => "too_long",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn map_registration_error(err: RegistrationValidationError) -> Error {
    let field = err.field().as_str();
    match err {
        RegistrationValidationError::MissingField(_) => {
            ValidationError::new(field, format!("missing required field: {field}"))
                .with_code(ErrorCode::MissingField)
        }
        RegistrationValidationError::InvalidField { reason, .. } => {
            ValidationError::new(field, format!("{field} is invalid: {reason}"))
                .with_code(ErrorCode::InvalidFormat)
        }
        RegistrationValidationError::TooLong { max, .. } => {
            ValidationError::new(field, format!("{field} must be at most {max} characters"))
                .with_code(ErrorCode::TooLong)
        }
    }
}

pub(crate) fn map_login_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::MissingEmail => missing_field_error(FieldName::new("email")),
        LoginValidationError::MissingPassword => missing_field_error(FieldName::new("password")),
    }
}

pub(crate) fn map_password_change_error(err: PasswordChangeValidationError) -> Error {
    match err {
        PasswordChangeValidationError::MissingCurrentPassword => {
            missing_field_error(FieldName::new("currentPassword"))
        }
        PasswordChangeValidationError::MissingNewPassword => {
            missing_field_error(FieldName::new("newPassword"))
        }
    }
}

pub(crate) fn parse_page_request(
    page: Option<u32>,
    limit: Option<u32>,
) -> Result<PageRequest, Error> {
    PageRequest::from_optional(page, limit).map_err(|err| {
        let field = match err {
            PageRequestError::PageTooSmall => "page",
            PageRequestError::LimitTooSmall | PageRequestError::LimitTooLarge { .. } => "limit",
        };
        ValidationError::new(field, err.to_string()).with_code(ErrorCode::OutOfRange)
    })
}

/// Deserialise a nullable field so that an absent key and an explicit `null`
/// stay distinguishable.
///
/// Use together with `#[serde(default)]`: absent yields `None`, `null`
/// yields `Some(None)`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parse an optional query value, reading an empty or blank one as absent.
///
/// Use together with `#[serde(default)]`.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .map(|raw| raw.parse().map_err(D::Error::custom))
        .transpose()
}
