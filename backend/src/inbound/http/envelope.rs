//! Uniform JSON envelope wrapped around every response body.
//!
//! Successful responses carry `{success: true, message, data?}`. Failures are
//! rendered by [`crate::inbound::http::error`] as
//! `{success: false, message, error, details?, traceId?}`.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::domain::Error;

/// Success envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Always `true`.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Operation payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Envelope carrying `data`.
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<Value> {
    /// Envelope without a payload.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// `200 OK` with `data` wrapped in the envelope.
pub fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::OK, Envelope::with_data(message, data))
}

/// `201 Created` with `data` wrapped in the envelope.
pub fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::CREATED, Envelope::with_data(message, data))
}

/// `200 OK` carrying only a message.
pub fn ok_message(message: &str) -> HttpResponse {
    respond(StatusCode::OK, Envelope::message_only(message))
}

fn respond<T: Serialize>(status: StatusCode, body: Envelope<T>) -> HttpResponse {
    HttpResponse::build(status).json(body)
}

/// Failure envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope<'a> {
    success: bool,
    message: &'a str,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<&'a str>,
}

impl<'a> From<&'a Error> for ErrorEnvelope<'a> {
    fn from(error: &'a Error) -> Self {
        Self {
            success: false,
            message: error.message(),
            error: error.code().as_str(),
            details: error.details(),
            trace_id: error.trace_id(),
        }
    }
}
