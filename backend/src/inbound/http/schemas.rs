//! OpenAPI schema definitions for the response envelopes.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! of the failure envelope rendered from [`crate::domain::Error`].

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The email or national id is already registered.
    #[schema(rename = "conflict")]
    Conflict,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for the failure envelope.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    /// Always `false`.
    success: bool,
    /// Human-readable message returned to clients.
    #[schema(example = "invalid credentials")]
    message: String,
    /// Stable machine-readable error code.
    error: ErrorCodeSchema,
    /// Field-level context such as `{"field": "email", "code": "missing_field"}`.
    details: Option<serde_json::Value>,
    /// Correlation identifier, also sent as the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    #[test]
    fn error_envelope_schema_uses_wire_names() {
        let RefOr::T(Schema::Object(object)) = ErrorEnvelopeSchema::schema() else {
            panic!("expected an object schema");
        };
        for field in ["success", "message", "error", "details", "traceId"] {
            assert!(
                object.properties.contains_key(field),
                "schema should have field '{field}'"
            );
        }
    }
}
