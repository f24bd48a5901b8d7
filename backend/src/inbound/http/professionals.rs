//! Professional directory handlers.
//!
//! ```text
//! GET /api/professionals/search?specialty=…&minPrice=…&page=1&limit=10
//! GET /api/professionals/specialties
//! GET /api/professionals/{id}
//! GET /api/professionals/user/{userId}
//! PUT /api/professionals/user/{userId}
//! ```
//!
//! Register `search` and `specialties` before `get_professional` so the
//! literal segments win over `{id}`.

use actix_web::{HttpResponse, get, put, web};

use super::envelope;
use super::identity::BearerIdentity;
use super::professionals_dto::{
    ProfessionalPayload, ProfessionalResponse, SearchPayload, SearchQuery, SpecialtiesPayload,
    UpdateProfessionalRequest,
};
use super::schemas::ErrorEnvelopeSchema;
use super::state::HttpState;
use super::validation::{FieldName, parse_page_request, parse_uuid};
use crate::domain::{AccountId, ApiResult, ProfessionalId, ProfessionalSearch};

/// Filtered, ranked, paginated list of listed professionals.
#[utoipa::path(
    get,
    path = "/api/professionals/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "One page of professionals", body = SearchPayload),
        (status = 400, description = "Malformed filter or page", body = ErrorEnvelopeSchema)
    ),
    tags = ["professionals"],
    operation_id = "searchProfessionals",
    security([])
)]
#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    let (filters, page, limit) = query.into_inner().into_parts();
    let page = parse_page_request(page, limit)?;
    let results = state
        .professionals
        .search(ProfessionalSearch { filters, page })
        .await?;
    Ok(envelope::ok(
        "Professionals found",
        SearchPayload::from(results),
    ))
}

/// Distinct specialties of listed professionals.
#[utoipa::path(
    get,
    path = "/api/professionals/specialties",
    responses((status = 200, description = "Sorted specialties", body = SpecialtiesPayload)),
    tags = ["professionals"],
    operation_id = "listSpecialties",
    security([])
)]
#[get("/specialties")]
pub async fn specialties(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let listed = state.professionals.specialties().await?;
    Ok(envelope::ok(
        "Specialties found",
        SpecialtiesPayload { specialties: listed },
    ))
}

/// Public lookup by profile id; unlisted profiles are included.
#[utoipa::path(
    get,
    path = "/api/professionals/{id}",
    params(("id" = String, Path, description = "Professional profile identifier")),
    responses(
        (status = 200, description = "Professional", body = ProfessionalPayload),
        (status = 400, description = "Identifier is not a UUID", body = ErrorEnvelopeSchema),
        (status = 404, description = "Professional not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["professionals"],
    operation_id = "getProfessional",
    security([])
)]
#[get("/{id}")]
pub async fn get_professional(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = ProfessionalId::from_uuid(parse_uuid(&path, FieldName::new("id"))?);
    let listing = state.professionals.by_id(&id).await?;
    Ok(envelope::ok(
        "Professional found",
        ProfessionalPayload {
            professional: ProfessionalResponse::public(&listing),
        },
    ))
}

/// Owner-only lookup by account id.
#[utoipa::path(
    get,
    path = "/api/professionals/user/{userId}",
    params(("userId" = String, Path, description = "Owning account identifier")),
    responses(
        (status = 200, description = "Professional", body = ProfessionalPayload),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema),
        (status = 403, description = "Not the acting account", body = ErrorEnvelopeSchema),
        (status = 404, description = "No profile for this account", body = ErrorEnvelopeSchema)
    ),
    tags = ["professionals"],
    operation_id = "getOwnProfessional"
)]
#[get("/user/{user_id}")]
pub async fn get_own_professional(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let account_id = AccountId::from_uuid(parse_uuid(&path, FieldName::new("userId"))?);
    let listing = state
        .professionals
        .by_account_id(identity.account_id(), &account_id)
        .await?;
    Ok(envelope::ok(
        "Professional found",
        ProfessionalPayload {
            professional: ProfessionalResponse::owned(&listing),
        },
    ))
}

/// Owner-only partial update of the self-editable profile fields.
#[utoipa::path(
    put,
    path = "/api/professionals/user/{userId}",
    params(("userId" = String, Path, description = "Owning account identifier")),
    request_body = UpdateProfessionalRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfessionalPayload),
        (status = 400, description = "Invalid field", body = ErrorEnvelopeSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelopeSchema),
        (status = 403, description = "Not the owner, or not a professional", body = ErrorEnvelopeSchema),
        (status = 404, description = "No profile for this account", body = ErrorEnvelopeSchema)
    ),
    tags = ["professionals"],
    operation_id = "updateOwnProfessional"
)]
#[put("/user/{user_id}")]
pub async fn update_own_professional(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateProfessionalRequest>,
) -> ApiResult<HttpResponse> {
    let account_id = AccountId::from_uuid(parse_uuid(&path, FieldName::new("userId"))?);
    let listing = state
        .professionals
        .update(
            identity.account_id(),
            &account_id,
            payload.into_inner().into(),
        )
        .await?;
    Ok(envelope::ok(
        "Professional profile updated",
        ProfessionalPayload {
            professional: ProfessionalResponse::owned(&listing),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAccountAuth, MockAccountDirectory, MockProfessionalDirectory};
    use crate::domain::{Error, ProfessionalUpdate, SearchFilters};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use pagination::Page;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    async fn call(
        directory: MockProfessionalDirectory,
        request: actix_test::TestRequest,
    ) -> (StatusCode, Value) {
        let state = HttpState::new(
            Arc::new(MockAccountAuth::new()),
            Arc::new(MockAccountDirectory::new()),
            Arc::new(directory),
        );
        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(state)).service(
                web::scope("/api/professionals")
                    .service(search)
                    .service(specialties)
                    .service(get_professional)
                    .service(get_own_professional)
                    .service(update_own_professional),
            ),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn search_forwards_filters_and_page() {
        let mut directory = MockProfessionalDirectory::new();
        directory
            .expect_search()
            .withf(|request| {
                request.filters
                    == SearchFilters {
                        specialty: Some("Clínica".to_owned()),
                        min_price: Some(100.0),
                        max_price: Some(150.0),
                        min_experience_years: Some(5),
                        ..SearchFilters::default()
                    }
                    && request.page.page() == 2
                    && request.page.limit() == 5
            })
            .times(1)
            .returning(|request| Ok(Page::new(Vec::new(), request.page, 7)));

        let (status, body) = call(
            directory,
            actix_test::TestRequest::get().uri(
                "/api/professionals/search?specialty=Cl%C3%ADnica&minPrice=100&maxPrice=150&minExperienceYears=5&page=2&limit=5",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body.pointer("/data/pagination"),
            Some(&json!({
                "currentPage": 2,
                "totalPages": 2,
                "totalItems": 7,
                "itemsPerPage": 5,
                "hasNextPage": false,
                "hasPrevPage": true,
            }))
        );
        assert_eq!(body.pointer("/data/professionals"), Some(&json!([])));
    }

    #[rstest]
    #[case("/api/professionals/search?limit=101")]
    #[case("/api/professionals/search?page=0")]
    #[actix_web::test]
    async fn out_of_range_pages_never_reach_the_directory(#[case] uri: &str) {
        let mut directory = MockProfessionalDirectory::new();
        directory.expect_search().never();

        let (status, body) = call(directory, actix_test::TestRequest::get().uri(uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.pointer("/details/code").and_then(Value::as_str),
            Some("out_of_range")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn specialties_route_is_not_shadowed_by_id() {
        let mut directory = MockProfessionalDirectory::new();
        directory.expect_by_id().never();
        directory
            .expect_specialties()
            .times(1)
            .returning(|| Ok(vec!["Psicologia Clínica".to_owned(), "Psiquiatria".to_owned()]));

        let (status, body) = call(
            directory,
            actix_test::TestRequest::get().uri("/api/professionals/specialties"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body.pointer("/data/specialties"),
            Some(&json!(["Psicologia Clínica", "Psiquiatria"]))
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_profile_is_not_found() {
        let mut directory = MockProfessionalDirectory::new();
        directory
            .expect_by_id()
            .times(1)
            .returning(|_| Err(Error::not_found("professional not found")));

        let (status, _) = call(
            directory,
            actix_test::TestRequest::get()
                .uri(&format!("/api/professionals/{}", ProfessionalId::random())),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn owner_routes_require_a_token() {
        let mut directory = MockProfessionalDirectory::new();
        directory.expect_update().never();

        let (status, _) = call(
            directory,
            actix_test::TestRequest::put()
                .uri(&format!("/api/professionals/user/{}", AccountId::random()))
                .set_json(json!({"isAvailable": false})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    fn update_body_maps_null_to_clear() {
        let request: UpdateProfessionalRequest =
            serde_json::from_value(json!({"bio": null, "consultationPrice": 180.0}))
                .expect("valid body");
        let update = ProfessionalUpdate::from(request);
        assert_eq!(update.bio, Some(None));
        assert_eq!(update.approach, None);
        assert_eq!(update.consultation_price, Some(180.0));
    }
}
