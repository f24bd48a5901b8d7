//! Request and response payloads for the professional directory.

use chrono::{DateTime, Utc};
use pagination::{Page, PageInfo};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::validation::{blank_as_none, double_option};
use crate::domain::{
    AccountSummary, ProfessionalListing, ProfessionalProfile, ProfessionalUpdate, SearchFilters,
};

/// Owner fields embedded in a professional representation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummaryResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Present on the owner-only lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_kind: Option<String>,
}

impl AccountSummaryResponse {
    fn public(summary: &AccountSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            full_name: summary.full_name.clone(),
            email: summary.email.as_str().to_owned(),
            phone: summary.phone.clone(),
            account_kind: None,
        }
    }

    fn owned(summary: &AccountSummary) -> Self {
        Self {
            account_kind: Some(summary.kind.as_str().to_owned()),
            ..Self::public(summary)
        }
    }
}

/// Professional profile representation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    #[schema(value_type = String, format = Uuid)]
    pub account_id: String,
    pub license_number: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub experience_years: u32,
    pub consultation_price: f64,
    pub approach: Option<String>,
    pub languages: String,
    pub is_verified: bool,
    pub rating: f64,
    pub review_count: u32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Omitted when nested inside an account representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountSummaryResponse>,
}

impl From<&ProfessionalProfile> for ProfessionalResponse {
    fn from(profile: &ProfessionalProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            account_id: profile.account_id.to_string(),
            license_number: profile.license_number.clone(),
            specialty: profile.specialty.clone(),
            bio: profile.bio.clone(),
            experience_years: profile.experience_years,
            consultation_price: profile.consultation_price,
            approach: profile.approach.clone(),
            languages: profile.languages.clone(),
            is_verified: profile.is_verified,
            rating: profile.rating,
            review_count: profile.review_count,
            is_available: profile.is_available,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
            account: None,
        }
    }
}

impl ProfessionalResponse {
    /// Public representation with the minimal owner fields.
    pub fn public(listing: &ProfessionalListing) -> Self {
        Self {
            account: Some(AccountSummaryResponse::public(&listing.account)),
            ..Self::from(&listing.profile)
        }
    }

    /// Owner representation, which also names the account kind.
    pub fn owned(listing: &ProfessionalListing) -> Self {
        Self {
            account: Some(AccountSummaryResponse::owned(&listing.account)),
            ..Self::from(&listing.profile)
        }
    }
}

/// `data` of the single-profile endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfessionalPayload {
    pub professional: ProfessionalResponse,
}

/// `data` of `GET /api/professionals/search`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchPayload {
    pub professionals: Vec<ProfessionalResponse>,
    #[schema(value_type = Object)]
    pub pagination: PageInfo,
}

impl From<Page<ProfessionalListing>> for SearchPayload {
    fn from(page: Page<ProfessionalListing>) -> Self {
        Self {
            professionals: page.items.iter().map(ProfessionalResponse::public).collect(),
            pagination: page.pagination,
        }
    }
}

/// `data` of `GET /api/professionals/specialties`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SpecialtiesPayload {
    pub specialties: Vec<String>,
}

/// Query string accepted by the directory search.
///
/// Empty numeric values (`?minPrice=`) are read as absent.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring of the specialty.
    pub specialty: Option<String>,
    /// Inclusive lower price bound.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
    /// Inclusive lower rating bound.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_rating: Option<f64>,
    /// Inclusive lower bound on years of experience.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_experience_years: Option<u32>,
    /// Substring of the therapeutic approach.
    pub approach: Option<String>,
    /// Substring of the comma-separated languages.
    pub language: Option<String>,
    /// One-based page number, default 1.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    /// Page size between 1 and 100, default 10.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<u32>,
}

impl SearchQuery {
    /// Split into filters and the raw page selection.
    pub fn into_parts(self) -> (SearchFilters, Option<u32>, Option<u32>) {
        let filters = SearchFilters {
            specialty: self.specialty,
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
            min_experience_years: self.min_experience_years,
            approach: self.approach,
            language: self.language,
        };
        (filters, self.page, self.limit)
    }
}

/// Partial update of the self-editable profile fields.
///
/// Absent keys are left untouched; `bio` and `approach` accept `null` to
/// clear the stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfessionalRequest {
    pub specialty: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    pub experience_years: Option<u32>,
    pub consultation_price: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub approach: Option<Option<String>>,
    pub languages: Option<String>,
    pub is_available: Option<bool>,
}

impl From<UpdateProfessionalRequest> for ProfessionalUpdate {
    fn from(request: UpdateProfessionalRequest) -> Self {
        Self {
            specialty: request.specialty,
            bio: request.bio,
            experience_years: request.experience_years,
            consultation_price: request.consultation_price,
            approach: request.approach,
            languages: request.languages,
            is_available: request.is_available,
        }
    }
}
