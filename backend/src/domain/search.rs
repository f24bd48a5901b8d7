//! Directory search criteria and ranking.
//!
//! Adapters must agree on these semantics: the baseline (available and
//! verified) always applies, every supplied filter narrows the result, text
//! filters are substring matches, and results are ranked by rating then
//! review count, both descending.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use pagination::PageRequest;

use super::ProfessionalProfile;

/// Optional narrowing filters for a directory search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub specialty: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub min_experience_years: Option<u32>,
    pub approach: Option<String>,
    pub language: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

fn contains(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| haystack.contains(needle))
}

impl SearchFilters {
    /// Trim text filters and drop the blank ones.
    #[must_use]
    pub fn normalised(self) -> Self {
        Self {
            specialty: non_blank(self.specialty),
            approach: non_blank(self.approach),
            language: non_blank(self.language),
            ..self
        }
    }

    /// Whether `profile` passes the baseline and every supplied filter.
    #[must_use]
    pub fn matches(&self, profile: &ProfessionalProfile) -> bool {
        profile.is_listed()
            && contains(&profile.specialty, self.specialty.as_deref())
            && self
                .min_price
                .is_none_or(|min| profile.consultation_price >= min)
            && self
                .max_price
                .is_none_or(|max| profile.consultation_price <= max)
            && self.min_rating.is_none_or(|min| profile.rating >= min)
            && self
                .min_experience_years
                .is_none_or(|min| profile.experience_years >= min)
            && contains(
                profile.approach.as_deref().unwrap_or_default(),
                self.approach.as_deref(),
            )
            && contains(&profile.languages, self.language.as_deref())
    }
}

/// A directory search request: filters plus the page to return.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfessionalSearch {
    pub filters: SearchFilters,
    pub page: PageRequest,
}

/// Directory ordering: rating descending, then review count descending.
#[must_use]
pub fn rank(a: &ProfessionalProfile, b: &ProfessionalProfile) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| b.review_count.cmp(&a.review_count))
}

/// Distinct, non-blank specialties of listed profiles in lexicographic order.
pub fn listed_specialties<'a>(
    profiles: impl IntoIterator<Item = &'a ProfessionalProfile>,
) -> Vec<String> {
    profiles
        .into_iter()
        .filter(|profile| profile.is_listed() && !profile.specialty.trim().is_empty())
        .map(|profile| profile.specialty.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
