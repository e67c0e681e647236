use crate::core::{classifier::caste_eligible, filters::matches_state};
use crate::models::{SchemeRecord, SearchFilters, NATIONWIDE};

/// Search active schemes by keyword with optional filters
///
/// The query is a case-insensitive substring over name, benefits and
/// category. An empty query matches every active scheme.
pub fn search_schemes<'a>(
    catalog: &'a [SchemeRecord],
    query: &str,
    filters: Option<&SearchFilters>,
) -> Vec<&'a SchemeRecord> {
    let query = query.trim().to_lowercase();

    catalog
        .iter()
        .filter(|scheme| scheme.is_active)
        .filter(|scheme| query.is_empty() || searchable_text(scheme).contains(&query))
        .filter(|scheme| filters.map_or(true, |f| matches_filters(scheme, f)))
        .collect()
}

/// First scheme with exactly this name
pub fn scheme_details<'a>(catalog: &'a [SchemeRecord], name: &str) -> Option<&'a SchemeRecord> {
    catalog.iter().find(|scheme| scheme.name == name)
}

fn searchable_text(scheme: &SchemeRecord) -> String {
    format!("{} {} {}", scheme.name, scheme.benefits, scheme.category).to_lowercase()
}

fn matches_filters(scheme: &SchemeRecord, filters: &SearchFilters) -> bool {
    if let Some(state) = filters.state.as_deref() {
        if !state.is_empty() && state != NATIONWIDE && !matches_state(scheme, state) {
            return false;
        }
    }

    if let Some(category) = filters.category.as_deref() {
        if !category.is_empty() && scheme.category != category {
            return false;
        }
    }

    if let Some(caste) = filters.caste_category {
        if !caste_eligible(caste, &scheme.target_group) {
            return false;
        }
    }

    if filters.min_income.is_some() || filters.max_income.is_some() {
        let Some((scheme_min, scheme_max)) = scheme.income_bounds() else {
            return false;
        };

        if filters.min_income.is_some_and(|min| scheme_max < min) {
            return false;
        }
        if filters.max_income.is_some_and(|max| scheme_min > max) {
            return false;
        }
    }

    true
}
