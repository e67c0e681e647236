use std::collections::BTreeMap;

use crate::core::classifier::normalize_target_group;
use crate::models::{IncomeBracketCount, SchemeRecord, SchemeStatistics};

/// Upper bounds of the income brackets, keyed on a scheme's max income
const INCOME_BRACKETS: &[(&str, u64)] = &[
    ("0-100000", 100_000),
    ("100001-300000", 300_000),
    ("300001-500000", 500_000),
    ("500001-1000000", 1_000_000),
    ("1000000+", u64::MAX),
];

const TOP_CATEGORIES: usize = 5;

/// Aggregate counts over the active part of the catalog
pub fn scheme_statistics(catalog: &[SchemeRecord]) -> SchemeStatistics {
    let active: Vec<&SchemeRecord> = catalog.iter().filter(|s| s.is_active).collect();

    let mut categories = BTreeMap::new();
    let mut states = BTreeMap::new();
    let mut levels = BTreeMap::new();
    let mut caste_categories = BTreeMap::new();
    let mut income_counts = vec![0usize; INCOME_BRACKETS.len()];

    for scheme in &active {
        *categories.entry(scheme.category.clone()).or_insert(0) += 1;
        *states.entry(scheme.state.clone()).or_insert(0) += 1;
        let level = match scheme.level.trim() {
            "" => "Unknown",
            level => level,
        };
        *levels.entry(level.to_string()).or_insert(0) += 1;
        *caste_categories
            .entry(normalize_target_group(&scheme.target_group))
            .or_insert(0) += 1;

        // Malformed max income is left out of the brackets
        if let Some(max_income) = scheme.max_income {
            if let Some(index) = INCOME_BRACKETS
                .iter()
                .position(|(_, upper)| max_income <= *upper)
            {
                income_counts[index] += 1;
            }
        }
    }

    let income_ranges = INCOME_BRACKETS
        .iter()
        .zip(income_counts)
        .map(|((bracket, _), count)| IncomeBracketCount {
            bracket: bracket.to_string(),
            count,
        })
        .collect();

    // BTreeMap iteration is alphabetical, so equal counts stay alphabetical
    let mut top_categories: Vec<(String, usize)> = categories
        .iter()
        .map(|(name, count)| (name.clone(), *count))
        .collect();
    top_categories.sort_by(|a, b| b.1.cmp(&a.1));
    top_categories.truncate(TOP_CATEGORIES);

    SchemeStatistics {
        total_schemes: catalog.len(),
        active_schemes: active.len(),
        inactive_schemes: catalog.len() - active.len(),
        categories,
        states,
        levels,
        caste_categories,
        income_ranges,
        top_categories,
    }
}
