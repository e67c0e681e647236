use std::cmp::Ordering;

use crate::core::scoring::calculate_eligibility_score;
use crate::error::SchemeError;
use crate::models::{
    ComparisonBundle, Insight, InsightKind, Recommendation, SchemeRecord, SchemeSnapshot,
    ScoringWeights, UserProfile,
};

pub const MIN_COMPARE: usize = 2;
pub const MAX_COMPARE: usize = 4;

/// Score at which a compared scheme counts as a good fit
pub const GOOD_ELIGIBILITY_SCORE: u32 = 50;

/// Build a side-by-side comparison of two to four schemes
///
/// Each name resolves to the first catalog entry with exactly that name.
/// Unknown names are skipped rather than reported, so the bundle may hold
/// fewer schemes than were requested.
pub fn compare_schemes(
    catalog: &[SchemeRecord],
    scheme_names: &[String],
    profile: Option<&UserProfile>,
    weights: &ScoringWeights,
) -> Result<ComparisonBundle, SchemeError> {
    if !(MIN_COMPARE..=MAX_COMPARE).contains(&scheme_names.len()) {
        return Err(SchemeError::Input(format!(
            "Comparison needs between {} and {} scheme names, got {}",
            MIN_COMPARE,
            MAX_COMPARE,
            scheme_names.len()
        )));
    }

    let schemes: Vec<SchemeSnapshot> = scheme_names
        .iter()
        .filter_map(|name| catalog.iter().find(|scheme| &scheme.name == name))
        .map(|scheme| SchemeSnapshot {
            scheme: scheme.clone(),
            age_range: scheme.age_range_label(),
            income_range: scheme.income_range_label(),
            eligibility_score: profile
                .map(|p| calculate_eligibility_score(scheme, p, weights).0),
        })
        .collect();

    let insights = generate_insights(&schemes, profile.is_some());
    let recommendation = best_pick(&schemes, profile.is_some());

    Ok(ComparisonBundle {
        schemes,
        insights,
        recommendation,
    })
}

/// First element with the greatest key; `Iterator::max_by_key` keeps the last
fn first_max_by_key<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Option<&T> {
    items.iter().fold(None, |best, item| match best {
        Some(current) if key(item).cmp(&key(current)) != Ordering::Greater => Some(current),
        _ => Some(item),
    })
}

fn income_span(snapshot: &SchemeSnapshot) -> u64 {
    snapshot
        .scheme
        .income_bounds()
        .map_or(0, |(min, max)| max - min)
}

fn age_span(snapshot: &SchemeSnapshot) -> u32 {
    snapshot.scheme.age_bounds().map_or(0, |(min, max)| max - min)
}

fn generate_insights(schemes: &[SchemeSnapshot], with_profile: bool) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(widest) = first_max_by_key(schemes, income_span) {
        insights.push(Insight {
            kind: InsightKind::Income,
            title: "Income Flexibility".to_string(),
            message: format!(
                "{} has the widest income eligibility range",
                widest.scheme.name
            ),
        });
    }

    if let Some(widest) = first_max_by_key(schemes, age_span) {
        insights.push(Insight {
            kind: InsightKind::Age,
            title: "Age Coverage".to_string(),
            message: format!(
                "{} covers the widest age group ({})",
                widest.scheme.name, widest.age_range
            ),
        });
    }

    let mut categories: Vec<&str> = Vec::new();
    for snapshot in schemes {
        if !categories.contains(&snapshot.scheme.category.as_str()) {
            categories.push(&snapshot.scheme.category);
        }
    }
    if categories.len() > 1 {
        insights.push(Insight {
            kind: InsightKind::Category,
            title: "Category Diversity".to_string(),
            message: format!(
                "Comparing schemes across {} different categories: {}",
                categories.len(),
                categories.join(", ")
            ),
        });
    }

    if with_profile && !schemes.is_empty() {
        let eligible_count = schemes
            .iter()
            .filter(|s| s.eligibility_score.unwrap_or(0) >= GOOD_ELIGIBILITY_SCORE)
            .count();
        insights.push(Insight {
            kind: InsightKind::Eligibility,
            title: "Your Eligibility".to_string(),
            message: format!(
                "You have good eligibility (score ≥{}) for {} out of {} compared schemes",
                GOOD_ELIGIBILITY_SCORE,
                eligible_count,
                schemes.len()
            ),
        });
    }

    insights
}

fn best_pick(schemes: &[SchemeSnapshot], with_profile: bool) -> Option<Recommendation> {
    if with_profile {
        let best = first_max_by_key(schemes, |s| s.eligibility_score.unwrap_or(0))?;
        let score = best.eligibility_score.unwrap_or(0);
        return Some(Recommendation {
            scheme_name: best.scheme.name.clone(),
            reason: format!("Best match with eligibility score of {}", score),
            score: Some(score),
        });
    }

    // Unparseable dates compare as None, which orders before any date
    let newest = first_max_by_key(schemes, |s| s.scheme.last_updated_date())?;
    Some(Recommendation {
        scheme_name: newest.scheme.name.clone(),
        reason: "Most recently updated scheme".to_string(),
        score: None,
    })
}
