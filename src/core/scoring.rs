use crate::core::classifier::{match_caste, CasteMatch};
use crate::core::filters::{matches_age, matches_income};
use crate::models::{SchemeRecord, ScoringWeights, UserProfile};

/// Interest categories that earn partial credit against any scheme category
pub const RELATED_CATEGORIES: &[&str] = &["Social Welfare", "Education", "Health"];

/// Calculate an eligibility score (0-100) for a scheme against a profile
///
/// Scoring formula with the default weights:
/// score = (
///     base      25    # income within the bracket
///   + category  25    # same category (10 for a related interest)
///   + age       20    # age (or default age) within the bracket
///   + caste     20    # user's caste named (15 when the scheme is open)
///   + state     10    # scoped to the user's state (5 when nationwide)
/// )
///
/// Returns the score together with the caste relation so callers can
/// report eligibility without classifying the target group twice.
pub fn calculate_eligibility_score(
    scheme: &SchemeRecord,
    profile: &UserProfile,
    weights: &ScoringWeights,
) -> (u32, CasteMatch) {
    let caste_match = match_caste(profile.caste_category, &scheme.target_group);

    let base_score = if matches_income(scheme, profile.income) {
        weights.base
    } else {
        0
    };

    let total = base_score
        + calculate_category_score(&scheme.category, &profile.category, weights)
        + calculate_age_score(scheme, profile.effective_age(), weights)
        + calculate_caste_score(caste_match, weights)
        + calculate_state_score(scheme, &profile.state, weights);

    (total.min(100), caste_match)
}

#[inline]
fn calculate_category_score(
    scheme_category: &str,
    profile_category: &str,
    weights: &ScoringWeights,
) -> u32 {
    if scheme_category == profile_category {
        weights.category
    } else if RELATED_CATEGORIES.contains(&profile_category) {
        weights.category_related
    } else {
        0
    }
}

#[inline]
fn calculate_age_score(scheme: &SchemeRecord, age: u32, weights: &ScoringWeights) -> u32 {
    if matches_age(scheme, age) {
        weights.age
    } else {
        0
    }
}

#[inline]
fn calculate_caste_score(caste_match: CasteMatch, weights: &ScoringWeights) -> u32 {
    match caste_match {
        CasteMatch::Specific => weights.caste,
        CasteMatch::Generic => weights.caste_generic,
        CasteMatch::Ineligible => 0,
    }
}

#[inline]
fn calculate_state_score(scheme: &SchemeRecord, state: &str, weights: &ScoringWeights) -> u32 {
    if scheme.is_nationwide() {
        weights.state_nationwide
    } else if scheme.state == state {
        weights.state
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CasteCategory;

    fn create_test_scheme(state: &str, category: &str, target_group: &str) -> SchemeRecord {
        SchemeRecord {
            id: "S1".to_string(),
            name: "Test Scheme".to_string(),
            level: "State".to_string(),
            state: state.to_string(),
            category: category.to_string(),
            min_income: Some(0),
            max_income: Some(300_000),
            min_age: Some(18),
            max_age: Some(60),
            target_group: target_group.to_string(),
            benefits: "Support".to_string(),
            is_active: true,
            last_updated: "2024-01-15".to_string(),
        }
    }

    fn create_test_profile(category: &str, caste: CasteCategory) -> UserProfile {
        UserProfile {
            state: "Kerala".to_string(),
            income: 100_000,
            age: Some(30),
            category: category.to_string(),
            caste_category: caste,
        }
    }

    #[test]
    fn test_perfect_match_scores_100() {
        let scheme = create_test_scheme("Kerala", "Education", "Scheduled Castes");
        let profile = create_test_profile("Education", CasteCategory::Sc);
        let weights = ScoringWeights::default();

        let (score, caste_match) = calculate_eligibility_score(&scheme, &profile, &weights);

        assert_eq!(score, 100);
        assert_eq!(caste_match, CasteMatch::Specific);
    }

    #[test]
    fn test_nationwide_generic_match() {
        let scheme = create_test_scheme("All", "Agriculture", "Farmers");
        let profile = create_test_profile("Agriculture", CasteCategory::General);
        let weights = ScoringWeights::default();

        let (score, caste_match) = calculate_eligibility_score(&scheme, &profile, &weights);

        // 25 base + 25 category + 20 age + 15 generic caste + 5 nationwide
        assert_eq!(score, 90);
        assert_eq!(caste_match, CasteMatch::Generic);
    }

    #[test]
    fn test_category_bonus() {
        let weights = ScoringWeights::default();

        assert_eq!(calculate_category_score("Health", "Health", &weights), 25);
        assert_eq!(calculate_category_score("Agriculture", "Health", &weights), 10);
        assert_eq!(calculate_category_score("Agriculture", "Housing", &weights), 0);
    }

    #[test]
    fn test_state_bonus() {
        let weights = ScoringWeights::default();
        let state_scheme = create_test_scheme("Kerala", "Health", "");
        let central_scheme = create_test_scheme("All", "Health", "");
        let other_state = create_test_scheme("Goa", "Health", "");

        assert_eq!(calculate_state_score(&state_scheme, "Kerala", &weights), 10);
        assert_eq!(calculate_state_score(&central_scheme, "Kerala", &weights), 5);
        assert_eq!(calculate_state_score(&other_state, "Kerala", &weights), 0);
    }

    #[test]
    fn test_ineligible_caste_scores_zero_caste_points() {
        let scheme = create_test_scheme("Kerala", "Education", "Scheduled Tribes only");
        let weights = ScoringWeights::default();

        let (st_score, _) = calculate_eligibility_score(
            &scheme,
            &create_test_profile("Education", CasteCategory::St),
            &weights,
        );
        let (obc_score, obc_match) = calculate_eligibility_score(
            &scheme,
            &create_test_profile("Education", CasteCategory::Obc),
            &weights,
        );

        assert_eq!(st_score - obc_score, 20);
        assert_eq!(obc_match, CasteMatch::Ineligible);
    }

    #[test]
    fn test_out_of_bracket_loses_base() {
        let scheme = create_test_scheme("Kerala", "Education", "");
        let mut profile = create_test_profile("Education", CasteCategory::General);
        let weights = ScoringWeights::default();

        let (in_bracket, _) = calculate_eligibility_score(&scheme, &profile, &weights);
        profile.income = 500_000;
        let (out_of_bracket, _) = calculate_eligibility_score(&scheme, &profile, &weights);

        assert_eq!(in_bracket - out_of_bracket, 25);
    }

    #[test]
    fn test_default_age_used_for_scoring() {
        let mut scheme = create_test_scheme("Kerala", "Education", "");
        scheme.min_age = Some(25);
        scheme.max_age = Some(35);
        let mut profile = create_test_profile("Education", CasteCategory::General);
        profile.age = None;
        let weights = ScoringWeights::default();

        assert_eq!(calculate_age_score(&scheme, profile.effective_age(), &weights), 20);
        assert_eq!(calculate_age_score(&scheme, 40, &weights), 0);
    }

    #[test]
    fn test_score_never_exceeds_100() {
        let weights = ScoringWeights {
            base: 40,
            category: 40,
            category_related: 40,
            age: 40,
            caste: 40,
            caste_generic: 40,
            state: 40,
            state_nationwide: 40,
        };
        let scheme = create_test_scheme("Kerala", "Education", "SC");
        let profile = create_test_profile("Education", CasteCategory::Sc);

        let (score, _) = calculate_eligibility_score(&scheme, &profile, &weights);
        assert_eq!(score, 100);
    }
}
