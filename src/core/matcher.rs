use crate::core::{
    classifier::normalize_target_group,
    compare::compare_schemes,
    filters::{is_eligible, matches_age, matches_profile_soft},
    scoring::calculate_eligibility_score,
};
use crate::error::SchemeError;
use crate::models::{
    ComparisonBundle, MatchResult, PriorityBuckets, SchemeRecord, ScoringWeights, UserProfile,
};

/// Threshold used when the caller does not pass one
pub const DEFAULT_MIN_SCORE: u32 = 80;

/// Result of a recommendation run
#[derive(Debug)]
pub struct RecommendationSet {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Eligibility filter (active, state, income, and age when hard)
/// 2. Scoring, which also classifies the target group
/// 3. Caste eligibility and minimum score
/// 4. Stable ranking and optional truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    min_score: u32,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, min_score: u32) -> Self {
        Self { weights, min_score }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn min_score(&self) -> u32 {
        self.min_score
    }

    /// Eligibility score (0-100) of one scheme for one profile
    pub fn score(&self, scheme: &SchemeRecord, profile: &UserProfile) -> u32 {
        calculate_eligibility_score(scheme, profile, &self.weights).0
    }

    /// Recommend schemes using the hard filter
    ///
    /// # Arguments
    /// * `catalog` - Schemes in catalog order
    /// * `profile` - The citizen's declared attributes
    /// * `min_score` - Minimum score to keep, or the configured default
    /// * `limit` - Maximum number of results, if the view caps them
    ///
    /// # Returns
    /// RecommendationSet ordered by descending score; equal scores keep
    /// catalog order
    pub fn recommend(
        &self,
        catalog: &[SchemeRecord],
        profile: &UserProfile,
        min_score: Option<u32>,
        limit: Option<usize>,
    ) -> RecommendationSet {
        self.rank(catalog, profile, min_score, limit, is_eligible)
    }

    /// Recommend schemes without excluding on age
    ///
    /// Age-ineligible schemes stay in the list with `age_eligible = false`.
    pub fn recommend_annotated(
        &self,
        catalog: &[SchemeRecord],
        profile: &UserProfile,
        min_score: Option<u32>,
        limit: Option<usize>,
    ) -> RecommendationSet {
        self.rank(catalog, profile, min_score, limit, matches_profile_soft)
    }

    /// Compare two to four schemes by name
    pub fn compare(
        &self,
        catalog: &[SchemeRecord],
        scheme_names: &[String],
        profile: Option<&UserProfile>,
    ) -> Result<ComparisonBundle, SchemeError> {
        compare_schemes(catalog, scheme_names, profile, &self.weights)
    }

    fn rank(
        &self,
        catalog: &[SchemeRecord],
        profile: &UserProfile,
        min_score: Option<u32>,
        limit: Option<usize>,
        eligible: fn(&SchemeRecord, &UserProfile) -> bool,
    ) -> RecommendationSet {
        let total_candidates = catalog.len();
        let min_score = min_score.unwrap_or(self.min_score);

        let mut matches: Vec<MatchResult> = catalog
            .iter()
            // Stage 1: eligibility filter
            .filter(|scheme| eligible(scheme, profile))
            // Stages 2 & 3: score, then drop caste-ineligible and weak matches
            .filter_map(|scheme| {
                let (score, caste_match) =
                    calculate_eligibility_score(scheme, profile, &self.weights);

                if !caste_match.is_eligible() || score < min_score {
                    return None;
                }

                Some(MatchResult {
                    scheme: scheme.clone(),
                    score,
                    match_percentage: format!("{}%", score),
                    income_range: scheme.income_range_label(),
                    caste_category: normalize_target_group(&scheme.target_group),
                    age_eligible: matches_age(scheme, profile.effective_age()),
                    caste_eligible: true,
                })
            })
            .collect();

        // Stage 4: sort_by is stable, so ties keep catalog order
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        tracing::debug!(
            "Ranked {} of {} schemes (min score {})",
            matches.len(),
            total_candidates,
            min_score
        );

        RecommendationSet {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Split ranked results into high (>= 70), medium (>= 40) and low bands
pub fn categorize_by_priority(results: &[MatchResult]) -> PriorityBuckets {
    let mut buckets = PriorityBuckets::default();

    for result in results {
        let bucket = if result.score >= 70 {
            &mut buckets.high
        } else if result.score >= 40 {
            &mut buckets.medium
        } else {
            &mut buckets.low
        };
        bucket.push(result.clone());
    }

    buckets
}
