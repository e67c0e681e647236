// Core algorithm exports
pub mod alerts;
pub mod classifier;
pub mod compare;
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod search;
pub mod statistics;

pub use alerts::{days_since_update, AlertGenerator, AlertSettings};
pub use classifier::{caste_eligible, classify_target_group, match_caste, normalize_target_group, CasteMatch, TargetGroup};
pub use compare::compare_schemes;
pub use filters::{is_eligible, matches_profile_soft, matches_state_and_income};
pub use matcher::{categorize_by_priority, Matcher, RecommendationSet, DEFAULT_MIN_SCORE};
pub use scoring::calculate_eligibility_score;
pub use search::{scheme_details, search_schemes};
pub use statistics::scheme_statistics;
